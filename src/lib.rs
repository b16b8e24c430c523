mod cli;
pub mod console;
pub mod report;

use hiring_ai::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
