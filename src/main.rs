use hiring_ai_cli::run;

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        if err.is_model_missing() {
            eprintln!("Run `hiring-ai train` to build the model from the recruitment dataset.");
        }
        std::process::exit(1);
    }
}
