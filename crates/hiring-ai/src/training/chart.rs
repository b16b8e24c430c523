//! Ranked feature-importance bar chart written as a PNG.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use super::FeatureImportance;

const WIDTH: u32 = 900;
const MARGIN: u32 = 24;
const TITLE_HEIGHT: u32 = 56;
const ROW_HEIGHT: u32 = 34;
const BAR_HEIGHT: u32 = 20;
const LABEL_WIDTH: u32 = 280;
const VALUE_WIDTH: u32 = 90;
const SCALE: u32 = 2;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR: Rgb<u8> = Rgb([70, 130, 180]);
const AXIS: Rgb<u8> = Rgb([120, 120, 120]);
const TEXT: Rgb<u8> = Rgb([30, 30, 30]);

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to prepare chart directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write feature importance chart {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub fn chart_height(rows: usize) -> u32 {
    TITLE_HEIGHT + rows as u32 * ROW_HEIGHT + MARGIN
}

/// Draw importances top to bottom in the order given.
pub fn render_importance_chart(importances: &[FeatureImportance]) -> RgbImage {
    let mut image = RgbImage::from_pixel(WIDTH, chart_height(importances.len()), BACKGROUND);
    draw_text(
        &mut image,
        MARGIN,
        MARGIN,
        "FEATURE IMPORTANCE IN RANDOM FOREST MODEL",
    );

    let bar_origin = MARGIN + LABEL_WIDTH;
    let bar_span = WIDTH - bar_origin - VALUE_WIDTH - MARGIN;
    let max = importances
        .iter()
        .map(|entry| entry.importance)
        .fold(0.0_f64, f64::max);

    for (row, entry) in importances.iter().enumerate() {
        let top = TITLE_HEIGHT + row as u32 * ROW_HEIGHT;
        let text_top = top + (ROW_HEIGHT - glyph_height()) / 2;
        draw_text(
            &mut image,
            MARGIN,
            text_top,
            &entry.feature.column().to_ascii_uppercase(),
        );

        let fraction = if max > 0.0 { entry.importance / max } else { 0.0 };
        let bar_len = (fraction * bar_span as f64).round() as u32;
        let bar_top = top + (ROW_HEIGHT - BAR_HEIGHT) / 2;
        fill_rect(&mut image, bar_origin, bar_top, bar_len, BAR_HEIGHT, BAR);
        draw_text(
            &mut image,
            bar_origin + bar_len + 8,
            text_top,
            &format!("{:.3}", entry.importance),
        );
    }

    let axis_bottom = TITLE_HEIGHT + importances.len() as u32 * ROW_HEIGHT;
    fill_rect(
        &mut image,
        bar_origin.saturating_sub(1),
        TITLE_HEIGHT,
        1,
        axis_bottom - TITLE_HEIGHT,
        AXIS,
    );
    image
}

/// Render and save, replacing any existing file.
pub fn write_importance_chart(
    path: &Path,
    importances: &[FeatureImportance],
) -> Result<(), ChartError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    render_importance_chart(importances)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ChartError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}

fn glyph_height() -> u32 {
    7 * SCALE
}

fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str) {
    let advance = 6 * SCALE;
    for (idx, ch) in text.chars().enumerate() {
        let origin = x + idx as u32 * advance;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) != 0 {
                    fill_rect(
                        image,
                        origin + col * SCALE,
                        y + row as u32 * SCALE,
                        SCALE,
                        SCALE,
                        TEXT,
                    );
                }
            }
        }
    }
}

/// 5x7 bitmap rows, most significant of the low five bits on the left.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        _ => [0x00; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Feature;

    fn ranked() -> Vec<FeatureImportance> {
        vec![
            FeatureImportance {
                feature: Feature::InterviewScore,
                importance: 0.6,
            },
            FeatureImportance {
                feature: Feature::SkillScore,
                importance: 0.4,
            },
            FeatureImportance {
                feature: Feature::Age,
                importance: 0.0,
            },
        ]
    }

    #[test]
    fn longest_bar_belongs_to_top_feature() {
        let image = render_importance_chart(&ranked());
        assert_eq!(image.width(), WIDTH);
        assert_eq!(image.height(), chart_height(3));

        let bar_row = |row: u32| TITLE_HEIGHT + row * ROW_HEIGHT + ROW_HEIGHT / 2;
        let bar_len = |row: u32| {
            (MARGIN + LABEL_WIDTH..WIDTH)
                .take_while(|&x| *image.get_pixel(x, bar_row(row)) == BAR)
                .count()
        };
        assert!(bar_len(0) > bar_len(1));
        assert_eq!(bar_len(2), 0);
    }

    #[test]
    fn writes_decodable_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("charts").join("importance.png");
        write_importance_chart(&path, &ranked()).expect("chart written");
        let decoded = image::open(&path).expect("png decodes");
        assert_eq!(decoded.width(), WIDTH);
    }
}
