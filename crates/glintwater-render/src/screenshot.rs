//! Saving display buffers to image files.

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::image::DisplayBuffer;

fn to_image(display: &DisplayBuffer) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ScreenshotError> {
    let (width, height) = display.dimensions();
    // Display rows are stored top to bottom, matching image's layout
    ImageBuffer::from_raw(width, height, display.as_bytes().to_vec())
        .ok_or(ScreenshotError::InvalidImageData)
}

/// Saves a display buffer to an image file.
///
/// The format follows the extension: `.png`, `.jpg` or `.jpeg`.
///
/// # Errors
/// Returns an error if the file cannot be written or the format is unsupported.
pub fn save_image(path: impl AsRef<Path>, display: &DisplayBuffer) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image(display)?;
    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    log::info!("saved {}x{} capture to {}", display.width(), display.height(), path.display());
    Ok(())
}

/// Encodes a display buffer as PNG in memory.
pub fn save_to_buffer(display: &DisplayBuffer) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image(display)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn display() -> DisplayBuffer {
        let mut display = DisplayBuffer::new(3, 2).unwrap();
        display.write(2, 1, Vec3::new(1.0, 0.5, 0.0));
        display
    }

    #[test]
    fn test_png_buffer_round_trips_pixels() {
        let png = save_to_buffer(&display()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 128, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("glintwater_capture.bmpx");
        let err = save_image(&path, &display()).unwrap_err();
        assert!(matches!(err, ScreenshotError::UnsupportedFormat(ext) if ext == "bmpx"));
    }

    #[test]
    fn test_save_png_file() {
        let path = std::env::temp_dir().join(format!("glintwater_capture_{}.png", std::process::id()));
        save_image(&path, &display()).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.get_pixel(2, 1).0, [255, 128, 0, 255]);
        std::fs::remove_file(&path).unwrap();
    }
}
