//! Headless rendering.
//!
//! Runs the frame driver without a window and returns or saves the final
//! display buffer. No GPU is involved.

use std::path::Path;

use glintwater_core::{GlintwaterError, Options, Result};
use glintwater_render::DisplayBuffer;

use crate::app::App;

/// Renders `frames` frames, advancing time by `delta` seconds before each,
/// and returns the last display buffer.
///
/// With `frames == 0` a single frame is rendered at time zero.
///
/// # Example
/// ```no_run
/// use glintwater::*;
///
/// let display = render_to_image(&Options::default(), 2, 1.0).unwrap();
/// assert_eq!(display.dimensions(), (1280, 720));
/// ```
pub fn render_to_image(options: &Options, frames: u32, delta: f32) -> Result<DisplayBuffer> {
    let mut app = App::new(options)?;
    if frames == 0 {
        app.render();
    }
    for _ in 0..frames {
        app.frame(delta);
    }
    Ok(app.display().clone())
}

/// Like [`render_to_image`], then saves the result as PNG or JPEG.
pub fn render_to_file(
    path: impl AsRef<Path>,
    options: &Options,
    frames: u32,
    delta: f32,
) -> Result<()> {
    let display = render_to_image(options, frames, delta)?;
    glintwater_render::save_image(path, &display)
        .map_err(|e| GlintwaterError::RenderError(format!("Failed to save image: {e}")))
}
