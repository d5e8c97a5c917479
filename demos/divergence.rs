#![allow(clippy::cast_precision_loss)]
//! Renders the same frame through both paths and reports how much brighter
//! the water above the bloom threshold comes out when composited.
//!
//! ```text
//! cargo run --example divergence [output_dir]
//! ```
//!
//! With an output directory, both frames are also saved as PNG.

use std::path::PathBuf;

use glintwater::color::{luminance, srgb_to_linear};
use glintwater::{save_image, App, DisplayBuffer, Options, RenderPathKind, Vec3};

fn displayed_luminance(display: &DisplayBuffer, x: u32, y: u32) -> f32 {
    let [r, g, b, _] = display.pixel(x, y);
    let decode = |c: u8| srgb_to_linear(f32::from(c) / 255.0);
    luminance(Vec3::new(decode(r), decode(g), decode(b)))
}

fn main() -> glintwater::Result<()> {
    glintwater::init();

    let mut options = Options::default();
    options.width = 640;
    options.height = 360;
    // Low sun straight ahead puts its glitter path in view
    options.sun.direction = Vec3::new(0.0, 0.4, -1.0);
    options.camera.position = Vec3::new(20.0, 2.0, 0.0);
    options.camera.target = Vec3::new(20.0, -1.0, -7.5);

    let mut app = App::new(&options)?;
    app.renderer_mut().set_probe(true);

    app.select_path(RenderPathKind::Direct);
    let direct = app.frame(1.0).clone();
    let bright: Vec<(u32, u32)> = app
        .renderer()
        .probe_samples()
        .unwrap_or_default()
        .iter()
        .filter(|s| luminance(s.radiance) > options.post_processing.bloom.luminance_threshold)
        .map(|s| (s.x, s.y))
        .collect();

    app.select_path(RenderPathKind::Composited);
    let composited = app.render().clone();

    if bright.is_empty() {
        println!("no water fragment above the bloom threshold");
    } else {
        let mean = |display: &DisplayBuffer| {
            bright
                .iter()
                .map(|&(x, y)| displayed_luminance(display, x, y))
                .sum::<f32>()
                / bright.len() as f32
        };
        let (d, c) = (mean(&direct), mean(&composited));
        println!("water fragments above threshold: {}", bright.len());
        println!("mean displayed luminance, direct:     {d:.4}");
        println!("mean displayed luminance, composited: {c:.4}");
        println!("composited / direct:                  {:.3}", c / d);
    }

    if let Some(dir) = std::env::args_os().nth(1).map(PathBuf::from) {
        for (name, display) in [("direct", &direct), ("composited", &composited)] {
            let path = dir.join(format!("divergence_{name}.png"));
            save_image(&path, display).map_err(|e| {
                glintwater::GlintwaterError::RenderError(format!("Failed to save image: {e}"))
            })?;
        }
    }

    Ok(())
}
