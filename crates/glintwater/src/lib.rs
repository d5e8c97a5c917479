//! glintwater: water shading through a direct and a composited color pipeline.
//!
//! A small scene (sky, sun, a reference box and an animated reflective water
//! plane) is shaded once per frame and routed through one of two paths:
//!
//! - **Direct**: every fragment is tone mapped and sRGB encoded as it is shaded.
//! - **Composited**: linear radiance goes to a half-float target, bloom and
//!   antialiasing run on it, and tone mapping happens last.
//!
//! Both paths see bit-identical shaded fragments, yet water near the bloom
//! threshold comes out brighter through the composited path, because there the
//! tone curve compresses radiance plus bloom rather than radiance alone.
//!
//! # Quick Start
//!
//! ```no_run
//! use glintwater::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!     let mut app = App::new(&Options::default())?;
//!     app.frame(1.0);
//!     app.toggle_path();
//!     let composited = app.render().clone();
//!     save_image("composited.png", &composited).ok();
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
pub mod assets;
mod headless;
mod viewer;

pub use app::App;
pub use headless::{render_to_file, render_to_image};
pub use viewer::show;

// Re-export core types
pub use glintwater_core::{
    color, AntialiasConfig, BloomConfig, BloomSelection, CameraConfig, EnvironmentConfig,
    GlintwaterError, Options, OutputEncoding, PostProcessingConfig, RenderPathKind, Result,
    SkyGradient, SunConfig, ToneMappingConfig, ToneMappingOperator, WaterConfig, Mat4, Vec2, Vec3,
    Vec4,
};

// Re-export render types
pub use glintwater_render::{
    save_image, save_to_buffer, BufferDimensions, Camera, DisplayBuffer, Environment,
    NormalField, ProbeSample, Renderer, SurfaceKind, WaterSurface,
};

/// Initializes logging. Safe to call more than once.
pub fn init() {
    let _ = env_logger::try_init();
    log::info!("glintwater initialized");
}
