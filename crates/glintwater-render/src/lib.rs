//! Rendering backend for glintwater.
//!
//! This crate provides:
//! - a CPU reference renderer: camera rays, scene traversal, reflection
//!   capture and the water shading model
//! - the two color pipelines ([`DirectPath`] and [`CompositedPath`]) with
//!   tone mapping, bloom and antialiasing
//! - [`Renderer`], which drives one frame end to end
//! - PNG/JPEG capture and a wgpu [`Presenter`] for windows

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel coordinates convert between u32, usize and f32 throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod antialias;
pub mod bloom;
pub mod camera;
pub mod environment;
pub mod error;
pub mod image;
pub mod normal_field;
pub mod paths;
pub mod presenter;
pub mod reflection;
pub mod reflection_capture;
pub mod renderer;
pub mod scene;
pub mod screenshot;
pub mod tone_mapping;
pub mod water;

pub use antialias::AntialiasPass;
pub use bloom::BloomPass;
pub use camera::{Camera, Ray};
pub use environment::Environment;
pub use error::{RenderError, RenderResult};
pub use crate::image::{AddressMode, DisplayBuffer, HdrImage, RenderTarget};
pub use normal_field::NormalField;
pub use paths::{CompositedPath, DirectPath, RenderPath};
pub use presenter::Presenter;
pub use reflection::{ground_reflection_matrix, mirror_camera, reflection_matrix, texture_matrix};
pub use reflection_capture::{ReflectionBuffer, ReflectionCapture};
pub use renderer::{BufferDimensions, ProbeSample, Renderer};
pub use scene::{Fragment, FragmentSink, Scene, SunLight, SurfaceKind};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use tone_mapping::ToneMapPass;
pub use water::{WaterFragment, WaterParams, WaterSurface};
