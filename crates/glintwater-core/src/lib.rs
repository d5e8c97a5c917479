//! Core types for glintwater.
//!
//! This crate holds what both the renderer and the facade agree on:
//! - [`Options`] and the nested water, tone mapping and post-processing configs
//! - [`RenderPathKind`], the per-frame path selector value
//! - color space helpers in [`color`]
//! - [`GlintwaterError`] and the crate-wide [`Result`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod color;
pub mod error;
pub mod options;
pub mod path;
pub mod post_processing;
pub mod tone_mapping;
pub mod water;

pub use error::{check_dimensions, GlintwaterError, Result};
pub use options::{CameraConfig, EnvironmentConfig, Options, SkyGradient, SunConfig};
pub use path::RenderPathKind;
pub use post_processing::{AntialiasConfig, BloomConfig, BloomSelection, PostProcessingConfig};
pub use tone_mapping::{OutputEncoding, ToneMappingConfig, ToneMappingOperator};
pub use water::WaterConfig;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
