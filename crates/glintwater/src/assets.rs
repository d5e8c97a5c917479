//! Startup assets with neutral fallbacks.
//!
//! A missing or corrupt asset never stops the renderer: the environment falls
//! back to none (no background, no ambient) and the normal map to a flat
//! field (an undistorted mirror).

use std::path::Path;

use glintwater_core::EnvironmentConfig;
use glintwater_render::{Environment, NormalField};

/// Side of the procedural normal field used when no normal map is configured.
pub const PROCEDURAL_NORMAL_SIZE: u32 = 128;
/// Tangent amplitude of the procedural normal field.
pub const PROCEDURAL_NORMAL_AMPLITUDE: f32 = 0.25;

/// Resolves the configured environment.
pub fn load_environment(config: &EnvironmentConfig) -> Environment {
    match config {
        EnvironmentConfig::None => Environment::None,
        EnvironmentConfig::Gradient(sky) => Environment::gradient(sky),
        EnvironmentConfig::Hdr(path) => Environment::load_hdr(path).unwrap_or_else(|err| {
            log::warn!("{err}; continuing without environment lighting");
            Environment::None
        }),
    }
}

/// Loads the normal map at `path`, or builds the procedural field when none
/// is configured.
pub fn load_normal_field(path: Option<&Path>) -> NormalField {
    match path {
        Some(path) => NormalField::load(path).unwrap_or_else(|err| {
            log::warn!("{err}; water will be an undistorted mirror");
            NormalField::flat()
        }),
        None => NormalField::procedural(PROCEDURAL_NORMAL_SIZE, PROCEDURAL_NORMAL_AMPLITUDE)
            .unwrap_or_else(|err| {
                log::warn!("{err}; water will be an undistorted mirror");
                NormalField::flat()
            }),
    }
}
