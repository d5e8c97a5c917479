//! Presenter error types.

use thiserror::Error;

/// Errors raised while bringing up or driving the window presenter.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter can drive the window surface.
    #[error("failed to create graphics adapter: {0}")]
    AdapterCreationFailed(#[from] wgpu::RequestAdapterError),

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable texture format.
    #[error("surface configuration failed")]
    SurfaceConfigurationFailed,

    /// The next surface texture could not be acquired.
    #[error("failed to acquire surface texture: {0}")]
    SurfaceAcquireFailed(wgpu::SurfaceError),

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,
}

/// A specialized Result type for presenter operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
