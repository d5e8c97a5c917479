//! The frame driver.

use glintwater_core::{Options, RenderPathKind, Result};
use glintwater_render::{DisplayBuffer, Environment, NormalField, Renderer};

use crate::assets::{load_environment, load_normal_field};

/// Owns the renderer and exposes one entry point per frame-loop event.
///
/// Calls are expected from a single thread, one at a time: a resize is never
/// interleaved with a frame.
pub struct App {
    renderer: Renderer,
}

impl App {
    /// Loads the configured assets (with fallbacks) and builds the scene.
    pub fn new(options: &Options) -> Result<Self> {
        options.validate()?;
        let environment = load_environment(&options.environment);
        let normals = load_normal_field(options.normal_map.as_deref());
        Self::with_assets(options, environment, normals)
    }

    /// Builds the scene around already loaded assets.
    pub fn with_assets(
        options: &Options,
        environment: Environment,
        normals: NormalField,
    ) -> Result<Self> {
        let renderer = Renderer::new(options, environment, normals)?;
        log::info!(
            "scene ready at {}x{} ({} path)",
            options.width,
            options.height,
            options.path
        );
        Ok(Self { renderer })
    }

    /// Advances time by `delta` seconds and renders one frame.
    pub fn frame(&mut self, delta: f32) -> &DisplayBuffer {
        self.renderer.frame(delta)
    }

    /// Renders the current state again without advancing time.
    pub fn render(&mut self) -> &DisplayBuffer {
        self.renderer.render()
    }

    /// Resizes the frame buffers; zero sizes are rejected and the previous
    /// size is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.renderer.resize(width, height)
    }

    pub fn select_path(&mut self, path: RenderPathKind) {
        self.renderer.select_path(path);
    }

    /// Switches to the other path and returns it.
    pub fn toggle_path(&mut self) -> RenderPathKind {
        let next = self.renderer.path().toggled();
        self.renderer.select_path(next);
        next
    }

    pub fn path(&self) -> RenderPathKind {
        self.renderer.path()
    }

    /// The last rendered frame of the selected path.
    pub fn display(&self) -> &DisplayBuffer {
        self.renderer.display()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}
