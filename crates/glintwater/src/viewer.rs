//! Windowed viewer: winit event loop plus the wgpu presenter.

use std::sync::Arc;
use std::time::Instant;

use glintwater_core::{GlintwaterError, Options, Result};
use glintwater_render::Presenter;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::app::App;

struct Viewer {
    app: App,
    size: (u32, u32),
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    last_frame: Option<Instant>,
    error: Option<GlintwaterError>,
}

impl Viewer {
    fn redraw(&mut self) {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);

        let display = self.app.frame(delta);
        if let Some(presenter) = &mut self.presenter {
            if let Err(err) = presenter.present(display) {
                log::error!("present failed: {err}");
            }
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("glintwater")
            .with_inner_size(PhysicalSize::new(self.size.0, self.size.1));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.error = Some(GlintwaterError::RenderError(format!(
                    "failed to create window: {err}"
                )));
                event_loop.exit();
                return;
            }
        };

        match Presenter::new(window.clone()) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(err) => {
                self.error = Some(GlintwaterError::RenderError(format!(
                    "failed to create presenter: {err}"
                )));
                event_loop.exit();
                return;
            }
        }

        log::info!("press Space to switch render path");
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if self.app.resize(size.width, size.height).is_ok() {
                    if let Some(presenter) = &mut self.presenter {
                        presenter.resize(size.width, size.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Space) => {
                            let path = self.app.toggle_path();
                            if let Some(window) = &self.window {
                                window.set_title(&format!("glintwater ({path})"));
                            }
                        }
                        PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the viewer window and blocks until it is closed.
pub fn show(options: &Options) -> Result<()> {
    let _ = env_logger::try_init();

    let app = App::new(options)?;
    let event_loop = EventLoop::new()
        .map_err(|e| GlintwaterError::RenderError(format!("failed to create event loop: {e}")))?;

    let mut viewer = Viewer {
        app,
        size: (options.width, options.height),
        window: None,
        presenter: None,
        last_frame: None,
        error: None,
    };
    event_loop
        .run_app(&mut viewer)
        .map_err(|e| GlintwaterError::RenderError(format!("event loop error: {e}")))?;

    match viewer.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
