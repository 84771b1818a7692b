use std::sync::Arc;

use anyhow::{anyhow, Context};
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::gfx::rendering::RenderEngine;
use crate::interaction::{translate_window_event, WinitSurface};
use crate::viewer::Viewer;

/// Windowed viewer application.
pub struct ModelplaneApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    surface: Option<WinitSurface>,
    render_engine: Option<RenderEngine>,
    viewer: Option<Viewer>,
    error: Option<anyhow::Error>,
}

impl ModelplaneApp {
    /// Creates the event loop. The window opens once the loop starts.
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                surface: None,
                render_engine: None,
                viewer: None,
                error: None,
            },
        })
    }

    /// Runs until the window closes. Returns the first fatal error raised
    /// while the loop was running.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        // Release GPU resources before reporting.
        self.app_state.viewer = None;
        self.app_state.render_engine = None;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let (width, height) = window.inner_size().into();
        let target = window.clone();
        let vsync = self.config.vsync;
        let mut render_engine = pollster::block_on(async move {
            RenderEngine::new(target, width, height, vsync).await
        })
        .context("failed to initialize the renderer")?;

        let viewer = Viewer::new(&mut render_engine, self.config.clone())?;
        info!("Window opened at {}x{}", width, height);

        self.surface = Some(WinitSurface::new(window.clone()));
        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.viewer = Some(viewer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(surface), Some(render_engine), Some(viewer)) = (
            self.surface.as_mut(),
            self.render_engine.as_mut(),
            self.viewer.as_mut(),
        ) else {
            return;
        };

        surface.track(&event);

        let result: anyhow::Result<()> = match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                viewer.resize(render_engine, width, height).map_err(Into::into)
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::RedrawRequested => {
                let size = surface.window().inner_size();
                viewer
                    .render_frame(render_engine, size.width, size.height)
                    .map_err(Into::into)
            }
            ref other => match translate_window_event(other) {
                Some(input) => viewer.handle_input(surface, &input).map_err(Into::into),
                None => Ok(()),
            },
        };

        let close_requested = surface.close_requested();
        if let Err(err) = result {
            self.fail(event_loop, err);
        } else if close_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
