//! Effect builder and window runner.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::Config;
use crate::driver::{FrameDriver, StopHandle};
use crate::error::{GpuError, RunError};
use crate::gpu::GpuRenderer;
use crate::time::FrameClock;

/// A windowed particle effect.
///
/// Use method chaining to configure, then call `.run()` to start.
pub struct Effect {
    config: Config,
    stop: StopHandle,
}

impl Effect {
    /// Create an effect with default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            stop: StopHandle::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the particle lifetime in seconds.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.config.effect.duration = duration;
        self
    }

    /// Set the spawn rate. Each frame spawns `floor(rate * U)` particles.
    pub fn with_spawn_rate(mut self, rate: f32) -> Self {
        self.config.effect.spawn_rate = rate;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.config.window.clear_color = color;
        self
    }

    /// Handle that ends [`run`](Self::run) from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open the window and animate until it is closed or stopped.
    ///
    /// Returns an error if the configuration is invalid or the GPU cannot be
    /// initialized; in both cases no frame is ever drawn.
    pub fn run(self) -> Result<(), RunError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self.config, self.stop);
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Effect {
    fn default() -> Self {
        Self::new()
    }
}

type WindowDriver = FrameDriver<GpuRenderer, FrameClock, StdRng>;

struct App {
    config: Config,
    stop: StopHandle,
    window: Option<Arc<Window>>,
    driver: Option<WindowDriver>,
    failure: Option<RunError>,
}

impl App {
    fn new(config: Config, stop: StopHandle) -> Self {
        Self {
            config,
            stop,
            window: None,
            driver: None,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let renderer: Result<GpuRenderer, GpuError> = pollster::block_on(GpuRenderer::new(
            window.clone(),
            self.config.window.clear_color,
        ));
        let driver = FrameDriver::new(
            renderer?,
            FrameClock::new(),
            StdRng::from_entropy(),
            self.config.effect.clone(),
        )
        .with_stop_handle(self.stop.clone());
        self.driver = Some(driver);

        info!(
            duration = self.config.effect.duration,
            spawn_rate = self.config.effect.spawn_rate,
            "effect started"
        );
        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(driver) = &mut self.driver else {
            return;
        };

        if driver.tick().is_some() {
            let renderer = driver.backend_mut();
            match renderer.present() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, stopping");
                    driver.stop();
                }
                Err(e) => warn!("Render error: {:?}", e),
            }

            let clock = driver.clock();
            if clock.fps_updated() {
                debug!(
                    fps = clock.fps(),
                    frame = clock.frame(),
                    live = driver.store().len(),
                    "frame stats"
                );
            }
        }

        if driver.should_continue() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            info!(frames = driver.frames(), "effect stopped");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                error!("Initialization failed: {err}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.stop.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.stop.stop();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(driver) = &mut self.driver {
                    driver.backend_mut().resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
