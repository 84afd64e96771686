use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::PixelSize;
use crate::core::{Scene, SurfaceHost};
use crate::device::{Gpu, GpuInit};

use super::WindowDriver;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "rhiquad".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// The winit window as seen by the driver.
pub struct WinitHost {
    window: Arc<Window>,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl SurfaceHost for WinitHost {
    fn surface_pixel_size(&self) -> PixelSize {
        self.window.inner_size().into()
    }

    fn logical_size(&self) -> (f32, f32) {
        let size: LogicalSize<f32> = self.window.inner_size().to_logical(self.window.scale_factor());
        (size.width, size.height)
    }

    fn request_update(&self) {
        self.window.request_redraw();
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and renders `scene` into it until the window closes.
    ///
    /// Returns the first fatal error, if any.
    pub fn run<S>(config: RuntimeConfig, gpu_init: GpuInit, scene: S) -> Result<()>
    where
        S: Scene<Gpu> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(config, gpu_init, scene);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState<S>
where
    S: Scene<Gpu>,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    pending_scene: Option<S>,
    driver: Option<WindowDriver<Gpu, S, WinitHost>>,
    window_id: Option<WindowId>,
    occluded: bool,
    fatal: Option<anyhow::Error>,
}

impl<S> AppState<S>
where
    S: Scene<Gpu>,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene: S) -> Self {
        Self {
            config,
            gpu_init,
            pending_scene: Some(scene),
            driver: None,
            window_id: None,
            occluded: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.surface_about_to_be_destroyed();
            driver.release_resources();
        }
        self.driver = None;
        event_loop.exit();
    }

    fn create_driver(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed")?;
        let scene = self
            .pending_scene
            .take()
            .context("window already created")?;

        self.window_id = Some(window.id());
        self.driver = Some(WindowDriver::new(gpu, scene, WinitHost::new(window)));
        Ok(())
    }

    fn is_exposed(&self) -> bool {
        let Some(driver) = self.driver.as_ref() else {
            return false;
        };
        !self.occluded && driver.host().window().is_minimized() != Some(true)
    }

    fn expose(&mut self, event_loop: &ActiveEventLoop) {
        let exposed = self.is_exposed();
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        if let Err(e) = driver.expose(exposed) {
            self.fail(event_loop, e);
        }
    }
}

impl<S> ApplicationHandler for AppState<S>
where
    S: Scene<Gpu>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.driver.is_none() {
            if let Err(e) = self.create_driver(event_loop) {
                self.fail(event_loop, e);
                return;
            }
        }
        self.expose(event_loop);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.surface_about_to_be_destroyed();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::debug!("window closed");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::trace!("resized to {width}x{height}");
                self.expose(event_loop);
            }

            WindowEvent::ScaleFactorChanged { .. } => self.expose(event_loop),

            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                self.expose(event_loop);
            }

            WindowEvent::RedrawRequested => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                if let Err(e) = driver.render() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.release_resources();
        }
    }
}
