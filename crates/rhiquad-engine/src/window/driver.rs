//! Per-window lifecycle: status machine, swapchain management and the frame loop.
//!
//! The driver is platform-agnostic. The runtime feeds it exposure, surface
//! destruction and update ticks; it answers through `SurfaceHost`.

use anyhow::{Context, Result};

use crate::core::{FrameCtx, Scene, SetupCtx, SurfaceHost, WindowStatus};
use crate::rhi::{FrameOpError, ReleasePool, ResourceBuilder, ResourceUpdateBatch, Rhi, Swapchain};

pub struct WindowDriver<R, S, H>
where
    R: Rhi,
    S: Scene<R>,
    H: SurfaceHost,
{
    rhi: Option<R>,
    scene: S,
    host: H,
    status: WindowStatus,
    swapchain: Option<R::Swapchain>,
    release_pool: ReleasePool,
    /// Static uploads recorded at setup, pending until the first rendered frame.
    initial_updates: Option<ResourceUpdateBatch>,
    frame_count: u32,
}

impl<R, S, H> WindowDriver<R, S, H>
where
    R: Rhi,
    S: Scene<R>,
    H: SurfaceHost,
{
    pub fn new(rhi: R, scene: S, host: H) -> Self {
        Self {
            rhi: Some(rhi),
            scene,
            host,
            status: WindowStatus::default(),
            swapchain: None,
            release_pool: ReleasePool::new(),
            initial_updates: None,
            frame_count: 0,
        }
    }

    pub fn status(&self) -> WindowStatus {
        self.status
    }

    /// Frames attempted so far, including those whose submission failed.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn swapchain(&self) -> Option<&R::Swapchain> {
        self.swapchain.as_ref()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The window became visible or hidden, or its geometry changed.
    ///
    /// The first visible exposure initializes the GPU resources; any error
    /// there is fatal.
    pub fn expose(&mut self, exposed: bool) -> Result<()> {
        if exposed && self.status.needs_initialization() {
            self.initialize()?;
        }

        let surface_size = self.host.surface_pixel_size();
        if !exposed {
            if self.status.pause_if_degenerate(surface_size) {
                log::debug!("window hidden with empty surface; paused");
            }
            return Ok(());
        }

        if self.status.wants_swapchain(surface_size) {
            if self.resize_swapchain() && self.status.mark_ready() {
                log::debug!("window ready at {}x{}", surface_size.width, surface_size.height);
                self.host.request_update();
            }
        } else if self.status.is_ready() {
            self.host.request_update();
        }
        Ok(())
    }

    /// The platform surface is going away; the swapchain must not outlive it.
    pub fn surface_about_to_be_destroyed(&mut self) {
        if let Some(mut swapchain) = self.swapchain.take() {
            swapchain.destroy();
            log::info!("swapchain destroyed with its surface");
        }
        self.status.surface_lost();
    }

    /// One update tick: records and submits a frame when ready.
    ///
    /// Only a failure to start the frame (other than an out-of-date
    /// swapchain) is reported as an error.
    pub fn render(&mut self) -> Result<()> {
        if !self.status.is_ready() {
            return Ok(());
        }

        let surface_size = self.host.surface_pixel_size();
        let stale = self
            .swapchain
            .as_ref()
            .is_none_or(|sc| sc.current_pixel_size() != surface_size);
        if stale && !self.resize_swapchain() {
            log::trace!("skipping frame: swapchain cannot match {surface_size:?}");
            return Ok(());
        }

        let (Some(rhi), Some(swapchain)) = (self.rhi.as_mut(), self.swapchain.as_mut()) else {
            return Ok(());
        };

        let mut commands = match rhi.begin_frame(swapchain) {
            Ok(commands) => commands,
            Err(FrameOpError::SwapchainOutOfDate) => {
                log::debug!("swapchain out of date; resizing");
                if self.resize_swapchain() {
                    self.host.request_update();
                }
                return Ok(());
            }
            Err(e) => {
                log::error!("begin frame failed: {e}");
                return Err(e).context("failed to begin frame");
            }
        };

        let mut updates = rhi.next_resource_update_batch();
        if let Some(initial) = self.initial_updates.take() {
            log::debug!("submitting {} initial resource updates", initial.len());
            updates.merge(initial);
        }

        self.scene.render(FrameCtx {
            commands: &mut commands,
            updates,
            frame_index: self.frame_count,
            pixel_size: swapchain.current_pixel_size(),
            logical_size: self.host.logical_size(),
        });

        if let Err(e) = rhi.end_frame(swapchain, commands) {
            log::warn!("end frame failed: {e}");
        }

        self.frame_count = self.frame_count.wrapping_add(1);
        self.host.request_update();
        Ok(())
    }

    /// Full teardown: swapchain, pooled resources, then the GPU context.
    ///
    /// Safe to call repeatedly and from any status.
    pub fn release_resources(&mut self) {
        if let Some(mut swapchain) = self.swapchain.take() {
            swapchain.destroy();
        }
        if let Some(mut rhi) = self.rhi.take() {
            self.release_pool.release_all(&mut rhi);
            log::debug!("GPU context released");
        }
        self.initial_updates = None;
    }

    /// Creates or resizes the swapchain to the live surface size.
    fn resize_swapchain(&mut self) -> bool {
        let Some(rhi) = self.rhi.as_mut() else {
            return false;
        };
        let surface_size = self.host.surface_pixel_size();
        let swapchain = self.swapchain.get_or_insert_with(|| rhi.new_swapchain());
        let resized = swapchain.create_or_resize(surface_size);
        if resized {
            log::info!("swapchain sized to {}x{}", surface_size.width, surface_size.height);
        }
        resized
    }

    fn initialize(&mut self) -> Result<()> {
        let rhi = self.rhi.as_mut().context("GPU context already released")?;
        let swapchain = self.swapchain.get_or_insert_with(|| rhi.new_swapchain());
        let swapchain_format = swapchain.color_format();

        let mut initial_updates = rhi.next_resource_update_batch();
        let mut resources = ResourceBuilder::new(rhi, &mut self.release_pool);
        let swapchain_pass = resources.new_render_pass_descriptor(swapchain_format);
        let mut setup = SetupCtx {
            resources,
            swapchain_pass,
            surface_size: self.host.surface_pixel_size(),
            initial_updates: &mut initial_updates,
        };
        self.scene
            .initialize(&mut setup)
            .context("failed to initialize scene resources")?;

        log::debug!(
            "initialized {} resources, {} pending uploads",
            self.release_pool.len(),
            initial_updates.len()
        );
        self.initial_updates = Some(initial_updates);
        self.status.mark_initialized();
        Ok(())
    }
}

impl<R, S, H> Drop for WindowDriver<R, S, H>
where
    R: Rhi,
    S: Scene<R>,
    H: SurfaceHost,
{
    fn drop(&mut self) {
        self.release_resources();
    }
}
