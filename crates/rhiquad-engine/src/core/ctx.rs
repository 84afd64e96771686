use crate::coords::PixelSize;
use crate::rhi::{CommandBuffer, RenderPassId, ResourceBuilder, ResourceUpdateBatch, Rhi};

/// Context passed to `Scene::initialize`.
pub struct SetupCtx<'a, R: Rhi> {
    /// Allocator registering everything in the window's release pool.
    pub resources: ResourceBuilder<'a, R>,
    /// Render-pass descriptor compatible with the swapchain.
    pub swapchain_pass: RenderPassId,
    /// Live surface size at initialization time.
    pub surface_size: PixelSize,
    /// One-time uploads, deferred to the first frame.
    pub initial_updates: &'a mut ResourceUpdateBatch,
}

/// Per-frame context passed to `Scene::render`.
pub struct FrameCtx<'a> {
    pub commands: &'a mut CommandBuffer,
    /// Updates for this frame; owned so the scene can move them into a pass.
    pub updates: ResourceUpdateBatch,
    /// Monotonic frame counter (wrapping).
    pub frame_index: u32,
    /// Current swapchain size in physical pixels.
    pub pixel_size: PixelSize,
    /// Window size in logical units.
    pub logical_size: (f32, f32),
}
