//! Hardware-abstraction rendering interface.
//!
//! This module defines what the lifecycle and frame loop need from a GPU:
//! - typed resource handles and plain-data descriptors
//! - a swapchain bound to one window surface
//! - deferred resource-update batches
//! - a per-frame command buffer recording render passes in submission order
//!
//! The wgpu implementation lives in `crate::device`.

mod command;
mod desc;
mod error;
mod handles;
mod image;
mod release;
mod shader;
mod updates;

pub use command::{Command, CommandBuffer, VertexInput};
pub use desc::{
    BindingDesc, BindingSetDesc, BufferDesc, BufferKind, BufferUsage, MAT4_SIZE, PipelineDesc,
    SAMPLER_BINDING_OFFSET, SamplerDesc, ShaderStage, TextureDesc, VertexInputAttribute,
    VertexInputBinding, VertexInputLayout,
};
pub use error::{FrameOpError, RhiError};
pub use handles::{
    BindingSetId, BufferId, PipelineId, RenderPassId, RenderTargetId, RenderTargetRef,
    ResourceHandle, SamplerId, TextureId,
};
pub use image::ImageData;
pub use release::{ReleasePool, ResourceBuilder};
pub use shader::{Shader, ShaderCode, load_shader, load_valid_shader};
pub use updates::{ResourceUpdateBatch, UpdateOp};

use crate::coords::PixelSize;

/// Presentable image chain bound to one window surface.
pub trait Swapchain {
    /// Size the swapchain images currently have. Empty when not created.
    fn current_pixel_size(&self) -> PixelSize;

    /// Color format of the swapchain images.
    fn color_format(&self) -> wgpu::TextureFormat;

    /// Creates the underlying surface chain, or resizes it, to `surface_size`.
    ///
    /// Returns false without side effects when the size is empty or the
    /// surface cannot be (re)configured.
    fn create_or_resize(&mut self, surface_size: PixelSize) -> bool;

    /// Releases the surface chain. Idempotent.
    fn destroy(&mut self);
}

/// GPU context: device, queue and resource registry.
pub trait Rhi {
    type Swapchain: Swapchain;

    /// Creates a swapchain for the window this context was created for.
    fn new_swapchain(&mut self) -> Self::Swapchain;

    fn new_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId, RhiError>;

    fn new_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RhiError>;

    fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, RhiError>;

    /// Wraps a texture created with `render_target: true` as a color attachment.
    fn new_texture_render_target(&mut self, texture: TextureId) -> Result<RenderTargetId, RhiError>;

    /// Describes attachments of the given color format.
    fn new_render_pass_descriptor(&mut self, format: wgpu::TextureFormat) -> RenderPassId;

    fn new_binding_set(&mut self, desc: &BindingSetDesc) -> Result<BindingSetId, RhiError>;

    fn new_graphics_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, RhiError>;

    /// Destroys a resource. Unknown handles are ignored.
    fn destroy(&mut self, handle: ResourceHandle);

    /// A fresh, empty update batch.
    fn next_resource_update_batch(&mut self) -> ResourceUpdateBatch {
        ResourceUpdateBatch::new()
    }

    /// Acquires the next swapchain image and opens a command buffer for it.
    fn begin_frame(&mut self, swapchain: &mut Self::Swapchain) -> Result<CommandBuffer, FrameOpError>;

    /// Encodes, submits and presents the frame opened by `begin_frame`.
    fn end_frame(
        &mut self,
        swapchain: &mut Self::Swapchain,
        commands: CommandBuffer,
    ) -> Result<(), FrameOpError>;
}
