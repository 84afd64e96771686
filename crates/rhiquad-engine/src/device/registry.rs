//! Handle-to-object tables of the wgpu backend.

use std::collections::HashMap;

use crate::coords::PixelSize;
use crate::rhi::{
    BindingSetId, BufferId, FrameOpError, PipelineId, RenderPassId, RenderTargetId,
    ResourceHandle, SamplerId, TextureId,
};

pub(crate) struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: PixelSize,
    pub render_target: bool,
}

pub(crate) struct GpuRenderTarget {
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

pub(crate) struct GpuBindingSet {
    pub layout: wgpu::BindGroupLayout,
    pub group: wgpu::BindGroup,
}

pub(crate) struct GpuPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub binding_set: BindingSetId,
    /// Color format of the render pass the pipeline was built against.
    pub format: wgpu::TextureFormat,
}

#[derive(Default)]
pub(crate) struct Registry {
    next_raw: u32,
    pub buffers: HashMap<BufferId, wgpu::Buffer>,
    pub textures: HashMap<TextureId, GpuTexture>,
    pub samplers: HashMap<SamplerId, wgpu::Sampler>,
    pub render_targets: HashMap<RenderTargetId, GpuRenderTarget>,
    pub render_passes: HashMap<RenderPassId, wgpu::TextureFormat>,
    pub binding_sets: HashMap<BindingSetId, GpuBindingSet>,
    pub pipelines: HashMap<PipelineId, GpuPipeline>,
}

impl Registry {
    /// Next unused raw id. Ids are never reused within one context.
    pub fn next_raw(&mut self) -> u32 {
        self.next_raw += 1;
        self.next_raw
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
            + self.textures.len()
            + self.samplers.len()
            + self.render_targets.len()
            + self.render_passes.len()
            + self.binding_sets.len()
            + self.pipelines.len()
    }

    /// Drops the object behind `handle`, destroying GPU memory eagerly.
    pub fn remove(&mut self, handle: ResourceHandle) -> bool {
        match handle {
            ResourceHandle::Buffer(id) => self.buffers.remove(&id).map(|b| b.destroy()).is_some(),
            ResourceHandle::Texture(id) => {
                self.textures.remove(&id).map(|t| t.texture.destroy()).is_some()
            }
            ResourceHandle::Sampler(id) => self.samplers.remove(&id).is_some(),
            ResourceHandle::RenderTarget(id) => self.render_targets.remove(&id).is_some(),
            ResourceHandle::RenderPass(id) => self.render_passes.remove(&id).is_some(),
            ResourceHandle::BindingSet(id) => self.binding_sets.remove(&id).is_some(),
            ResourceHandle::Pipeline(id) => self.pipelines.remove(&id).is_some(),
        }
    }

    pub fn buffer(&self, id: BufferId) -> Result<&wgpu::Buffer, FrameOpError> {
        self.buffers.get(&id).ok_or(FrameOpError::UnknownResource(id.into()))
    }

    pub fn texture(&self, id: TextureId) -> Result<&GpuTexture, FrameOpError> {
        self.textures.get(&id).ok_or(FrameOpError::UnknownResource(id.into()))
    }

    pub fn render_target(&self, id: RenderTargetId) -> Result<&GpuRenderTarget, FrameOpError> {
        self.render_targets.get(&id).ok_or(FrameOpError::UnknownResource(id.into()))
    }

    pub fn binding_set(&self, id: BindingSetId) -> Result<&GpuBindingSet, FrameOpError> {
        self.binding_sets.get(&id).ok_or(FrameOpError::UnknownResource(id.into()))
    }

    pub fn pipeline(&self, id: PipelineId) -> Result<&GpuPipeline, FrameOpError> {
        self.pipelines.get(&id).ok_or(FrameOpError::UnknownResource(id.into()))
    }
}
