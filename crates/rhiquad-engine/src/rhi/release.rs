use super::{
    BindingSetDesc, BindingSetId, BufferDesc, BufferId, PipelineDesc, PipelineId, RenderPassId,
    RenderTargetId, ResourceHandle, Rhi, RhiError, SamplerDesc, SamplerId, TextureDesc, TextureId,
};

/// Owns every resource created during initialization.
///
/// Teardown destroys the pooled resources exactly once, in reverse creation
/// order, regardless of which pass logically uses them.
#[derive(Debug, Default)]
pub struct ReleasePool {
    handles: Vec<ResourceHandle>,
}

impl ReleasePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, handle: impl Into<ResourceHandle>) {
        self.handles.push(handle.into());
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn contains(&self, handle: impl Into<ResourceHandle>) -> bool {
        self.handles.contains(&handle.into())
    }

    /// Destroys and forgets every pooled resource. Safe to call repeatedly.
    pub fn release_all<R: Rhi + ?Sized>(&mut self, rhi: &mut R) {
        if self.handles.is_empty() {
            return;
        }
        log::debug!("releasing {} pooled resources", self.handles.len());
        while let Some(handle) = self.handles.pop() {
            rhi.destroy(handle);
        }
    }
}

impl Drop for ReleasePool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            log::warn!(
                "release pool dropped with {} live resources; they were never destroyed",
                self.handles.len()
            );
        }
    }
}

/// Creates resources and registers each one in a release pool.
///
/// This is the only path scenes use to allocate, so nothing created during
/// setup can miss teardown.
pub struct ResourceBuilder<'a, R: Rhi + ?Sized> {
    rhi: &'a mut R,
    pool: &'a mut ReleasePool,
}

impl<'a, R: Rhi + ?Sized> ResourceBuilder<'a, R> {
    pub fn new(rhi: &'a mut R, pool: &'a mut ReleasePool) -> Self {
        Self { rhi, pool }
    }

    pub fn new_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId, RhiError> {
        let id = self.rhi.new_buffer(desc)?;
        self.pool.track(id);
        Ok(id)
    }

    pub fn new_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RhiError> {
        let id = self.rhi.new_texture(desc)?;
        self.pool.track(id);
        Ok(id)
    }

    pub fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, RhiError> {
        let id = self.rhi.new_sampler(desc)?;
        self.pool.track(id);
        Ok(id)
    }

    pub fn new_texture_render_target(&mut self, texture: TextureId) -> Result<RenderTargetId, RhiError> {
        let id = self.rhi.new_texture_render_target(texture)?;
        self.pool.track(id);
        Ok(id)
    }

    pub fn new_render_pass_descriptor(&mut self, format: wgpu::TextureFormat) -> RenderPassId {
        let id = self.rhi.new_render_pass_descriptor(format);
        self.pool.track(id);
        id
    }

    pub fn new_binding_set(&mut self, desc: &BindingSetDesc) -> Result<BindingSetId, RhiError> {
        let id = self.rhi.new_binding_set(desc)?;
        self.pool.track(id);
        Ok(id)
    }

    pub fn new_graphics_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, RhiError> {
        let id = self.rhi.new_graphics_pipeline(desc)?;
        self.pool.track(id);
        Ok(id)
    }
}
