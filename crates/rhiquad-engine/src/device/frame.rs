/// Represents a single acquired swapchain image.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub(crate) struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl GpuFrame {
    pub fn acquire(surface: &wgpu::Surface<'_>) -> Result<Self, wgpu::SurfaceError> {
        let surface_texture = surface.get_current_texture()?;
        if surface_texture.suboptimal {
            log::debug!("acquired suboptimal swapchain image");
        }
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { surface_texture, view })
    }

    pub fn present(self) {
        drop(self.view);
        self.surface_texture.present();
    }
}
