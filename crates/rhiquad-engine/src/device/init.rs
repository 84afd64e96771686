/// How `Gpu::new` picks its backend, device and surface settings.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Enables API validation and debug labels on the instance.
    ///
    /// On by default in debug builds only.
    pub validation: bool,

    /// Pick an sRGB swapchain format if the surface offers one.
    pub prefer_srgb: bool,

    /// FIFO paces the redraw loop to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unset or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Frames the swapchain may queue ahead of the display.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    pub(crate) fn instance_flags(&self) -> wgpu::InstanceFlags {
        if self.validation {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::VULKAN,
            validation: cfg!(debug_assertions),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
