use std::sync::Arc;

use winit::window::Window;

use crate::coords::PixelSize;
use crate::rhi::Swapchain;

use super::frame::GpuFrame;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Surface settings fixed for the lifetime of the GPU context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfaceParams {
    pub format: wgpu::TextureFormat,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: wgpu::CompositeAlphaMode,
    pub desired_maximum_frame_latency: u32,
}

impl SurfaceParams {
    fn configuration(&self, size: PixelSize) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: size.width,
            height: size.height,
            present_mode: self.present_mode,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        }
    }
}

/// Window surface plus its current configuration.
///
/// The wgpu surface itself is created lazily and dropped on `destroy`, so a
/// swapchain never outlives the platform surface it was bound to.
pub struct WgpuSwapchain {
    instance: wgpu::Instance,
    device: wgpu::Device,
    window: Arc<Window>,
    surface: Option<wgpu::Surface<'static>>,
    params: SurfaceParams,
    current: PixelSize,
    pub(crate) frame: Option<GpuFrame>,
}

impl WgpuSwapchain {
    pub(crate) fn new(
        instance: wgpu::Instance,
        device: wgpu::Device,
        window: Arc<Window>,
        surface: Option<wgpu::Surface<'static>>,
        params: SurfaceParams,
    ) -> Self {
        Self {
            instance,
            device,
            window,
            surface,
            params,
            current: PixelSize::ZERO,
            frame: None,
        }
    }

    /// The configured surface, if any.
    pub(crate) fn surface(&self) -> Option<&wgpu::Surface<'static>> {
        self.surface.as_ref().filter(|_| !self.current.is_empty())
    }
}

impl Swapchain for WgpuSwapchain {
    fn current_pixel_size(&self) -> PixelSize {
        self.current
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.params.format
    }

    fn create_or_resize(&mut self, surface_size: PixelSize) -> bool {
        // wgpu cannot configure a 0x0 surface.
        if surface_size.is_empty() {
            return false;
        }
        if self.surface.is_none() {
            match self.instance.create_surface(Arc::clone(&self.window)) {
                Ok(surface) => self.surface = Some(surface),
                Err(e) => {
                    log::warn!("failed to create wgpu surface: {e}");
                    return false;
                }
            }
        }
        let Some(surface) = self.surface.as_ref() else {
            return false;
        };

        // An image acquired for the old configuration must not be presented.
        self.frame = None;
        surface.configure(&self.device, &self.params.configuration(surface_size));
        self.current = surface_size;
        true
    }

    fn destroy(&mut self) {
        self.frame = None;
        if self.surface.take().is_some() {
            log::debug!("wgpu surface released");
        }
        self.current = PixelSize::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>, alpha_modes: Vec<wgpu::CompositeAlphaMode>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes,
            ..Default::default()
        }
    }

    #[test]
    fn srgb_format_is_preferred() {
        let c = caps(
            vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn no_formats_means_no_surface() {
        assert_eq!(choose_surface_format(&caps(vec![], vec![]), true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(
            choose_alpha_mode(&caps(vec![], vec![]), None),
            wgpu::CompositeAlphaMode::Auto
        );
    }

    #[test]
    fn configuration_uses_requested_size() {
        let params = SurfaceParams {
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            desired_maximum_frame_latency: 2,
        };
        let config = params.configuration(PixelSize::new(300, 200));
        assert_eq!((config.width, config.height), (300, 200));
        assert_eq!(config.format, params.format);
    }
}
