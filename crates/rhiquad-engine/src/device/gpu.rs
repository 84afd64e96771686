use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::rhi::{
    BindingDesc, BindingSetDesc, BindingSetId, BufferDesc, BufferId, CommandBuffer, FrameOpError,
    PipelineDesc, PipelineId, RenderPassId, RenderTargetId, ResourceHandle, Rhi, RhiError,
    SAMPLER_BINDING_OFFSET, SamplerDesc, SamplerId, Swapchain, TextureDesc, TextureId,
};

use super::encode::{FrameTarget, encode_frame};
use super::frame::GpuFrame;
use super::registry::{GpuBindingSet, GpuPipeline, GpuRenderTarget, GpuTexture, Registry};
use super::shader::{ENTRY_POINT, create_module};
use super::surface::{self, SurfaceParams, WgpuSwapchain};
use super::{GpuInit, map_surface_error};

/// wgpu rendering context for one window.
///
/// Owns the Instance/Device/Queue and every resource created through
/// the `Rhi` interface. Swapchains borrow the instance and device by clone.
pub struct Gpu {
    instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
    window: Arc<Window>,
    /// Surface created for adapter selection, handed to the first swapchain.
    pending_surface: Option<wgpu::Surface<'static>>,
    surface_params: SurfaceParams,
    registry: Registry,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            flags: init.instance_flags(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rhiquad device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, init.prefer_srgb)
            .context("no supported surface formats")?;
        let surface_params = SurfaceParams {
            format,
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&surface_caps, init.alpha_mode),
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        log::debug!("surface format {format:?}");

        Ok(Self {
            instance,
            device,
            queue,
            window,
            pending_surface: Some(surface),
            surface_params,
            registry: Registry::default(),
        })
    }

    /// Number of live resources created through this context.
    pub fn live_resources(&self) -> usize {
        self.registry.len()
    }

    fn unknown(handle: impl Into<ResourceHandle>) -> RhiError {
        RhiError::UnknownResource(handle.into())
    }

    fn bind_group_layout_entries(desc: &BindingSetDesc) -> Vec<wgpu::BindGroupLayoutEntry> {
        let mut entries = Vec::with_capacity(desc.bindings.len() * 2);
        for binding in &desc.bindings {
            let visibility: wgpu::ShaderStages = binding.stage().into();
            match *binding {
                BindingDesc::SampledTexture { slot, .. } => {
                    entries.push(wgpu::BindGroupLayoutEntry {
                        binding: slot,
                        visibility,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    });
                    entries.push(wgpu::BindGroupLayoutEntry {
                        binding: slot + SAMPLER_BINDING_OFFSET,
                        visibility,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    });
                }
                BindingDesc::UniformBuffer { slot, .. } => {
                    entries.push(wgpu::BindGroupLayoutEntry {
                        binding: slot,
                        visibility,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    });
                }
            }
        }
        entries
    }
}

impl Rhi for Gpu {
    type Swapchain = WgpuSwapchain;

    fn new_swapchain(&mut self) -> WgpuSwapchain {
        WgpuSwapchain::new(
            self.instance.clone(),
            self.device.clone(),
            Arc::clone(&self.window),
            self.pending_surface.take(),
            self.surface_params,
        )
    }

    fn new_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::EmptyBuffer);
        }
        let mut usage = wgpu::BufferUsages::COPY_DST;
        if desc.usage.vertex {
            usage |= wgpu::BufferUsages::VERTEX;
        }
        if desc.usage.uniform {
            usage |= wgpu::BufferUsages::UNIFORM;
        }
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.size,
            usage,
            mapped_at_creation: false,
        });
        let id = BufferId::from_raw(self.registry.next_raw());
        self.registry.buffers.insert(id, buffer);
        Ok(id)
    }

    fn new_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RhiError> {
        if desc.size.is_empty() {
            return Err(RhiError::EmptyTexture);
        }
        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if desc.render_target {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.size.width,
                height: desc.size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = TextureId::from_raw(self.registry.next_raw());
        self.registry.textures.insert(
            id,
            GpuTexture {
                texture,
                view,
                format: desc.format,
                size: desc.size,
                render_target: desc.render_target,
            },
        );
        Ok(id)
    }

    fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, RhiError> {
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(desc.label),
            address_mode_u: desc.address_u,
            address_mode_v: desc.address_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: desc.mag_filter,
            min_filter: desc.min_filter,
            ..Default::default()
        });
        let id = SamplerId::from_raw(self.registry.next_raw());
        self.registry.samplers.insert(id, sampler);
        Ok(id)
    }

    fn new_texture_render_target(&mut self, texture: TextureId) -> Result<RenderTargetId, RhiError> {
        let tex = self
            .registry
            .textures
            .get(&texture)
            .ok_or_else(|| Self::unknown(texture))?;
        if !tex.render_target {
            return Err(RhiError::NotARenderTarget(texture));
        }
        let target = GpuRenderTarget {
            view: tex.texture.create_view(&wgpu::TextureViewDescriptor::default()),
            format: tex.format,
        };
        let id = RenderTargetId::from_raw(self.registry.next_raw());
        self.registry.render_targets.insert(id, target);
        Ok(id)
    }

    fn new_render_pass_descriptor(&mut self, format: wgpu::TextureFormat) -> RenderPassId {
        let id = RenderPassId::from_raw(self.registry.next_raw());
        self.registry.render_passes.insert(id, format);
        id
    }

    fn new_binding_set(&mut self, desc: &BindingSetDesc) -> Result<BindingSetId, RhiError> {
        desc.validate()?;
        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.label),
                entries: &Self::bind_group_layout_entries(desc),
            });

        let mut entries = Vec::with_capacity(desc.bindings.len() * 2);
        for binding in &desc.bindings {
            match *binding {
                BindingDesc::SampledTexture { slot, texture, sampler, .. } => {
                    let tex = self
                        .registry
                        .textures
                        .get(&texture)
                        .ok_or_else(|| Self::unknown(texture))?;
                    let smp = self
                        .registry
                        .samplers
                        .get(&sampler)
                        .ok_or_else(|| Self::unknown(sampler))?;
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot,
                        resource: wgpu::BindingResource::TextureView(&tex.view),
                    });
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot + SAMPLER_BINDING_OFFSET,
                        resource: wgpu::BindingResource::Sampler(smp),
                    });
                }
                BindingDesc::UniformBuffer { slot, buffer, .. } => {
                    let buf = self
                        .registry
                        .buffers
                        .get(&buffer)
                        .ok_or_else(|| Self::unknown(buffer))?;
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot,
                        resource: buf.as_entire_binding(),
                    });
                }
            }
        }

        let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(desc.label),
            layout: &layout,
            entries: &entries,
        });
        let id = BindingSetId::from_raw(self.registry.next_raw());
        self.registry
            .binding_sets
            .insert(id, GpuBindingSet { layout, group });
        Ok(id)
    }

    fn new_graphics_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, RhiError> {
        let (vertex, fragment) = desc.stages()?;
        let format = *self
            .registry
            .render_passes
            .get(&desc.render_pass)
            .ok_or_else(|| Self::unknown(desc.render_pass))?;
        let binding_set = self
            .registry
            .binding_sets
            .get(&desc.binding_set)
            .ok_or_else(|| Self::unknown(desc.binding_set))?;

        let vs = create_module(&self.device, vertex)?;
        let fs = create_module(&self.device, fragment)?;

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[&binding_set.layout],
                immediate_size: 0,
            });

        let attributes: Vec<Vec<wgpu::VertexAttribute>> = (0..desc.vertex_input.bindings.len())
            .map(|index| {
                desc.vertex_input
                    .attributes
                    .iter()
                    .filter(|a| a.binding as usize == index)
                    .map(|a| wgpu::VertexAttribute {
                        format: a.format,
                        offset: a.offset,
                        shader_location: a.location,
                    })
                    .collect()
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = desc
            .vertex_input
            .bindings
            .iter()
            .zip(&attributes)
            .map(|(binding, attributes)| wgpu::VertexBufferLayout {
                array_stride: binding.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            })
            .collect();

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vs,
                    entry_point: Some(ENTRY_POINT),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fs,
                    entry_point: Some(ENTRY_POINT),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let id = PipelineId::from_raw(self.registry.next_raw());
        self.registry.pipelines.insert(
            id,
            GpuPipeline {
                pipeline,
                binding_set: desc.binding_set,
                format,
            },
        );
        Ok(id)
    }

    fn destroy(&mut self, handle: ResourceHandle) {
        if !self.registry.remove(handle) {
            log::trace!("destroy of unknown {handle:?} ignored");
        }
    }

    fn begin_frame(&mut self, swapchain: &mut WgpuSwapchain) -> Result<CommandBuffer, FrameOpError> {
        let surface = swapchain
            .surface()
            .ok_or(FrameOpError::SwapchainOutOfDate)?;
        let frame = GpuFrame::acquire(surface).map_err(map_surface_error)?;
        swapchain.frame = Some(frame);
        Ok(CommandBuffer::new())
    }

    fn end_frame(
        &mut self,
        swapchain: &mut WgpuSwapchain,
        commands: CommandBuffer,
    ) -> Result<(), FrameOpError> {
        let frame = swapchain.frame.take().ok_or(FrameOpError::NoFrame)?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("rhiquad frame encoder"),
            });

        let target = FrameTarget {
            view: &frame.view,
            format: swapchain.color_format(),
        };
        encode_frame(
            &self.queue,
            &self.registry,
            &mut encoder,
            &target,
            commands.into_commands(),
        )?;

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl Drop for Gpu {
    fn drop(&mut self) {
        let live = self.registry.len();
        if live > 0 {
            log::warn!("GPU context dropped with {live} live resources");
        }
    }
}
