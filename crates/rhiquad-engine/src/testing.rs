//! Recording backend and surface host for tests.

use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::coords::PixelSize;
use crate::core::{FrameCtx, Scene, SetupCtx, SurfaceHost};
use crate::rhi::{
    BindingSetDesc, BindingSetId, BufferDesc, BufferId, Command, CommandBuffer, FrameOpError,
    PipelineDesc, PipelineId, ReleasePool, RenderPassId, RenderTargetId, RenderTargetRef,
    ResourceBuilder, ResourceHandle, ResourceUpdateBatch, Rhi, RhiError, SamplerDesc, SamplerId,
    Swapchain, TextureDesc, TextureId, UpdateOp,
};

pub(crate) const SWAPCHAIN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

/// Everything the mock backend observed.
#[derive(Debug, Default)]
pub(crate) struct MockLog {
    pub created: Vec<ResourceHandle>,
    pub destroyed: Vec<ResourceHandle>,
    /// Command streams of successfully submitted frames.
    pub frames: Vec<Vec<Command>>,
    pub failed_end_frames: u32,
    pub swapchains_created: u32,
    pub swapchain_destroys: u32,
    pub resizes: Vec<PixelSize>,
    pub failed_resizes: u32,
    /// Upcoming `create_or_resize` calls that fail whatever the size.
    pub refused_resizes: u32,
    /// Errors returned by upcoming `begin_frame` calls, front first.
    pub begin_frame_errors: VecDeque<FrameOpError>,
    pub end_frame_errors: VecDeque<FrameOpError>,
}

impl MockLog {
    /// Number of submitted frames carrying at least one upload (static buffer or texture).
    pub fn frames_with_uploads(&self) -> usize {
        self.frames.iter().filter(|f| upload_count(f) > 0).count()
    }
}

pub(crate) fn upload_count(frame: &[Command]) -> usize {
    frame
        .iter()
        .filter_map(|c| match c {
            Command::BeginPass { updates: Some(u), .. } => Some(u),
            _ => None,
        })
        .flat_map(|u| u.ops())
        .filter(|op| {
            matches!(op, UpdateOp::UploadStaticBuffer { .. } | UpdateOp::UploadTexture { .. })
        })
        .count()
}

#[derive(Default)]
pub(crate) struct MockRhi {
    log: Rc<RefCell<MockLog>>,
    next_id: u32,
    live: HashSet<ResourceHandle>,
    render_target_textures: HashSet<TextureId>,
    texture_formats: HashMap<TextureId, wgpu::TextureFormat>,
    target_formats: HashMap<RenderTargetId, wgpu::TextureFormat>,
    pass_formats: HashMap<RenderPassId, wgpu::TextureFormat>,
    pipeline_passes: HashMap<PipelineId, RenderPassId>,
}

impl MockRhi {
    pub fn shared_log(&self) -> Rc<RefCell<MockLog>> {
        Rc::clone(&self.log)
    }

    pub fn log(&self) -> Ref<'_, MockLog> {
        self.log.borrow()
    }

    pub fn live_resources(&self) -> usize {
        self.live.len()
    }

    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn register(&mut self, handle: ResourceHandle) {
        self.live.insert(handle);
        self.log.borrow_mut().created.push(handle);
    }

    fn require(&self, handle: impl Into<ResourceHandle>) -> Result<(), RhiError> {
        let handle = handle.into();
        if self.live.contains(&handle) {
            Ok(())
        } else {
            Err(RhiError::UnknownResource(handle))
        }
    }

    fn check_frame(&self, commands: &[Command]) -> Result<(), FrameOpError> {
        let mut target_format = None;
        for cmd in commands {
            match cmd {
                Command::BeginPass { target, .. } => {
                    target_format = Some(match target {
                        RenderTargetRef::Swapchain => SWAPCHAIN_FORMAT,
                        RenderTargetRef::Texture(rt) => *self
                            .target_formats
                            .get(rt)
                            .ok_or(FrameOpError::UnknownResource((*rt).into()))?,
                    });
                }
                Command::SetGraphicsPipeline(p) => {
                    let pass = self
                        .pipeline_passes
                        .get(p)
                        .ok_or(FrameOpError::UnknownResource((*p).into()))?;
                    if self.pass_formats.get(pass).copied() != target_format {
                        return Err(FrameOpError::IncompatibleRenderPass(*p));
                    }
                }
                Command::SetViewport(v) if !v.is_valid() => {
                    return Err(FrameOpError::InvalidViewport);
                }
                Command::SetVertexInput { inputs, .. } => {
                    for input in inputs {
                        let h = ResourceHandle::from(input.buffer);
                        if !self.live.contains(&h) {
                            return Err(FrameOpError::UnknownResource(h));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Rhi for MockRhi {
    type Swapchain = MockSwapchain;

    fn new_swapchain(&mut self) -> MockSwapchain {
        self.log.borrow_mut().swapchains_created += 1;
        MockSwapchain {
            log: Rc::clone(&self.log),
            current: PixelSize::ZERO,
            alive: false,
            frame_open: false,
        }
    }

    fn new_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::EmptyBuffer);
        }
        let id = BufferId::from_raw(self.alloc());
        self.register(id.into());
        Ok(id)
    }

    fn new_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RhiError> {
        if desc.size.is_empty() {
            return Err(RhiError::EmptyTexture);
        }
        let id = TextureId::from_raw(self.alloc());
        if desc.render_target {
            self.render_target_textures.insert(id);
        }
        self.texture_formats.insert(id, desc.format);
        self.register(id.into());
        Ok(id)
    }

    fn new_sampler(&mut self, _desc: &SamplerDesc) -> Result<SamplerId, RhiError> {
        let id = SamplerId::from_raw(self.alloc());
        self.register(id.into());
        Ok(id)
    }

    fn new_texture_render_target(&mut self, texture: TextureId) -> Result<RenderTargetId, RhiError> {
        self.require(texture)?;
        if !self.render_target_textures.contains(&texture) {
            return Err(RhiError::NotARenderTarget(texture));
        }
        let id = RenderTargetId::from_raw(self.alloc());
        self.target_formats.insert(id, self.texture_formats[&texture]);
        self.register(id.into());
        Ok(id)
    }

    fn new_render_pass_descriptor(&mut self, format: wgpu::TextureFormat) -> RenderPassId {
        let id = RenderPassId::from_raw(self.alloc());
        self.pass_formats.insert(id, format);
        self.register(id.into());
        id
    }

    fn new_binding_set(&mut self, desc: &BindingSetDesc) -> Result<BindingSetId, RhiError> {
        desc.validate()?;
        for b in &desc.bindings {
            match *b {
                crate::rhi::BindingDesc::SampledTexture { texture, sampler, .. } => {
                    self.require(texture)?;
                    self.require(sampler)?;
                }
                crate::rhi::BindingDesc::UniformBuffer { buffer, .. } => self.require(buffer)?,
            }
        }
        let id = BindingSetId::from_raw(self.alloc());
        self.register(id.into());
        Ok(id)
    }

    fn new_graphics_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, RhiError> {
        desc.stages()?;
        self.require(desc.binding_set)?;
        self.require(desc.render_pass)?;
        let id = PipelineId::from_raw(self.alloc());
        self.pipeline_passes.insert(id, desc.render_pass);
        self.register(id.into());
        Ok(id)
    }

    fn destroy(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle) {
            self.log.borrow_mut().destroyed.push(handle);
        }
    }

    fn begin_frame(&mut self, swapchain: &mut MockSwapchain) -> Result<CommandBuffer, FrameOpError> {
        if let Some(err) = self.log.borrow_mut().begin_frame_errors.pop_front() {
            return Err(err);
        }
        if !swapchain.alive {
            return Err(FrameOpError::SwapchainOutOfDate);
        }
        swapchain.frame_open = true;
        Ok(CommandBuffer::new())
    }

    fn end_frame(
        &mut self,
        swapchain: &mut MockSwapchain,
        commands: CommandBuffer,
    ) -> Result<(), FrameOpError> {
        if !std::mem::take(&mut swapchain.frame_open) {
            return Err(FrameOpError::NoFrame);
        }
        let commands = commands.into_commands();
        self.check_frame(&commands)?;
        let mut log = self.log.borrow_mut();
        if let Some(err) = log.end_frame_errors.pop_front() {
            log.failed_end_frames += 1;
            return Err(err);
        }
        log.frames.push(commands);
        Ok(())
    }
}

pub(crate) struct MockSwapchain {
    log: Rc<RefCell<MockLog>>,
    current: PixelSize,
    alive: bool,
    frame_open: bool,
}

impl MockSwapchain {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Swapchain for MockSwapchain {
    fn current_pixel_size(&self) -> PixelSize {
        self.current
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        SWAPCHAIN_FORMAT
    }

    fn create_or_resize(&mut self, surface_size: PixelSize) -> bool {
        let mut log = self.log.borrow_mut();
        if surface_size.is_empty() || log.refused_resizes > 0 {
            log.refused_resizes = log.refused_resizes.saturating_sub(1);
            log.failed_resizes += 1;
            return false;
        }
        self.current = surface_size;
        self.alive = true;
        log.resizes.push(surface_size);
        true
    }

    fn destroy(&mut self) {
        if self.alive {
            self.alive = false;
            self.current = PixelSize::ZERO;
            self.frame_open = false;
            self.log.borrow_mut().swapchain_destroys += 1;
        }
    }
}

/// Window stand-in with a settable size and a tick-request counter.
#[derive(Clone, Default)]
pub(crate) struct MockHost {
    size: Rc<Cell<PixelSize>>,
    requests: Rc<Cell<u32>>,
}

impl MockHost {
    pub fn with_size(width: u32, height: u32) -> Self {
        let host = Self::default();
        host.set_size(width, height);
        host
    }

    pub fn set_size(&self, width: u32, height: u32) {
        self.size.set(PixelSize::new(width, height));
    }

    /// Returns and clears the number of pending tick requests.
    pub fn take_requests(&self) -> u32 {
        self.requests.replace(0)
    }
}

impl SurfaceHost for MockHost {
    fn surface_pixel_size(&self) -> PixelSize {
        self.size.get()
    }

    fn logical_size(&self) -> (f32, f32) {
        let s = self.size.get();
        (s.width as f32, s.height as f32)
    }

    fn request_update(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Runs `Scene::initialize` against the mock the way the window driver does.
pub(crate) fn initialize_scene<S: Scene<MockRhi>>(
    scene: &mut S,
    rhi: &mut MockRhi,
    pool: &mut ReleasePool,
    surface_size: PixelSize,
) -> anyhow::Result<ResourceUpdateBatch> {
    let mut initial_updates = ResourceUpdateBatch::new();
    let mut resources = ResourceBuilder::new(rhi, pool);
    let swapchain_pass = resources.new_render_pass_descriptor(SWAPCHAIN_FORMAT);
    let mut setup = SetupCtx {
        resources,
        swapchain_pass,
        surface_size,
        initial_updates: &mut initial_updates,
    };
    scene.initialize(&mut setup)?;
    Ok(initial_updates)
}

/// Records one frame of `scene` without submitting it.
pub(crate) fn record_frame<S: Scene<MockRhi>>(
    scene: &mut S,
    updates: ResourceUpdateBatch,
    frame_index: u32,
    size: PixelSize,
) -> Vec<Command> {
    let mut commands = CommandBuffer::new();
    scene.render(FrameCtx {
        commands: &mut commands,
        updates,
        frame_index,
        pixel_size: size,
        logical_size: (size.width as f32, size.height as f32),
    });
    commands.into_commands()
}
