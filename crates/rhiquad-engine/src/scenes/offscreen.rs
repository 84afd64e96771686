//! Two-pass variant: the rotating quad is rendered into an offscreen texture,
//! which a second pass composites onto the swapchain as a 300x200 quad.

use anyhow::{Context, Result};

use crate::assets::{AssetRoot, ShaderPair};
use crate::coords::{PixelSize, Viewport};
use crate::core::{FrameCtx, Scene, SetupCtx};
use crate::paint::Color;
use crate::rhi::{
    CommandBuffer, ImageData, RenderPassId, RenderTargetId, RenderTargetRef, ResourceBuilder,
    ResourceUpdateBatch, Rhi, SamplerDesc, TextureDesc, TextureId,
};

use super::content_texture;
use super::quad::{
    CLIP_QUAD, COMPOSITE_QUAD, COMPOSITE_SLOTS, CONTENT_SLOTS, TexturedQuad, write_matrix,
};
use super::transform::{view_axis_rotation, window_ortho};

/// Color format of the offscreen target.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Renders the textured, rotating quad into a texture.
#[derive(Debug, Clone, Copy)]
pub struct OffscreenPass {
    pub target: RenderTargetId,
    pub target_size: PixelSize,
    pub quad: TexturedQuad,
}

impl OffscreenPass {
    fn build<R: Rhi + ?Sized>(
        resources: &mut ResourceBuilder<'_, R>,
        shaders: &ShaderPair,
        image: ImageData,
        surface_size: PixelSize,
        initial_updates: &mut ResourceUpdateBatch,
    ) -> Result<(Self, TextureId)> {
        let shader_stages = shaders.load()?;
        let target_size = PixelSize::new(surface_size.width.max(1), surface_size.height.max(1));
        let target_texture = resources
            .new_texture(&TextureDesc {
                label: "offscreen target",
                format: OFFSCREEN_FORMAT,
                size: target_size,
                render_target: true,
            })
            .context("creating offscreen target")?;
        let target = resources.new_texture_render_target(target_texture)?;
        let pass = resources.new_render_pass_descriptor(OFFSCREEN_FORMAT);

        let content = content_texture(resources, image, initial_updates)?;
        let quad = TexturedQuad::build(
            resources,
            "offscreen quad",
            shader_stages,
            &CLIP_QUAD,
            CONTENT_SLOTS,
            content,
            pass,
            initial_updates,
        )?;
        log::debug!("offscreen target {}x{}", target_size.width, target_size.height);
        Ok((Self { target, target_size, quad }, target_texture))
    }

    fn record(&self, cb: &mut CommandBuffer, updates: ResourceUpdateBatch) {
        cb.begin_pass(RenderTargetRef::Texture(self.target), Color::CYAN, Some(updates));
        self.quad.record(cb, Viewport::covering(self.target_size));
        cb.end_pass();
    }
}

/// Draws the offscreen result onto the swapchain.
#[derive(Debug, Clone, Copy)]
pub struct CompositePass {
    pub quad: TexturedQuad,
}

impl CompositePass {
    fn build<R: Rhi + ?Sized>(
        resources: &mut ResourceBuilder<'_, R>,
        shaders: &ShaderPair,
        source: TextureId,
        swapchain_pass: RenderPassId,
        initial_updates: &mut ResourceUpdateBatch,
    ) -> Result<Self> {
        let shader_stages = shaders.load()?;
        let sampler = resources.new_sampler(&SamplerDesc::linear_clamp("composite sampler"))?;
        let quad = TexturedQuad::build(
            resources,
            "composite quad",
            shader_stages,
            &COMPOSITE_QUAD,
            COMPOSITE_SLOTS,
            (source, sampler),
            swapchain_pass,
            initial_updates,
        )?;
        Ok(Self { quad })
    }

    fn record(&self, cb: &mut CommandBuffer, pixel_size: PixelSize, updates: Option<ResourceUpdateBatch>) {
        cb.begin_pass(RenderTargetRef::Swapchain, Color::BLACK, updates);
        self.quad.record(cb, Viewport::covering(pixel_size));
        cb.end_pass();
    }
}

pub struct TwoPassScene {
    quad_shaders: ShaderPair,
    composite_shaders: ShaderPair,
    image: Option<ImageData>,
    passes: Option<(OffscreenPass, CompositePass)>,
}

impl TwoPassScene {
    pub fn new(quad_shaders: ShaderPair, composite_shaders: ShaderPair, image: ImageData) -> Self {
        Self {
            quad_shaders,
            composite_shaders,
            image: Some(image),
            passes: None,
        }
    }

    pub fn from_assets(assets: &AssetRoot, image: ImageData) -> Self {
        Self::new(assets.shaders("quad"), assets.shaders("composite"), image)
    }

    pub fn offscreen(&self) -> Option<&OffscreenPass> {
        self.passes.as_ref().map(|(o, _)| o)
    }
}

impl<R: Rhi> Scene<R> for TwoPassScene {
    fn initialize(&mut self, setup: &mut SetupCtx<'_, R>) -> Result<()> {
        let image = self.image.take().context("two-pass scene initialized twice")?;
        let (offscreen, target_texture) = OffscreenPass::build(
            &mut setup.resources,
            &self.quad_shaders,
            image,
            setup.surface_size,
            setup.initial_updates,
        )?;
        let composite = CompositePass::build(
            &mut setup.resources,
            &self.composite_shaders,
            target_texture,
            setup.swapchain_pass,
            setup.initial_updates,
        )?;
        self.passes = Some((offscreen, composite));
        Ok(())
    }

    fn render(&mut self, frame: FrameCtx<'_>) {
        let Some((offscreen, composite)) = self.passes else {
            return;
        };
        let (w, h) = frame.logical_size;
        let mut updates = frame.updates;
        write_matrix(&mut updates, offscreen.quad.ubo, view_axis_rotation(frame.frame_index));
        write_matrix(&mut updates, composite.quad.ubo, window_ortho(w, h));

        offscreen.record(frame.commands, updates);
        composite.record(frame.commands, frame.pixel_size, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::{Command, ReleasePool, Swapchain, UpdateOp};
    use crate::testing::{MockRhi, initialize_scene, record_frame, upload_count};

    fn scene() -> TwoPassScene {
        TwoPassScene::from_assets(
            &AssetRoot::bundled(),
            ImageData::solid(PixelSize::new(2, 2), [0, 0, 255, 255]),
        )
    }

    #[test]
    fn offscreen_target_matches_surface_size() {
        let mut rhi = MockRhi::default();
        let mut pool = ReleasePool::new();
        let mut s = scene();
        let initial = initialize_scene(&mut s, &mut rhi, &mut pool, PixelSize::new(640, 480)).unwrap();

        assert_eq!(s.offscreen().unwrap().target_size, PixelSize::new(640, 480));
        // two vertex buffers and one texture
        assert_eq!(initial.len(), 3);
        pool.release_all(&mut rhi);
    }

    #[test]
    fn offscreen_pass_ends_before_composite_begins() {
        let mut rhi = MockRhi::default();
        let mut pool = ReleasePool::new();
        let mut s = scene();
        let initial = initialize_scene(&mut s, &mut rhi, &mut pool, PixelSize::new(300, 200)).unwrap();
        let target = s.offscreen().unwrap().target;

        let frame = record_frame(&mut s, initial, 7, PixelSize::new(300, 200));
        let begins: Vec<usize> = frame
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Command::BeginPass { .. }))
            .map(|(i, _)| i)
            .collect();
        let first_end = frame.iter().position(|c| *c == Command::EndPass).unwrap();
        assert_eq!(begins.len(), 2);
        assert!(first_end < begins[1]);

        match (&frame[begins[0]], &frame[begins[1]]) {
            (
                Command::BeginPass { target: t0, clear: c0, updates: Some(u) },
                Command::BeginPass { target: t1, clear: c1, updates: None },
            ) => {
                assert_eq!(*t0, RenderTargetRef::Texture(target));
                assert_eq!(*c0, Color::CYAN);
                assert_eq!(*t1, RenderTargetRef::Swapchain);
                assert_eq!(*c1, Color::BLACK);
                let matrices = u
                    .ops()
                    .iter()
                    .filter(|op| matches!(op, UpdateOp::UpdateDynamicBuffer { .. }))
                    .count();
                assert_eq!(matrices, 2);
            }
            other => panic!("unexpected passes {other:?}"),
        }
        assert_eq!(upload_count(&frame), 3);
        assert_eq!(
            frame.iter().filter(|c| **c == Command::Draw { vertex_count: 6 }).count(),
            2
        );
        pool.release_all(&mut rhi);
    }

    #[test]
    fn recorded_frame_is_accepted_by_backend() {
        let mut rhi = MockRhi::default();
        let mut pool = ReleasePool::new();
        let mut s = scene();
        let initial = initialize_scene(&mut s, &mut rhi, &mut pool, PixelSize::new(300, 200)).unwrap();

        let mut sc = rhi.new_swapchain();
        assert!(sc.create_or_resize(PixelSize::new(300, 200)));
        let mut cb = rhi.begin_frame(&mut sc).unwrap();
        Scene::<MockRhi>::render(
            &mut s,
            FrameCtx {
                commands: &mut cb,
                updates: initial,
                frame_index: 0,
                pixel_size: PixelSize::new(300, 200),
                logical_size: (300.0, 200.0),
            },
        );
        rhi.end_frame(&mut sc, cb).unwrap();
        assert_eq!(rhi.log().frames.len(), 1);
        pool.release_all(&mut rhi);
    }

    #[test]
    fn zero_surface_still_gets_a_one_pixel_target() {
        let mut rhi = MockRhi::default();
        let mut pool = ReleasePool::new();
        let mut s = scene();
        initialize_scene(&mut s, &mut rhi, &mut pool, PixelSize::new(0, 10)).unwrap();
        assert_eq!(s.offscreen().unwrap().target_size, PixelSize::new(1, 10));
        pool.release_all(&mut rhi);
    }
}
