use anyhow::{Context, Result};

use crate::assets::{AssetRoot, ShaderPair};
use crate::coords::Viewport;
use crate::core::{FrameCtx, Scene, SetupCtx};
use crate::paint::Color;
use crate::rhi::{ImageData, RenderTargetRef, Rhi};

use super::content_texture;
use super::quad::{CLIP_QUAD, CONTENT_SLOTS, TexturedQuad, write_matrix};
use super::transform::view_axis_rotation;

/// Single pass: the rotating textured quad drawn straight into the swapchain.
pub struct TextureScene {
    shaders: ShaderPair,
    image: Option<ImageData>,
    quad: Option<TexturedQuad>,
}

impl TextureScene {
    pub fn new(shaders: ShaderPair, image: ImageData) -> Self {
        Self {
            shaders,
            image: Some(image),
            quad: None,
        }
    }

    pub fn from_assets(assets: &AssetRoot, image: ImageData) -> Self {
        Self::new(assets.shaders("quad"), image)
    }
}

impl<R: Rhi> Scene<R> for TextureScene {
    fn initialize(&mut self, setup: &mut SetupCtx<'_, R>) -> Result<()> {
        let image = self.image.take().context("texture scene initialized twice")?;
        let shaders = self.shaders.load()?;
        let texture = content_texture(&mut setup.resources, image, setup.initial_updates)?;

        let quad = TexturedQuad::build(
            &mut setup.resources,
            "textured quad",
            shaders,
            &CLIP_QUAD,
            CONTENT_SLOTS,
            texture,
            setup.swapchain_pass,
            setup.initial_updates,
        )?;
        self.quad = Some(quad);
        Ok(())
    }

    fn render(&mut self, frame: FrameCtx<'_>) {
        let Some(quad) = self.quad else {
            return;
        };
        let mut updates = frame.updates;
        write_matrix(&mut updates, quad.ubo, view_axis_rotation(frame.frame_index));

        frame.commands.begin_pass(RenderTargetRef::Swapchain, Color::BLACK, Some(updates));
        quad.record(frame.commands, Viewport::covering(frame.pixel_size));
        frame.commands.end_pass();
    }
}
