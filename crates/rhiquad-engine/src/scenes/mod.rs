//! The three demo variants.
//!
//! Every scene is generic over the rendering interface; the runtime picks
//! the wgpu backend, tests pick the recording one.

mod clear;
mod offscreen;
mod quad;
mod texture;
mod transform;

pub use clear::ClearScene;
pub use offscreen::{CompositePass, OFFSCREEN_FORMAT, OffscreenPass, TwoPassScene};
pub use quad::{
    CLIP_QUAD, COMPOSITE_QUAD, COMPOSITE_SLOTS, CONTENT_SLOTS, QUAD_VERTEX_COUNT, QuadSlots,
    TexturedQuad, TexturedVertex,
};
pub use texture::TextureScene;
pub use transform::{view_axis_rotation, window_ortho};

use anyhow::{Context, Result};

use crate::rhi::{
    ImageData, ResourceBuilder, ResourceUpdateBatch, Rhi, SamplerDesc, SamplerId, TextureDesc,
    TextureId,
};

/// Format of textures decoded from image files.
pub const CONTENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Creates a sampled texture sized to `image` and queues its pixel upload.
pub(crate) fn content_texture<R: Rhi + ?Sized>(
    resources: &mut ResourceBuilder<'_, R>,
    image: ImageData,
    initial_updates: &mut ResourceUpdateBatch,
) -> Result<(TextureId, SamplerId)> {
    let texture = resources
        .new_texture(&TextureDesc {
            label: "content texture",
            format: CONTENT_FORMAT,
            size: image.size(),
            render_target: false,
        })
        .context("creating content texture")?;
    let sampler = resources.new_sampler(&SamplerDesc::linear_clamp("content sampler"))?;
    initial_updates.upload_texture(texture, image);
    Ok((texture, sampler))
}
