//! Replays a recorded command buffer into a wgpu command encoder.

use crate::coords::{PixelSize, Viewport};
use crate::rhi::{Command, FrameOpError, RenderTargetRef, TextureId, UpdateOp};

use super::registry::{GpuPipeline, Registry};

/// Swapchain image the frame renders into.
pub(crate) struct FrameTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

/// Stages buffer and texture writes on the queue.
///
/// Queue writes are executed before the next submission, which is the one
/// carrying this frame.
pub(crate) fn apply_updates(queue: &wgpu::Queue, registry: &Registry, ops: Vec<UpdateOp>) -> Result<(), FrameOpError> {
    for op in ops {
        match op {
            UpdateOp::UploadStaticBuffer { buffer, offset, data }
            | UpdateOp::UpdateDynamicBuffer { buffer, offset, data } => {
                queue.write_buffer(registry.buffer(buffer)?, offset, &data);
            }
            UpdateOp::UploadTexture { texture, image } => {
                let target = registry.texture(texture)?;
                let size = image.size();
                check_upload_size(texture, size, target.size)?;
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &target.texture,
                        mip_level: 0,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    image.bytes(),
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(image.bytes_per_row()),
                        rows_per_image: Some(size.height),
                    },
                    wgpu::Extent3d {
                        width: size.width,
                        height: size.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }
    }
    Ok(())
}

fn check_upload_size(texture: TextureId, image: PixelSize, target: PixelSize) -> Result<(), FrameOpError> {
    if image != target {
        log::error!(
            "texture upload is {}x{}, texture is {}x{}",
            image.width,
            image.height,
            target.width,
            target.height
        );
        return Err(FrameOpError::TextureSizeMismatch(texture));
    }
    Ok(())
}

fn checked_viewport(v: Viewport) -> Result<Viewport, FrameOpError> {
    if v.is_valid() { Ok(v) } else { Err(FrameOpError::InvalidViewport) }
}

/// Encodes every pass of `commands`, in recording order.
pub(crate) fn encode_frame(
    queue: &wgpu::Queue,
    registry: &Registry,
    encoder: &mut wgpu::CommandEncoder,
    frame: &FrameTarget<'_>,
    commands: Vec<Command>,
) -> Result<(), FrameOpError> {
    let mut commands = commands.into_iter();
    while let Some(cmd) = commands.by_ref().next() {
        let Command::BeginPass { target, clear, updates } = cmd else {
            log::warn!("{cmd:?} recorded outside a render pass; ignored");
            continue;
        };
        if let Some(updates) = updates {
            apply_updates(queue, registry, updates.into_ops())?;
        }

        let (view, format) = match target {
            RenderTargetRef::Swapchain => (frame.view, frame.format),
            RenderTargetRef::Texture(id) => {
                let rt = registry.render_target(id)?;
                (&rt.view, rt.format)
            }
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rhiquad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut bound: Option<&GpuPipeline> = None;
        for cmd in commands.by_ref() {
            match cmd {
                Command::EndPass => break,
                Command::SetGraphicsPipeline(id) => {
                    let pipeline = registry.pipeline(id)?;
                    if pipeline.format != format {
                        return Err(FrameOpError::IncompatibleRenderPass(id));
                    }
                    rpass.set_pipeline(&pipeline.pipeline);
                    bound = Some(pipeline);
                }
                Command::SetViewport(v) => {
                    let v = checked_viewport(v)?;
                    rpass.set_viewport(v.x, v.y, v.width, v.height, 0.0, 1.0);
                }
                Command::SetShaderResources(set) => {
                    let Some(set) = set.or(bound.map(|p| p.binding_set)) else {
                        log::warn!("shader resources set before any pipeline; ignored");
                        continue;
                    };
                    rpass.set_bind_group(0, &registry.binding_set(set)?.group, &[]);
                }
                Command::SetVertexInput { start_binding, inputs } => {
                    for (slot, input) in (start_binding..).zip(inputs) {
                        let buffer = registry.buffer(input.buffer)?;
                        rpass.set_vertex_buffer(slot, buffer.slice(input.offset..));
                    }
                }
                Command::Draw { vertex_count } => rpass.draw(0..vertex_count, 0..1),
                Command::BeginPass { .. } => {
                    log::warn!("nested render pass ignored");
                }
            }
        }
    }
    Ok(())
}
