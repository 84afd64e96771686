//! Geometry and pass helpers shared by the textured scenes.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::coords::Viewport;
use crate::rhi::{
    BindingDesc, BindingSetDesc, BindingSetId, BufferDesc, BufferId, CommandBuffer, PipelineDesc,
    PipelineId, RenderPassId, ResourceBuilder, ResourceUpdateBatch, Rhi, RhiError, SamplerId,
    Shader, ShaderStage, TextureId, VertexInput, VertexInputAttribute, VertexInputBinding,
    VertexInputLayout,
};

/// Two triangles.
pub const QUAD_VERTEX_COUNT: u32 = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    /// One interleaved binding: location 0 = position, location 1 = uv.
    pub fn layout() -> VertexInputLayout {
        VertexInputLayout {
            bindings: vec![VertexInputBinding {
                stride: std::mem::size_of::<TexturedVertex>() as u64,
            }],
            attributes: vec![
                VertexInputAttribute {
                    binding: 0,
                    location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                },
                VertexInputAttribute {
                    binding: 0,
                    location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 2 * std::mem::size_of::<f32>() as u64,
                },
            ],
        }
    }
}

/// Full-viewport quad in clip space.
pub const CLIP_QUAD: [TexturedVertex; 6] = [
    TexturedVertex::new(-1.0, -1.0, 0.0, 0.0),
    TexturedVertex::new(1.0, 1.0, 1.0, 1.0),
    TexturedVertex::new(-1.0, 1.0, 0.0, 1.0),
    TexturedVertex::new(-1.0, -1.0, 0.0, 0.0),
    TexturedVertex::new(1.0, -1.0, 1.0, 0.0),
    TexturedVertex::new(1.0, 1.0, 1.0, 1.0),
];

/// 300x200 quad at the window origin, in window units.
pub const COMPOSITE_QUAD: [TexturedVertex; 6] = [
    TexturedVertex::new(0.0, 0.0, 0.0, 0.0),
    TexturedVertex::new(300.0, 200.0, 1.0, 1.0),
    TexturedVertex::new(0.0, 200.0, 0.0, 1.0),
    TexturedVertex::new(0.0, 0.0, 0.0, 0.0),
    TexturedVertex::new(300.0, 0.0, 1.0, 0.0),
    TexturedVertex::new(300.0, 200.0, 1.0, 1.0),
];

pub fn vertex_bytes(vertices: &[TexturedVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Triangle-list pipeline over `TexturedVertex` input.
pub fn textured_pipeline(
    label: &'static str,
    shader_stages: Vec<Shader>,
    binding_set: BindingSetId,
    render_pass: RenderPassId,
) -> PipelineDesc {
    PipelineDesc {
        label,
        shader_stages,
        vertex_input: TexturedVertex::layout(),
        topology: wgpu::PrimitiveTopology::TriangleList,
        binding_set,
        render_pass,
    }
}

/// Slot indices a textured quad's shaders expect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuadSlots {
    /// Sampled texture, fragment stage.
    pub texture: u32,
    /// Transform uniform, vertex stage.
    pub uniform: u32,
}

/// `quad.*.wgsl`: texture at 0, transform at 1.
pub const CONTENT_SLOTS: QuadSlots = QuadSlots { texture: 0, uniform: 1 };

/// `composite.*.wgsl`: transform at 0, texture at 1.
pub const COMPOSITE_SLOTS: QuadSlots = QuadSlots { texture: 1, uniform: 0 };

/// Vertex buffer, transform uniform and pipeline of one textured quad draw.
#[derive(Debug, Copy, Clone)]
pub struct TexturedQuad {
    pub vbo: BufferId,
    pub ubo: BufferId,
    pub pipeline: PipelineId,
}

impl TexturedQuad {
    /// Allocates the quad's resources and queues its vertex upload.
    ///
    /// `texture` is sampled through `sampler`; the pipeline is built against
    /// `render_pass`.
    #[allow(clippy::too_many_arguments)]
    pub fn build<R: Rhi + ?Sized>(
        resources: &mut ResourceBuilder<'_, R>,
        label: &'static str,
        shader_stages: Vec<Shader>,
        vertices: &[TexturedVertex],
        slots: QuadSlots,
        (texture, sampler): (TextureId, SamplerId),
        render_pass: RenderPassId,
        initial_updates: &mut ResourceUpdateBatch,
    ) -> Result<Self, RhiError> {
        let bytes = vertex_bytes(vertices);
        let vbo = resources.new_buffer(&BufferDesc::static_vertex(label, bytes.len() as u64))?;
        let ubo = resources.new_buffer(&BufferDesc::matrix_uniform(label))?;

        let binding_set = resources.new_binding_set(&BindingSetDesc {
            label,
            bindings: vec![
                BindingDesc::sampled_texture(slots.texture, ShaderStage::Fragment, texture, sampler),
                BindingDesc::uniform_buffer(slots.uniform, ShaderStage::Vertex, ubo),
            ],
        })?;
        let pipeline = resources.new_graphics_pipeline(&textured_pipeline(
            label,
            shader_stages,
            binding_set,
            render_pass,
        ))?;

        initial_updates.upload_static_buffer(vbo, 0, bytes);
        Ok(Self { vbo, ubo, pipeline })
    }

    /// Records one pass drawing this quad into `viewport`.
    pub fn record(&self, cb: &mut CommandBuffer, viewport: Viewport) {
        draw_quad(cb, self.pipeline, viewport, self.vbo);
    }
}

/// Queues a column-major matrix write into a uniform buffer.
pub fn write_matrix(updates: &mut ResourceUpdateBatch, buffer: BufferId, m: Mat4) {
    let cols = m.to_cols_array();
    updates.update_dynamic_buffer(buffer, 0, bytemuck::cast_slice(&cols));
}

/// Records the body of a quad pass: pipeline, viewport, bindings, vertices, draw.
pub fn draw_quad(cb: &mut CommandBuffer, pipeline: PipelineId, viewport: Viewport, vbo: BufferId) {
    cb.set_graphics_pipeline(pipeline);
    cb.set_viewport(viewport);
    cb.set_shader_resources();
    cb.set_vertex_input(0, &[VertexInput::new(vbo, 0)]);
    cb.draw(QUAD_VERTEX_COUNT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelSize;
    use crate::rhi::{Command, ReleasePool, SamplerDesc, TextureDesc, UpdateOp};
    use crate::testing::{MockRhi, SWAPCHAIN_FORMAT};

    #[test]
    fn vertex_is_four_floats() {
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 16);
        assert_eq!(vertex_bytes(&CLIP_QUAD).len(), 96);
    }

    #[test]
    fn layout_matches_vertex_struct() {
        let layout = TexturedVertex::layout();
        assert_eq!(layout.bindings[0].stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].location, 1);
    }

    #[test]
    fn composite_quad_spans_300_by_200() {
        let max_x = COMPOSITE_QUAD.iter().map(|v| v.position[0]).fold(0.0, f32::max);
        let max_y = COMPOSITE_QUAD.iter().map(|v| v.position[1]).fold(0.0, f32::max);
        assert_eq!((max_x, max_y), (300.0, 200.0));
    }

    #[test]
    fn matrix_write_is_64_bytes() {
        let mut updates = ResourceUpdateBatch::new();
        write_matrix(&mut updates, BufferId::from_raw(1), Mat4::IDENTITY);
        match &updates.ops()[0] {
            UpdateOp::UpdateDynamicBuffer { data, offset, .. } => {
                assert_eq!(*offset, 0);
                assert_eq!(data.len(), 64);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn dummy_shaders() -> Vec<Shader> {
        vec![
            Shader::from_bytes(ShaderStage::Vertex, "t.vert", b"@vertex fn main() {}".to_vec()),
            Shader::from_bytes(ShaderStage::Fragment, "t.frag", b"@fragment fn main() {}".to_vec()),
        ]
    }

    #[test]
    fn build_tracks_everything_and_queues_vertices() {
        let mut rhi = MockRhi::default();
        let mut pool = ReleasePool::new();
        let mut initial = ResourceUpdateBatch::new();
        let mut res = ResourceBuilder::new(&mut rhi, &mut pool);
        let texture = res
            .new_texture(&TextureDesc {
                label: "t",
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                size: PixelSize::new(2, 2),
                render_target: false,
            })
            .unwrap();
        let sampler = res.new_sampler(&SamplerDesc::linear_clamp("s")).unwrap();
        let pass = res.new_render_pass_descriptor(SWAPCHAIN_FORMAT);

        let quad = TexturedQuad::build(
            &mut res,
            "quad",
            dummy_shaders(),
            &CLIP_QUAD,
            CONTENT_SLOTS,
            (texture, sampler),
            pass,
            &mut initial,
        )
        .unwrap();

        // texture, sampler, pass, vbo, ubo, binding set, pipeline
        assert_eq!(pool.len(), 7);
        assert!(pool.contains(quad.pipeline));
        assert_eq!(initial.len(), 1);
        assert!(matches!(
            initial.ops()[0],
            UpdateOp::UploadStaticBuffer { buffer, .. } if buffer == quad.vbo
        ));
        pool.release_all(&mut rhi);
    }

    #[test]
    fn record_draws_six_vertices() {
        let quad = TexturedQuad {
            vbo: BufferId::from_raw(1),
            ubo: BufferId::from_raw(2),
            pipeline: PipelineId::from_raw(3),
        };
        let mut cb = CommandBuffer::new();
        cb.begin_pass(crate::rhi::RenderTargetRef::Swapchain, crate::paint::Color::BLACK, None);
        quad.record(&mut cb, Viewport::new(0.0, 0.0, 10.0, 10.0));
        cb.end_pass();
        assert!(cb.commands().contains(&Command::Draw { vertex_count: 6 }));
        assert!(cb.commands().contains(&Command::SetGraphicsPipeline(quad.pipeline)));
    }
}
