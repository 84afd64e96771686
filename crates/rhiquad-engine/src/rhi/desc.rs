//! Plain-data resource descriptors.
//!
//! Format, filter and vertex enums are borrowed from `wgpu` since they are
//! pure data; no backend object ever appears in a descriptor.

use std::collections::HashSet;

use crate::coords::PixelSize;

use super::{BindingSetId, BufferId, RenderPassId, RhiError, SamplerId, Shader, TextureId};

/// Sampler bindings of a sampled-texture slot `n` live at `n + SAMPLER_BINDING_OFFSET`.
///
/// Shaders must declare their samplers accordingly.
pub const SAMPLER_BINDING_OFFSET: u32 = 16;

/// Size in bytes of one 4x4 `f32` transform.
pub const MAT4_SIZE: u64 = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferKind {
    /// Uploaded once; immutable afterwards.
    Static,
    /// Rewritten every frame.
    Dynamic,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BufferUsage {
    pub vertex: bool,
    pub uniform: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    pub label: &'static str,
    pub kind: BufferKind,
    pub usage: BufferUsage,
    pub size: u64,
}

impl BufferDesc {
    pub fn static_vertex(label: &'static str, size: u64) -> Self {
        Self {
            label,
            kind: BufferKind::Static,
            usage: BufferUsage { vertex: true, uniform: false },
            size,
        }
    }

    /// Dynamic uniform buffer sized to exactly one 4x4 matrix.
    pub fn matrix_uniform(label: &'static str) -> Self {
        Self {
            label,
            kind: BufferKind::Dynamic,
            usage: BufferUsage { vertex: false, uniform: true },
            size: MAT4_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: &'static str,
    pub format: wgpu::TextureFormat,
    pub size: PixelSize,
    /// The texture can be wrapped in a render target and drawn into.
    pub render_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerDesc {
    pub label: &'static str,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub address_u: wgpu::AddressMode,
    pub address_v: wgpu::AddressMode,
}

impl SamplerDesc {
    /// Linear filtering, no mipmapping, clamp-to-edge on both axes.
    pub fn linear_clamp(label: &'static str) -> Self {
        Self {
            label,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_u: wgpu::AddressMode::ClampToEdge,
            address_v: wgpu::AddressMode::ClampToEdge,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// WGSL attribute marking an entry point of this stage.
    pub fn wgsl_attribute(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "@vertex",
            ShaderStage::Fragment => "@fragment",
        }
    }
}

impl From<ShaderStage> for wgpu::ShaderStages {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

/// One entry of a shader-binding set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingDesc {
    SampledTexture {
        slot: u32,
        stage: ShaderStage,
        texture: TextureId,
        sampler: SamplerId,
    },
    UniformBuffer {
        slot: u32,
        stage: ShaderStage,
        buffer: BufferId,
    },
}

impl BindingDesc {
    pub fn sampled_texture(slot: u32, stage: ShaderStage, texture: TextureId, sampler: SamplerId) -> Self {
        BindingDesc::SampledTexture { slot, stage, texture, sampler }
    }

    pub fn uniform_buffer(slot: u32, stage: ShaderStage, buffer: BufferId) -> Self {
        BindingDesc::UniformBuffer { slot, stage, buffer }
    }

    pub fn slot(&self) -> u32 {
        match *self {
            BindingDesc::SampledTexture { slot, .. } | BindingDesc::UniformBuffer { slot, .. } => slot,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        match *self {
            BindingDesc::SampledTexture { stage, .. } | BindingDesc::UniformBuffer { stage, .. } => stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSetDesc {
    pub label: &'static str,
    pub bindings: Vec<BindingDesc>,
}

impl BindingSetDesc {
    /// Checks slot uniqueness and range.
    pub fn validate(&self) -> Result<(), RhiError> {
        let mut seen = HashSet::new();
        for b in &self.bindings {
            let slot = b.slot();
            if slot >= SAMPLER_BINDING_OFFSET {
                return Err(RhiError::SlotOutOfRange(slot));
            }
            if !seen.insert(slot) {
                return Err(RhiError::DuplicateSlot(slot));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexInputBinding {
    pub stride: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexInputAttribute {
    pub binding: u32,
    pub location: u32,
    pub format: wgpu::VertexFormat,
    pub offset: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexInputLayout {
    pub bindings: Vec<VertexInputBinding>,
    pub attributes: Vec<VertexInputAttribute>,
}

/// Graphics pipeline description.
///
/// `render_pass` fixes the color format the pipeline can draw into.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    pub label: &'static str,
    pub shader_stages: Vec<Shader>,
    pub vertex_input: VertexInputLayout,
    pub topology: wgpu::PrimitiveTopology,
    pub binding_set: BindingSetId,
    pub render_pass: RenderPassId,
}

impl PipelineDesc {
    /// Returns the vertex and fragment stages, both required to be valid.
    pub fn stages(&self) -> Result<(&Shader, &Shader), RhiError> {
        let find = |stage: ShaderStage| {
            let mut it = self.shader_stages.iter().filter(|s| s.stage() == stage);
            match (it.next(), it.next()) {
                (Some(s), None) => Ok(s),
                _ => Err(RhiError::IncompleteShaderStages),
            }
        };
        let vertex = find(ShaderStage::Vertex)?;
        let fragment = find(ShaderStage::Fragment)?;
        for s in [vertex, fragment] {
            if !s.is_valid() {
                return Err(RhiError::InvalidShader {
                    stage: s.stage(),
                    path: s.origin().to_path_buf(),
                });
            }
        }
        Ok((vertex, fragment))
    }
}
