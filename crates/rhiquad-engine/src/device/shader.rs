use std::borrow::Cow;

use crate::rhi::{RhiError, Shader, ShaderCode, ShaderStage};

/// Entry point every stage module must export.
pub const ENTRY_POINT: &str = "main";

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

fn rejected(stage: ShaderStage, message: impl Into<String>) -> RhiError {
    RhiError::ShaderCompilation {
        stage,
        message: message.into(),
    }
}

/// Parses and validates a shader the way the device would.
///
/// wgpu reports invalid modules through its uncaptured-error path, so
/// modules are checked here before they ever reach the device.
pub fn validate_shader(shader: &Shader) -> Result<(), RhiError> {
    let stage = shader.stage();
    let code = shader.code().ok_or_else(|| RhiError::InvalidShader {
        stage,
        path: shader.origin().to_path_buf(),
    })?;

    let module = match code {
        ShaderCode::Wgsl(source) => naga::front::wgsl::parse_str(source)
            .map_err(|e| rejected(stage, e.emit_to_string(source)))?,
        ShaderCode::SpirV(words) => naga::front::spv::parse_u8_slice(
            bytemuck::cast_slice(words),
            &naga::front::spv::Options::default(),
        )
        .map_err(|e| rejected(stage, e.to_string()))?,
    };

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| rejected(stage, e.as_inner().to_string()))?;

    let has_entry = module
        .entry_points
        .iter()
        .any(|ep| ep.name == ENTRY_POINT && ep.stage == naga_stage(stage));
    if !has_entry {
        return Err(rejected(
            stage,
            format!("no {stage:?} entry point named `{ENTRY_POINT}`"),
        ));
    }
    Ok(())
}

pub(crate) fn create_module(device: &wgpu::Device, shader: &Shader) -> Result<wgpu::ShaderModule, RhiError> {
    validate_shader(shader)?;
    let label = shader.origin().to_string_lossy();
    let source = match shader.code() {
        Some(ShaderCode::Wgsl(src)) => wgpu::ShaderSource::Wgsl(Cow::Borrowed(src.as_str())),
        Some(ShaderCode::SpirV(words)) => wgpu::ShaderSource::SpirV(Cow::Borrowed(words.as_slice())),
        None => {
            return Err(RhiError::InvalidShader {
                stage: shader.stage(),
                path: shader.origin().to_path_buf(),
            });
        }
    };
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label.as_ref()),
        source,
    }))
}
