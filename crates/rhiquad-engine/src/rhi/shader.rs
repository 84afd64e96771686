use std::path::{Path, PathBuf};

use super::RhiError;
use super::desc::ShaderStage;

const SPIRV_MAGIC: u32 = 0x0723_0203;
const SPIRV_HEADER_WORDS: usize = 5;

/// Pre-built shader code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderCode {
    Wgsl(String),
    SpirV(Vec<u32>),
}

/// A shader for one pipeline stage, loaded from storage.
///
/// Loading never fails outright: unreadable or malformed content yields an
/// invalid shader, and the caller decides whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    stage: ShaderStage,
    origin: PathBuf,
    code: Option<ShaderCode>,
}

impl Shader {
    /// The invalid sentinel.
    pub fn invalid(stage: ShaderStage, origin: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            origin: origin.into(),
            code: None,
        }
    }

    /// Interprets raw file content.
    ///
    /// SPIR-V is recognised by its magic number; everything else must be WGSL
    /// text declaring an entry point for `stage`.
    pub fn from_bytes(stage: ShaderStage, origin: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let origin = origin.into();
        let code = if is_spirv(&bytes) {
            parse_spirv(&bytes)
        } else {
            parse_wgsl(stage, bytes)
        };
        if code.is_none() {
            log::warn!("{stage:?} shader {} failed validation", origin.display());
        }
        Self { stage, origin, code }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Storage path the shader came from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn is_valid(&self) -> bool {
        self.code.is_some()
    }

    pub fn code(&self) -> Option<&ShaderCode> {
        self.code.as_ref()
    }
}

/// Reads a shader from `path`.
pub fn load_shader(path: impl AsRef<Path>, stage: ShaderStage) -> Shader {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => Shader::from_bytes(stage, path, bytes),
        Err(e) => {
            log::warn!("cannot open shader {}: {e}", path.display());
            Shader::invalid(stage, path)
        }
    }
}

/// Reads a shader and turns the invalid sentinel into an error.
pub fn load_valid_shader(path: impl AsRef<Path>, stage: ShaderStage) -> Result<Shader, RhiError> {
    let shader = load_shader(path.as_ref(), stage);
    if shader.is_valid() {
        Ok(shader)
    } else {
        Err(RhiError::InvalidShader {
            stage,
            path: path.as_ref().to_path_buf(),
        })
    }
}

fn is_spirv(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) == SPIRV_MAGIC
}

fn parse_spirv(bytes: &[u8]) -> Option<ShaderCode> {
    if bytes.len() % 4 != 0 || bytes.len() / 4 < SPIRV_HEADER_WORDS {
        return None;
    }
    let words = bytes
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    Some(ShaderCode::SpirV(words))
}

fn parse_wgsl(stage: ShaderStage, bytes: Vec<u8>) -> Option<ShaderCode> {
    let source = String::from_utf8(bytes).ok()?;
    if source.trim().is_empty() || !source.contains(stage.wgsl_attribute()) {
        return None;
    }
    Some(ShaderCode::Wgsl(source))
}
