//! Asset locations and texture decoding.
//!
//! Layout under an asset root:
//! - `shaders/<name>.vert.wgsl`, `shaders/<name>.frag.wgsl`
//! - `textures/quad.png`

mod decode;

use std::path::{Path, PathBuf};

use crate::rhi::{RhiError, Shader, ShaderStage, load_valid_shader};

pub use decode::load_image;

/// Root directory holding shaders and textures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `assets/` directory shipped with the workspace.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets"))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Vertex/fragment pair `shaders/<name>.{vert,frag}.wgsl`.
    pub fn shaders(&self, name: &str) -> ShaderPair {
        let dir = self.root.join("shaders");
        ShaderPair {
            vertex: dir.join(format!("{name}.vert.wgsl")),
            fragment: dir.join(format!("{name}.frag.wgsl")),
        }
    }

    /// Source image of the content texture.
    pub fn texture_path(&self) -> PathBuf {
        self.root.join("textures").join("quad.png")
    }
}

/// Storage paths of one pipeline's shaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPair {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPair {
    /// Loads both stages, failing on the first missing or invalid one.
    pub fn load(&self) -> Result<Vec<Shader>, RhiError> {
        Ok(vec![
            load_valid_shader(&self.vertex, ShaderStage::Vertex)?,
            load_valid_shader(&self.fragment, ShaderStage::Fragment)?,
        ])
    }
}
