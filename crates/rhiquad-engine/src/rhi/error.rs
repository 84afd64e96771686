use std::path::PathBuf;

use super::ResourceHandle;
use super::desc::ShaderStage;

/// Resource creation failures.
///
/// Every one of these happens during one-time initialization and is treated
/// as fatal by the window driver.
#[derive(Debug, thiserror::Error)]
pub enum RhiError {
    #[error("{stage:?} shader at {path} is missing or invalid")]
    InvalidShader { stage: ShaderStage, path: PathBuf },

    #[error("{stage:?} shader was rejected by the device: {message}")]
    ShaderCompilation { stage: ShaderStage, message: String },

    #[error("pipeline needs exactly one vertex and one fragment stage")]
    IncompleteShaderStages,

    #[error("buffer size must be non-zero")]
    EmptyBuffer,

    #[error("texture size must be non-zero")]
    EmptyTexture,

    #[error("texture {0:?} was not created as a render target")]
    NotARenderTarget(super::TextureId),

    #[error("binding slot {0} is used more than once")]
    DuplicateSlot(u32),

    #[error("binding slot {0} is out of range")]
    SlotOutOfRange(u32),

    #[error("unknown resource {0:?}")]
    UnknownResource(ResourceHandle),
}

/// Outcome of a begin-frame or end-frame call that did not succeed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameOpError {
    /// Surface geometry no longer matches the swapchain; resize and retry.
    #[error("swapchain is out of date")]
    SwapchainOutOfDate,

    #[error("graphics device was lost")]
    DeviceLost,

    #[error("out of GPU memory")]
    OutOfMemory,

    /// A pipeline was bound inside a pass whose target format it was not built for.
    #[error("pipeline {0:?} is not compatible with the current render target")]
    IncompatibleRenderPass(super::PipelineId),

    /// A viewport with a zero or non-finite extent was recorded.
    #[error("viewport must have a positive, finite extent")]
    InvalidViewport,

    /// Uploaded pixels do not cover the destination texture exactly.
    #[error("image size does not match texture {0:?}")]
    TextureSizeMismatch(super::TextureId),

    /// End-frame was called without a matching successful begin-frame.
    #[error("no frame in flight")]
    NoFrame,

    #[error("frame references unknown resource {0:?}")]
    UnknownResource(ResourceHandle),
}
