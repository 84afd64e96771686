use anyhow::Result;

use crate::rhi::Rhi;

use super::ctx::{FrameCtx, SetupCtx};

/// What the window renders, implemented once per demo variant.
///
/// Scenes only see the rendering interface, so every variant runs unchanged
/// against any backend.
pub trait Scene<R: Rhi> {
    /// Creates all GPU resources of the scene. Called exactly once.
    ///
    /// Static uploads go into `setup.initial_updates`; they are submitted with
    /// the first rendered frame. Any error is fatal.
    fn initialize(&mut self, setup: &mut SetupCtx<'_, R>) -> Result<()>;

    /// Records the passes of one frame.
    ///
    /// `frame.updates` must be handed to the first pass.
    fn render(&mut self, frame: FrameCtx<'_>);
}
