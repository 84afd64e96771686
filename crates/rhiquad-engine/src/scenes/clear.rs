use anyhow::Result;

use crate::core::{FrameCtx, Scene, SetupCtx};
use crate::paint::Color;
use crate::rhi::{RenderTargetRef, Rhi};

/// Clears the swapchain every frame. Owns no resources.
#[derive(Debug, Clone, Copy)]
pub struct ClearScene {
    color: Color,
}

impl ClearScene {
    pub const DEFAULT_COLOR: Color = Color::rgb(0.4, 0.7, 0.0);

    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Default for ClearScene {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLOR)
    }
}

impl<R: Rhi> Scene<R> for ClearScene {
    fn initialize(&mut self, _setup: &mut SetupCtx<'_, R>) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, frame: FrameCtx<'_>) {
        let updates = (!frame.updates.is_empty()).then_some(frame.updates);
        frame.commands.begin_pass(RenderTargetRef::Swapchain, self.color, updates);
        frame.commands.end_pass();
    }
}
