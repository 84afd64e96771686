use crate::coords::Viewport;
use crate::paint::Color;

use super::{BindingSetId, BufferId, PipelineId, RenderTargetRef, ResourceUpdateBatch};

/// Vertex buffer bound at one input slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexInput {
    pub buffer: BufferId,
    pub offset: u64,
}

impl VertexInput {
    pub const fn new(buffer: BufferId, offset: u64) -> Self {
        Self { buffer, offset }
    }
}

/// One recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginPass {
        target: RenderTargetRef,
        clear: Color,
        updates: Option<ResourceUpdateBatch>,
    },
    SetGraphicsPipeline(PipelineId),
    SetViewport(Viewport),
    /// `None` binds the binding set the current pipeline was built with.
    SetShaderResources(Option<BindingSetId>),
    SetVertexInput {
        start_binding: u32,
        inputs: Vec<VertexInput>,
    },
    Draw {
        vertex_count: u32,
    },
    EndPass,
}

/// Ordered recording of one frame's passes.
///
/// Handed out by `Rhi::begin_frame` and consumed by `Rhi::end_frame`, which
/// encodes the commands in recording order. Passes cannot nest.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    in_pass: bool,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a pass that clears `target` to `clear`.
    ///
    /// `updates` are applied before any command of the pass executes.
    pub fn begin_pass(
        &mut self,
        target: RenderTargetRef,
        clear: Color,
        updates: Option<ResourceUpdateBatch>,
    ) {
        debug_assert!(!self.in_pass, "begin_pass inside an open pass");
        self.in_pass = true;
        self.commands.push(Command::BeginPass { target, clear, updates });
    }

    pub fn set_graphics_pipeline(&mut self, pipeline: PipelineId) {
        self.push_in_pass(Command::SetGraphicsPipeline(pipeline));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.push_in_pass(Command::SetViewport(viewport));
    }

    /// Binds the current pipeline's own binding set.
    pub fn set_shader_resources(&mut self) {
        self.push_in_pass(Command::SetShaderResources(None));
    }

    pub fn set_vertex_input(&mut self, start_binding: u32, inputs: &[VertexInput]) {
        self.push_in_pass(Command::SetVertexInput {
            start_binding,
            inputs: inputs.to_vec(),
        });
    }

    pub fn draw(&mut self, vertex_count: u32) {
        self.push_in_pass(Command::Draw { vertex_count });
    }

    pub fn end_pass(&mut self) {
        debug_assert!(self.in_pass, "end_pass without begin_pass");
        self.in_pass = false;
        self.commands.push(Command::EndPass);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Consumes the buffer; a pass left open is closed implicitly.
    pub fn into_commands(mut self) -> Vec<Command> {
        if self.in_pass {
            log::warn!("command buffer finished with an open pass");
            self.commands.push(Command::EndPass);
        }
        self.commands
    }

    /// Targets of the recorded passes, in submission order.
    pub fn pass_targets(&self) -> Vec<RenderTargetRef> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::BeginPass { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    fn push_in_pass(&mut self, cmd: Command) {
        debug_assert!(self.in_pass, "{cmd:?} recorded outside a pass");
        self.commands.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::RenderTargetId;

    #[test]
    fn records_in_order() {
        let mut cb = CommandBuffer::new();
        cb.begin_pass(RenderTargetRef::Swapchain, Color::BLACK, None);
        cb.set_graphics_pipeline(PipelineId::from_raw(1));
        cb.set_viewport(Viewport::new(0.0, 0.0, 4.0, 4.0));
        cb.set_shader_resources();
        cb.set_vertex_input(0, &[VertexInput::new(BufferId::from_raw(2), 0)]);
        cb.draw(6);
        cb.end_pass();

        let cmds = cb.into_commands();
        assert_eq!(cmds.len(), 7);
        assert!(matches!(cmds[0], Command::BeginPass { .. }));
        assert_eq!(cmds[5], Command::Draw { vertex_count: 6 });
        assert_eq!(cmds[6], Command::EndPass);
    }

    #[test]
    fn pass_targets_follow_submission_order() {
        let rt = RenderTargetRef::Texture(RenderTargetId::from_raw(4));
        let mut cb = CommandBuffer::new();
        cb.begin_pass(rt, Color::CYAN, None);
        cb.end_pass();
        cb.begin_pass(RenderTargetRef::Swapchain, Color::BLACK, None);
        cb.end_pass();
        assert_eq!(cb.pass_targets(), vec![rt, RenderTargetRef::Swapchain]);
    }

    #[test]
    fn open_pass_is_closed_on_finish() {
        let mut cb = CommandBuffer::new();
        cb.begin_pass(RenderTargetRef::Swapchain, Color::BLACK, None);
        assert_eq!(cb.into_commands().last(), Some(&Command::EndPass));
    }
}
