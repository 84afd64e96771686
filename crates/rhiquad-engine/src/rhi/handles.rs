//! Typed resource handles.
//!
//! Handles are plain copyable ids handed out by a backend. They carry no
//! ownership; the release pool is what guarantees destruction.

macro_rules! resource_id {
    ($($(#[$meta:meta])* $name:ident => $variant:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(u32);

            impl $name {
                /// Wraps a backend-assigned raw id.
                #[inline]
                pub const fn from_raw(raw: u32) -> Self {
                    Self(raw)
                }

                #[inline]
                pub const fn raw(self) -> u32 {
                    self.0
                }
            }

            impl From<$name> for ResourceHandle {
                fn from(id: $name) -> Self {
                    ResourceHandle::$variant(id)
                }
            }
        )*

        /// Any GPU resource created through the rendering interface.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum ResourceHandle {
            $($variant($name),)*
        }
    };
}

resource_id! {
    /// Vertex or uniform buffer.
    BufferId => Buffer;
    /// Sampled texture, possibly also usable as a color attachment.
    TextureId => Texture;
    SamplerId => Sampler;
    /// Color attachment wrapper around a render-target texture.
    RenderTargetId => RenderTarget;
    /// Attachment format contract shared by targets and pipelines.
    RenderPassId => RenderPass;
    /// Slot-to-resource mapping for one pipeline.
    BindingSetId => BindingSet;
    PipelineId => Pipeline;
}

/// Destination of a render pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderTargetRef {
    /// An offscreen texture target.
    Texture(RenderTargetId),
    /// The swapchain image acquired by the current frame.
    Swapchain,
}
