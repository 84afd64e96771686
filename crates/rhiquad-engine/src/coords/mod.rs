//! Size and viewport types shared by the rendering interface and its backends.
//!
//! Two spaces are in play:
//! - physical pixels (`PixelSize`, `Viewport`), used for swapchains, textures
//!   and viewports
//! - logical window units, used only for the composite projection

mod size;
mod viewport;

pub use size::PixelSize;
pub use viewport::Viewport;
