//! rhiquad engine crate.
//!
//! A windowed renderer built on a small rendering interface (`rhi`) with a
//! wgpu backend (`device`). The window driver owns the swapchain lifecycle
//! and frame loop; scenes record passes through the interface only.

pub mod assets;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod rhi;
pub mod scenes;
pub mod window;

#[cfg(test)]
mod testing;
