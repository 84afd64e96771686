//! wgpu implementation of the rendering interface.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating, configuring and destroying the window surface (swapchain)
//! - mapping typed handles to wgpu objects
//! - encoding recorded command buffers and presenting frames

mod encode;
mod error;
mod frame;
mod gpu;
mod init;
mod registry;
mod shader;
mod surface;

pub use error::map_surface_error;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use shader::{ENTRY_POINT, validate_shader};
pub use surface::WgpuSwapchain;
