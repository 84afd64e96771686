//! Window lifecycle and runtime loop.
//!
//! `driver` holds the platform-agnostic status machine and frame loop;
//! `runtime` owns the `winit` EventLoop and Window and feeds the driver.

mod driver;
mod runtime;

pub use driver::WindowDriver;
pub use runtime::{Runtime, RuntimeConfig, WinitHost};
