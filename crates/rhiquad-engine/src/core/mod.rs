//! Core engine-facing contracts.
//!
//! Defines the interface between the window driver and what it renders,
//! the surface capability the driver needs from the platform, and the
//! window status state machine.

mod app;
mod ctx;
mod host;
mod status;

pub use app::Scene;
pub use ctx::{FrameCtx, SetupCtx};
pub use host::SurfaceHost;
pub use status::WindowStatus;
