use wgpu::SurfaceError;

use crate::rhi::FrameOpError;

/// Maps a surface acquisition failure to a frame outcome.
///
/// Lost, outdated and timed-out surfaces are recoverable by reconfiguring;
/// anything else ends the frame loop.
pub fn map_surface_error(err: SurfaceError) -> FrameOpError {
    match err {
        SurfaceError::Lost | SurfaceError::Outdated | SurfaceError::Timeout => {
            FrameOpError::SwapchainOutOfDate
        }
        SurfaceError::OutOfMemory => FrameOpError::OutOfMemory,
        SurfaceError::Other => FrameOpError::DeviceLost,
    }
}
