use crate::coords::PixelSize;

/// The window surface as seen by the rendering core.
///
/// The core only asks for geometry and schedules update ticks; event
/// delivery is the runtime's job.
pub trait SurfaceHost {
    /// Live drawable size in physical pixels.
    fn surface_pixel_size(&self) -> PixelSize;

    /// Window size in logical units.
    fn logical_size(&self) -> (f32, f32);

    /// Schedules one more update tick.
    fn request_update(&self);
}
