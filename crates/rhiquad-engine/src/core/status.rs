use crate::coords::PixelSize;

/// Lifecycle state of the rendering window.
///
/// Transitions:
/// - `Uninitialized -> Initialized` once, on first exposure
/// - `Initialized | Paused -> Ready` after a successful swapchain resize
/// - `Ready -> Paused` when hidden with degenerate geometry, or when the
///   surface goes away
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum WindowStatus {
    #[default]
    Uninitialized,
    Initialized,
    Paused,
    Ready,
}

impl WindowStatus {
    /// One-time resource setup has not run yet.
    pub fn needs_initialization(self) -> bool {
        self == WindowStatus::Uninitialized
    }

    /// Initialization finished. Only meaningful from `Uninitialized`.
    pub fn mark_initialized(&mut self) {
        if *self == WindowStatus::Uninitialized {
            *self = WindowStatus::Initialized;
        }
    }

    /// The status waits for a swapchain of usable size.
    pub fn wants_swapchain(self, surface_size: PixelSize) -> bool {
        matches!(self, WindowStatus::Initialized | WindowStatus::Paused) && !surface_size.is_empty()
    }

    /// Swapchain is sized; rendering may start.
    ///
    /// Refused (returns false) unless initialization has happened.
    pub fn mark_ready(&mut self) -> bool {
        match self {
            WindowStatus::Initialized | WindowStatus::Paused => {
                *self = WindowStatus::Ready;
                true
            }
            WindowStatus::Ready => true,
            WindowStatus::Uninitialized => false,
        }
    }

    /// Hidden window: pause only when the surface geometry is degenerate.
    ///
    /// A hidden window with valid geometry stays `Ready`; it stops rendering
    /// because ticks stop arriving, not because of the status.
    pub fn pause_if_degenerate(&mut self, surface_size: PixelSize) -> bool {
        if *self == WindowStatus::Ready && surface_size.is_empty() {
            *self = WindowStatus::Paused;
            return true;
        }
        false
    }

    /// The surface is gone; a new swapchain is needed before rendering again.
    pub fn surface_lost(&mut self) {
        if *self == WindowStatus::Ready {
            *self = WindowStatus::Paused;
        }
    }

    #[inline]
    pub fn is_ready(self) -> bool {
        self == WindowStatus::Ready
    }
}
