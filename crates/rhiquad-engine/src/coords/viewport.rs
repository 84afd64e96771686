use super::PixelSize;

/// Viewport rectangle in physical pixels.
///
/// Passes set this before drawing; it normally covers the whole render target.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering a full target of the given pixel size.
    #[inline]
    pub fn covering(size: PixelSize) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_spans_the_whole_target() {
        let vp = Viewport::covering(PixelSize::new(300, 200));
        assert_eq!(vp, Viewport::new(0.0, 0.0, 300.0, 200.0));
        assert!(vp.is_valid());
    }

    #[test]
    fn empty_target_gives_invalid_viewport() {
        assert!(!Viewport::covering(PixelSize::new(0, 10)).is_valid());
    }
}
