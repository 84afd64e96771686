/// Size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true when either dimension is zero.
    ///
    /// Swapchains and render targets cannot be created at an empty size.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of bytes of a tightly packed 4-byte-per-texel image of this size.
    #[inline]
    pub const fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for PixelSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_in_either_dimension_is_empty() {
        assert!(PixelSize::ZERO.is_empty());
        assert!(PixelSize::new(0, 200).is_empty());
        assert!(PixelSize::new(300, 0).is_empty());
        assert!(!PixelSize::new(300, 200).is_empty());
    }

    #[test]
    fn rgba8_len_counts_four_bytes_per_texel() {
        assert_eq!(PixelSize::new(3, 2).rgba8_len(), 24);
        assert_eq!(PixelSize::ZERO.rgba8_len(), 0);
    }

    #[test]
    fn converts_from_winit_physical_size() {
        let size: PixelSize = winit::dpi::PhysicalSize::new(800u32, 600u32).into();
        assert_eq!(size, PixelSize::new(800, 600));
    }
}
