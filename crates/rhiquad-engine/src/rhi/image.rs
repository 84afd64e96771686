use crate::coords::PixelSize;

/// Decoded, tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    size: PixelSize,
    rgba: Vec<u8>,
}

impl ImageData {
    /// Wraps decoded pixels; `None` when the buffer does not match `size`.
    pub fn new(size: PixelSize, rgba: Vec<u8>) -> Option<Self> {
        (rgba.len() == size.rgba8_len() && !size.is_empty()).then_some(Self { size, rgba })
    }

    /// Single-color image.
    pub fn solid(size: PixelSize, texel: [u8; 4]) -> Self {
        let rgba = texel.iter().copied().cycle().take(size.rgba8_len()).collect();
        Self { size, rgba }
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Bytes per row of the packed pixel data.
    pub fn bytes_per_row(&self) -> u32 {
        self.size.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(ImageData::new(PixelSize::new(2, 2), vec![0; 15]).is_none());
        assert!(ImageData::new(PixelSize::new(2, 2), vec![0; 16]).is_some());
    }

    #[test]
    fn rejects_empty_size() {
        assert!(ImageData::new(PixelSize::new(0, 2), Vec::new()).is_none());
    }

    #[test]
    fn solid_repeats_the_texel() {
        let img = ImageData::solid(PixelSize::new(2, 1), [1, 2, 3, 4]);
        assert_eq!(img.bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(img.bytes_per_row(), 8);
    }
}
