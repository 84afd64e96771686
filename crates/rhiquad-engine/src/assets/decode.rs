use std::path::Path;

use anyhow::{Context, Result};

use crate::coords::PixelSize;
use crate::rhi::ImageData;

/// Decodes an image file into RGBA8 pixels.
pub fn load_image(path: impl AsRef<Path>) -> Result<ImageData> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_rgba8();
    let size = PixelSize::new(decoded.width(), decoded.height());
    log::debug!("decoded {} ({}x{})", path.display(), size.width, size.height);
    ImageData::new(size, decoded.into_raw())
        .with_context(|| format!("image {} has no pixels", path.display()))
}
