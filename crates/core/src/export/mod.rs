use std::path::Path;

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};

use crate::{render::RasterSurface, Result};

/// File name used when the caller does not pick one.
pub const DEFAULT_FILE_NAME: &str = "cursor-choreography.png";

/// Encodes the current surface content as PNG bytes.
pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>> {
    let rgba = surface.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)?;
    Ok(buf)
}

/// Writes the surface to `path` as a PNG file.
pub fn save_png(surface: &RasterSurface, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_png(surface)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved image");
    Ok(())
}
