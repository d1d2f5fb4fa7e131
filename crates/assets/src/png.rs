use std::path::Path;

use crate::AssetError;

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Bytes a `width` x `height` RGBA8 image holds; `None` on overflow.
    pub fn rgba8_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)
    }

    /// Whether `pixels` holds exactly `width * height` RGBA8 pixels.
    pub fn is_complete(&self) -> bool {
        Self::rgba8_len(self.width, self.height) == Some(self.pixels.len())
    }

    /// RGBA of the pixel at `(x, y)`, with `y = 0` the bottom row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let start = index.checked_mul(4)?;
        let px = self.pixels.get(start..start.checked_add(4)?)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Decode an in-memory image to RGBA8, flipped so row 0 is the bottom.
pub fn decode_image(bytes: &[u8]) -> Result<ImageData, AssetError> {
    let mut rgba = image::load_from_memory(bytes)?.to_rgba8();
    image::imageops::flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Load and decode a PNG file. Failures are logged before being returned.
pub fn load_png(path: impl AsRef<Path>) -> Result<ImageData, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| {
        tracing::error!(path = %path.display(), %err, "failed to open image");
        AssetError::Io(err)
    })?;
    let image = decode_image(&bytes).map_err(|err| {
        tracing::error!(path = %path.display(), %err, "failed to decode image");
        err
    })?;
    tracing::debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        "loaded image"
    );
    Ok(image)
}
