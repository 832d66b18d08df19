//! Borrowed source pages the atlas copies texels from.

use crate::error::{AtlasError, Result};

/// Side length of every source page in pixels.
pub const SOURCE_PAGE_SIZE: u32 = 256;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A read-only RGBA8 page of source texels owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SourcePage<'a> {
    pixels: &'a [u8],
}

impl<'a> SourcePage<'a> {
    /// Wrap a 256x256 RGBA8 buffer.
    pub fn new(pixels: &'a [u8]) -> Result<Self> {
        let expected = (SOURCE_PAGE_SIZE * SOURCE_PAGE_SIZE) as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(AtlasError::SourcePageSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    /// Get a pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y * SOURCE_PAGE_SIZE + x) as usize * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// `width` pixels of row `y` starting at column `x`.
    pub fn row(&self, x: u32, y: u32, width: u32) -> &'a [u8] {
        let start = (y * SOURCE_PAGE_SIZE + x) as usize * BYTES_PER_PIXEL;
        &self.pixels[start..start + width as usize * BYTES_PER_PIXEL]
    }
}
