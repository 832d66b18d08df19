//! Pixel baking: copies canonical textures into page buffers and grows
//! their borders by edge replication.

use super::layout::PageInfo;
use super::registry::{Registry, TextureSource};
use crate::error::{AtlasError, Result};
use crate::source::{SourcePage, BYTES_PER_PIXEL};
use image::ImageEncoder;
use std::path::Path;

const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// A baked RGBA8 atlas page, ready for upload.
#[derive(Debug, Clone)]
pub struct AtlasPage {
    /// Width of the page in pixels.
    pub width: u32,
    /// Height of the page in pixels.
    pub height: u32,
    /// RGBA pixel data.
    pub pixels: Vec<u8>,
}

impl AtlasPage {
    fn blank(info: PageInfo) -> Self {
        Self {
            width: info.width,
            height: info.height,
            pixels: vec![0; info.width as usize * info.height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Get a pixel at (x, y), or `None` outside the page.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.texel(x, y))
    }

    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Export the page as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder.write_image(
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(bytes)
    }

    /// Write the page to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Copy of `width` pixels of row `y` starting at column `x`.
    fn row(&self, x: u32, y: u32, width: u32) -> Vec<u8> {
        let start = self.offset(x, y);
        self.pixels[start..start + width as usize * BYTES_PER_PIXEL].to_vec()
    }

    fn write_row(&mut self, x: u32, y: u32, data: &[u8]) {
        let start = self.offset(x, y);
        self.pixels[start..start + data.len()].copy_from_slice(data);
    }

    fn fill(&mut self, x: u32, y: u32, count: u32, color: [u8; 4]) {
        let start = self.offset(x, y);
        let end = start + count as usize * BYTES_PER_PIXEL;
        for px in self.pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&color);
        }
    }
}

/// Bake page `page_index` from the registry placements.
pub(crate) fn bake_page(
    registry: &Registry,
    sources: &[SourcePage<'_>],
    page_index: usize,
    info: PageInfo,
    border: u32,
) -> Result<AtlasPage> {
    let mut page = AtlasPage::blank(info);

    for texture in registry.iter() {
        let placement = match texture.placement() {
            Some(p) if p.page == page_index => p,
            _ => continue,
        };
        let (width, height) = (texture.width(), texture.height());

        let left = placement.x_with_border + border;
        let top = placement.y_with_border + border;

        // Interior texels.
        match texture.rect.source {
            TextureSource::White => {
                for row in 0..height {
                    page.fill(left, top + row, width, OPAQUE_WHITE);
                }
            }
            TextureSource::Page(source_index) => {
                let source = sources.get(source_index).ok_or(AtlasError::InvalidSourcePage {
                    index: source_index,
                    count: sources.len(),
                })?;
                for row in 0..height {
                    let data = source.row(texture.rect.x, texture.rect.y + row, width);
                    page.write_row(left, top + row, data);
                }
            }
        }

        if border == 0 {
            continue;
        }

        // Top border rows, corners included.
        let first_row = bordered_row(&page, left, top, width, border);
        for row in 0..border {
            page.write_row(placement.x_with_border, placement.y_with_border + row, &first_row);
        }

        // Side borders of every interior row.
        for row in 0..height {
            let y = top + row;
            let first = page.texel(left, y);
            let last = page.texel(left + width - 1, y);
            page.fill(placement.x_with_border, y, border, first);
            page.fill(left + width, y, border, last);
        }

        // Bottom border rows, corners included.
        let last_row = bordered_row(&page, left, top + height - 1, width, border);
        for row in 0..border {
            page.write_row(placement.x_with_border, top + height + row, &last_row);
        }
    }

    Ok(page)
}

/// Interior row `y` extended by its edge pixels on both sides.
fn bordered_row(page: &AtlasPage, left: u32, y: u32, width: u32, border: u32) -> Vec<u8> {
    let interior = page.row(left, y, width);
    let first = page.texel(left, y);
    let last = page.texel(left + width - 1, y);

    let mut out = Vec::with_capacity((width + 2 * border) as usize * BYTES_PER_PIXEL);
    for _ in 0..border {
        out.extend_from_slice(&first);
    }
    out.extend_from_slice(&interior);
    for _ in 0..border {
        out.extend_from_slice(&last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::registry::{Placement, SourceRect, WHITE_TEXTURE};

    /// 256x256 page where each pixel encodes its own coordinates.
    fn coordinate_page() -> Vec<u8> {
        let mut data = Vec::with_capacity(256 * 256 * 4);
        for y in 0..256u32 {
            for x in 0..256u32 {
                data.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        data
    }

    #[test]
    fn test_interior_and_borders() {
        let data = coordinate_page();
        let sources = vec![SourcePage::new(&data).unwrap()];

        let mut registry = Registry::new();
        let index = registry.register(SourceRect::on_page(0, 10, 20, 3, 2).unwrap());
        registry.place(
            index,
            Placement {
                page: 0,
                x_with_border: 0,
                y_with_border: 0,
            },
        );

        let info = PageInfo {
            width: 16,
            height: 16,
        };
        let page = bake_page(&registry, &sources, 0, info, 2).unwrap();

        // Interior copied verbatim.
        assert_eq!(page.texel(2, 2), [10, 20, 7, 255]);
        assert_eq!(page.texel(4, 3), [12, 21, 7, 255]);

        // Corners take the nearest interior corner.
        assert_eq!(page.texel(0, 0), [10, 20, 7, 255]);
        assert_eq!(page.texel(6, 0), [12, 20, 7, 255]);
        assert_eq!(page.texel(0, 5), [10, 21, 7, 255]);
        assert_eq!(page.texel(6, 5), [12, 21, 7, 255]);

        // Edges replicate the adjacent interior pixel.
        assert_eq!(page.texel(3, 0), [11, 20, 7, 255]);
        assert_eq!(page.texel(1, 3), [10, 21, 7, 255]);
        assert_eq!(page.texel(5, 2), [12, 20, 7, 255]);
        assert_eq!(page.texel(3, 5), [11, 21, 7, 255]);

        // Outside the footprint stays untouched.
        assert_eq!(page.texel(7, 0), [0, 0, 0, 0]);
        assert_eq!(page.texel(0, 6), [0, 0, 0, 0]);
    }

    #[test]
    fn test_white_texture_fills_footprint() {
        let mut registry = Registry::new();
        registry.place(
            WHITE_TEXTURE,
            Placement {
                page: 0,
                x_with_border: 4,
                y_with_border: 4,
            },
        );

        let info = PageInfo {
            width: 32,
            height: 32,
        };
        let page = bake_page(&registry, &[], 0, info, 3).unwrap();
        for y in 4..4 + 14 {
            for x in 4..4 + 14 {
                assert_eq!(page.texel(x, y), OPAQUE_WHITE);
            }
        }
        assert_eq!(page.texel(3, 4), [0, 0, 0, 0]);
        assert_eq!(page.texel(18, 18), [0, 0, 0, 0]);
    }

    #[test]
    fn test_other_pages_skipped() {
        let mut registry = Registry::new();
        registry.place(
            WHITE_TEXTURE,
            Placement {
                page: 1,
                x_with_border: 0,
                y_with_border: 0,
            },
        );
        let info = PageInfo {
            width: 16,
            height: 16,
        };
        let page = bake_page(&registry, &[], 0, info, 1).unwrap();
        assert!(page.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixel_outside_page_is_none() {
        let mut pixels = vec![0; 4 * 2 * 4];
        pixels[28..32].copy_from_slice(&[1, 2, 3, 4]);
        let page = AtlasPage {
            width: 4,
            height: 2,
            pixels,
        };
        assert_eq!(page.pixel(3, 1), Some([1, 2, 3, 4]));
        assert_eq!(page.pixel(4, 0), None);
        assert_eq!(page.pixel(0, 2), None);
        assert_eq!(page.pixel(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_png_export() {
        let page = AtlasPage {
            width: 2,
            height: 2,
            pixels: vec![255; 16],
        };
        let png = page.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        page.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
    }
}
