//! JSON manifest describing source images and the texture references to pack.
//!
//! ```json
//! {
//!   "config": { "border_width": 4, "max_page_width": 1024 },
//!   "source_pages": ["tiles0.png", "tiles1.png"],
//!   "file_textures": [ { "page": 0, "vertices": [[0, 0], [64, 0], [64, 64], [0, 64]] } ],
//!   "sprites": [ { "page": 1, "x0": 0, "y0": 0, "x1": 32, "y1": 48 } ]
//! }
//! ```

use crate::atlas::BorderedAtlas;
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::source::SOURCE_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A quad or triangle texture in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTextureEntry {
    pub page: usize,
    pub vertices: Vec<[u32; 2]>,
}

/// A sprite box in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub page: usize,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Everything needed to build an atlas from files on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasManifest {
    #[serde(default)]
    pub config: AtlasConfig,
    /// Source page images, relative to the manifest file.
    pub source_pages: Vec<PathBuf>,
    #[serde(default)]
    pub file_textures: Vec<FileTextureEntry>,
    #[serde(default)]
    pub sprites: Vec<SpriteEntry>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl AtlasManifest {
    /// Parse a manifest. Relative image paths resolve against the working directory.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.config.validate()?;
        Ok(manifest)
    }

    /// Load a manifest file. Relative image paths resolve against its directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json_str(&contents)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Resolved path of source page `index`.
    pub fn source_path(&self, index: usize) -> Option<PathBuf> {
        let path = self.source_pages.get(index)?;
        Some(match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        })
    }

    /// Decode every source page into a 256x256 RGBA8 buffer.
    pub fn load_source_pages(&self) -> Result<Vec<Vec<u8>>> {
        (0..self.source_pages.len())
            .map(|index| {
                let path = self.source_path(index).unwrap_or_default();
                let image = image::open(&path)?.to_rgba8();
                let (width, height) = image.dimensions();
                if width != SOURCE_PAGE_SIZE || height != SOURCE_PAGE_SIZE {
                    return Err(AtlasError::SourceImageSize {
                        path,
                        width,
                        height,
                    });
                }
                log::debug!("Loaded source page {} from {}", index, path.display());
                Ok(image.into_raw())
            })
            .collect()
    }

    /// Register the manifest's pages and references with a new atlas.
    pub fn build<'a>(&self, pages: &'a [Vec<u8>]) -> Result<BorderedAtlas<'a>> {
        let mut atlas = BorderedAtlas::new(self.config)?;
        for page in pages {
            atlas.add_source_page(page)?;
        }
        for entry in &self.file_textures {
            atlas.add_file_texture(entry.page, &entry.vertices)?;
        }
        for entry in &self.sprites {
            atlas.add_sprite_texture(entry.page, entry.x0, entry.y0, entry.x1, entry.y1)?;
        }
        Ok(atlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "config": { "border_width": 2, "max_page_width": 256 },
        "source_pages": ["page0.png"],
        "file_textures": [
            { "page": 0, "vertices": [[0, 0], [32, 0], [32, 32], [0, 32]] },
            { "page": 0, "vertices": [[32, 32], [0, 32], [0, 0]] }
        ],
        "sprites": [ { "page": 0, "x0": 32, "y0": 0, "x1": 64, "y1": 16 } ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = AtlasManifest::from_json_str(MANIFEST).unwrap();
        assert_eq!(manifest.config.border_width, 2);
        assert!(manifest.config.supports_non_power_of_two);
        assert_eq!(manifest.file_textures.len(), 2);
        assert_eq!(manifest.sprites[0].x1, 64);
        assert_eq!(manifest.source_path(0), Some(PathBuf::from("page0.png")));
    }

    #[test]
    fn test_build_from_buffers() {
        let manifest = AtlasManifest::from_json_str(MANIFEST).unwrap();
        let pages = vec![vec![128u8; 256 * 256 * 4]];
        let mut atlas = manifest.build(&pages).unwrap();

        assert_eq!(atlas.num_file_textures(), 2);
        assert_eq!(atlas.num_sprite_textures(), 1);
        // Both file textures cover the same 32x32 square.
        assert_eq!(atlas.num_canonical_textures(), 3);
        assert_eq!(atlas.num_pages().unwrap(), 1);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(256, 256, image::Rgba([10, 20, 30, 255]))
            .save(dir.path().join("page0.png"))
            .unwrap();
        std::fs::write(dir.path().join("atlas.json"), MANIFEST).unwrap();

        let manifest = AtlasManifest::from_path(dir.path().join("atlas.json")).unwrap();
        assert_eq!(manifest.source_path(0), Some(dir.path().join("page0.png")));

        let pages = manifest.load_source_pages().unwrap();
        assert_eq!(pages[0].len(), 256 * 256 * 4);
        assert_eq!(&pages[0][..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_wrong_image_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(64, 64)
            .save(dir.path().join("page0.png"))
            .unwrap();
        std::fs::write(dir.path().join("atlas.json"), MANIFEST).unwrap();

        let manifest = AtlasManifest::from_path(dir.path().join("atlas.json")).unwrap();
        assert!(matches!(
            manifest.load_source_pages(),
            Err(AtlasError::SourceImageSize {
                width: 64,
                height: 64,
                ..
            })
        ));
    }
}
