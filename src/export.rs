//! Serializable summary of a finished atlas layout.

use crate::atlas::{BorderedAtlas, TextureSource};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Size of one page in the report.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

/// Where a canonical texture came from and where it was packed.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalReport {
    pub index: usize,
    /// Source page, or `None` for the white texture.
    pub source_page: Option<usize>,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub page: usize,
    pub x_with_border: u32,
    pub y_with_border: u32,
}

/// Resolved UVs of a file texture or sprite.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub index: usize,
    pub canonical: usize,
    pub page: usize,
    pub uvs: Vec<[f32; 2]>,
}

/// Full layout of an atlas.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub page_width: u32,
    pub border_width: u32,
    pub pages: Vec<PageReport>,
    pub canonical_textures: Vec<CanonicalReport>,
    pub file_textures: Vec<ReferenceReport>,
    pub sprites: Vec<ReferenceReport>,
}

impl LayoutReport {
    /// Lay out the atlas if needed and describe the result.
    pub fn from_atlas(atlas: &mut BorderedAtlas<'_>) -> Result<Self> {
        let page_count = atlas.num_pages()?;
        let pages = (0..page_count)
            .map(|index| {
                let info = atlas.page_info(index)?;
                Ok(PageReport {
                    index,
                    width: info.width,
                    height: info.height,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut canonical_textures = Vec::with_capacity(atlas.num_canonical_textures());
        for (index, texture) in atlas.canonical_textures().enumerate() {
            let Some(placement) = texture.placement() else {
                continue;
            };
            let source_page = match texture.rect.source {
                TextureSource::White => None,
                TextureSource::Page(page) => Some(page),
            };
            canonical_textures.push(CanonicalReport {
                index,
                source_page,
                x: texture.rect.x,
                y: texture.rect.y,
                width: texture.width(),
                height: texture.height(),
                page: placement.page,
                x_with_border: placement.x_with_border,
                y_with_border: placement.y_with_border,
            });
        }

        let mut file_textures = Vec::with_capacity(atlas.num_file_textures());
        for index in 0..atlas.num_file_textures() {
            let canonical = atlas.file_texture(index)?.canonical;
            let coords = atlas.coordinates(index, false, 0, false)?;
            file_textures.push(ReferenceReport {
                index,
                canonical,
                page: coords.page,
                uvs: coords.uvs,
            });
        }

        let mut sprites = Vec::with_capacity(atlas.num_sprite_textures());
        for index in 0..atlas.num_sprite_textures() {
            let canonical = atlas.sprite_texture(index)?.canonical;
            let coords = atlas.sprite_coordinates(index)?;
            sprites.push(ReferenceReport {
                index,
                canonical,
                page: coords.page,
                uvs: coords.uvs.to_vec(),
            });
        }

        Ok(Self {
            page_width: atlas.page_width(),
            border_width: atlas.border_width(),
            pages,
            canonical_textures,
            file_textures,
            sprites,
        })
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
