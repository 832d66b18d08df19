//! Bordered texture atlas.
//!
//! Texture references are registered against borrowed source pages, merged
//! into unique canonical textures and packed, with a replicated-pixel border,
//! onto fixed-width pages. The layout is computed once, on the first query,
//! after which the atlas is read-only.

mod bake;
mod layout;
mod reference;
mod registry;

pub use bake::AtlasPage;
pub use layout::PageInfo;
pub use reference::{
    CornerLocation, FileTextureReference, SpriteTextureReference, VertexBounds, SPRITE_CORNERS,
};
pub use registry::{
    CanonicalTexture, Placement, SourceRect, TextureSource, MAX_SOURCE_EXTENT, WHITE_TEXTURE,
};

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::source::SourcePage;
use registry::Registry;

/// Normalized texture coordinates for one polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCoordinates {
    /// Atlas page the polygon samples from.
    pub page: usize,
    /// One UV pair per vertex.
    pub uvs: Vec<[f32; 2]>,
}

/// Normalized texture coordinates for a sprite, in `SPRITE_CORNERS` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteCoordinates {
    pub page: usize,
    pub uvs: [[f32; 2]; 4],
}

#[derive(Debug)]
enum AtlasState {
    Building,
    Laid { pages: Vec<PageInfo> },
}

impl AtlasState {
    fn pages(&self) -> &[PageInfo] {
        match self {
            AtlasState::Building => &[],
            AtlasState::Laid { pages } => pages,
        }
    }
}

/// Deduplicating texture atlas with bordered canonical textures.
#[derive(Debug)]
pub struct BorderedAtlas<'a> {
    config: AtlasConfig,
    sources: Vec<SourcePage<'a>>,
    registry: Registry,
    file_textures: Vec<FileTextureReference>,
    sprites: Vec<SpriteTextureReference>,
    state: AtlasState,
}

impl<'a> BorderedAtlas<'a> {
    /// Create an empty atlas.
    pub fn new(config: AtlasConfig) -> Result<Self> {
        config.validate()?;
        if config.page_width() != config.max_page_width {
            log::warn!(
                "Atlas page width clamped from {} to {}",
                config.max_page_width,
                config.page_width()
            );
        }

        Ok(Self {
            config,
            sources: Vec::new(),
            registry: Registry::new(),
            file_textures: Vec::new(),
            sprites: Vec::new(),
            state: AtlasState::Building,
        })
    }

    pub fn border_width(&self) -> u32 {
        self.config.border_width
    }

    pub fn page_width(&self) -> u32 {
        self.config.page_width()
    }

    /// Whether the layout has been computed.
    pub fn is_laid_out(&self) -> bool {
        matches!(self.state, AtlasState::Laid { .. })
    }

    /// Register a 256x256 RGBA8 source page and return its index.
    pub fn add_source_page(&mut self, pixels: &'a [u8]) -> Result<usize> {
        self.ensure_building("source page")?;
        let page = SourcePage::new(pixels)?;
        self.sources.push(page);
        Ok(self.sources.len() - 1)
    }

    /// Register a triangle or quad texture given its vertices in source pixels.
    ///
    /// The bounding box comes from the first three vertices; the corner each
    /// vertex maps to is kept so the original winding survives.
    pub fn add_file_texture(&mut self, source_page: usize, vertices: &[[u32; 2]]) -> Result<usize> {
        self.ensure_building("file texture")?;
        let bounds = VertexBounds::from_vertices(vertices)?;
        let canonical = self.register_rectangle(
            source_page,
            bounds.min_x,
            bounds.min_y,
            bounds.width,
            bounds.height,
        )?;

        self.file_textures
            .push(FileTextureReference::new(canonical, vertices, &bounds));
        Ok(self.file_textures.len() - 1)
    }

    /// Register a sprite covering the box `(x0, y0)`..`(x1, y1)` of a source page.
    pub fn add_sprite_texture(
        &mut self,
        source_page: usize,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    ) -> Result<usize> {
        self.ensure_building("sprite texture")?;
        if x1 < x0 || y1 < y0 {
            return Err(AtlasError::RectangleOutOfBounds {
                x: x0,
                y: y0,
                width: x1.saturating_sub(x0),
                height: y1.saturating_sub(y0),
            });
        }

        let canonical = self.register_rectangle(source_page, x0, y0, x1 - x0, y1 - y0)?;
        self.sprites.push(SpriteTextureReference { canonical });
        Ok(self.sprites.len() - 1)
    }

    /// Return the canonical index for a source rectangle, adding it if new.
    pub fn register_rectangle(
        &mut self,
        source_page: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<usize> {
        self.ensure_building("texture")?;
        if source_page >= self.sources.len() {
            return Err(AtlasError::InvalidSourcePage {
                index: source_page,
                count: self.sources.len(),
            });
        }

        let rect = SourceRect::on_page(source_page, x, y, width, height)?;

        let border = self.config.border_width;
        let page_width = self.config.page_width();
        if width + 2 * border > page_width || height + 2 * border > page_width {
            return Err(AtlasError::FootprintTooLarge {
                width,
                height,
                border,
                page_width,
            });
        }

        Ok(self.registry.register(rect))
    }

    fn ensure_building(&self, what: &'static str) -> Result<()> {
        match self.state {
            AtlasState::Building => Ok(()),
            AtlasState::Laid { .. } => Err(AtlasError::RegisterAfterLayout(what)),
        }
    }

    /// Compute the layout now. Queries call this on demand; later calls are no-ops.
    pub fn finalize(&mut self) -> Result<()> {
        if self.is_laid_out() {
            return Ok(());
        }

        let layout = layout::lay_out(&self.registry, &self.config)?;
        for (index, placement) in layout.placements.into_iter().enumerate() {
            self.registry.place(index, placement);
        }
        self.state = AtlasState::Laid {
            pages: layout.pages,
        };
        Ok(())
    }

    /// Number of atlas pages.
    pub fn num_pages(&mut self) -> Result<usize> {
        self.finalize()?;
        Ok(self.state.pages().len())
    }

    /// Size of page `page`.
    pub fn page_info(&mut self, page: usize) -> Result<PageInfo> {
        self.finalize()?;
        self.page(page)
    }

    fn page(&self, page: usize) -> Result<PageInfo> {
        let pages = self.state.pages();
        pages.get(page).copied().ok_or(AtlasError::InvalidPage {
            index: page,
            count: pages.len(),
        })
    }

    pub fn num_canonical_textures(&self) -> usize {
        self.registry.len()
    }

    pub fn num_file_textures(&self) -> usize {
        self.file_textures.len()
    }

    pub fn num_sprite_textures(&self) -> usize {
        self.sprites.len()
    }

    pub fn num_source_pages(&self) -> usize {
        self.sources.len()
    }

    pub fn canonical_texture(&self, index: usize) -> Option<&CanonicalTexture> {
        self.registry.get(index)
    }

    pub fn canonical_textures(&self) -> impl Iterator<Item = &CanonicalTexture> {
        self.registry.iter()
    }

    pub fn file_texture(&self, index: usize) -> Result<&FileTextureReference> {
        self.file_textures
            .get(index)
            .ok_or(AtlasError::InvalidFileTexture {
                index,
                count: self.file_textures.len(),
            })
    }

    pub fn sprite_texture(&self, index: usize) -> Result<&SpriteTextureReference> {
        self.sprites.get(index).ok_or(AtlasError::InvalidSprite {
            index,
            count: self.sprites.len(),
        })
    }

    /// Unpadded height of the texture behind a file texture reference.
    ///
    /// Available before layout.
    pub fn texture_height(&self, file_texture: usize) -> Result<u32> {
        let reference = self.file_texture(file_texture)?;
        Ok(self.registry.texture(reference.canonical).height())
    }

    /// UVs for every vertex of a file texture.
    ///
    /// `shift` moves the rectangle up by that many pixels; `split` moves its
    /// top edge down to the middle, for textures animated by scrolling.
    /// `reverse` writes the vertices in reverse order without changing which
    /// corner each one maps to.
    pub fn coordinates(
        &mut self,
        file_texture: usize,
        reverse: bool,
        shift: i32,
        split: bool,
    ) -> Result<PolygonCoordinates> {
        self.finalize()?;
        let reference = self.file_texture(file_texture)?;
        let (placement, texture, page) = self.placed(reference.canonical)?;

        let count = reference.corners().len();
        let mut uvs = vec![[0.0; 2]; count];
        for (i, &corner) in reference.corners().iter().enumerate() {
            let slot = if reverse { count - 1 - i } else { i };
            uvs[slot] = self.corner_uv(placement, texture, page, corner, shift, split);
        }

        Ok(PolygonCoordinates {
            page: placement.page,
            uvs,
        })
    }

    /// UVs for a sprite.
    pub fn sprite_coordinates(&mut self, sprite: usize) -> Result<SpriteCoordinates> {
        self.finalize()?;
        let reference = *self.sprite_texture(sprite)?;
        self.canonical_coordinates(reference.canonical)
    }

    /// UVs of the built-in white texture, in sprite corner order.
    pub fn white_texture_coordinates(&mut self) -> Result<SpriteCoordinates> {
        self.finalize()?;
        self.canonical_coordinates(WHITE_TEXTURE)
    }

    fn canonical_coordinates(&self, canonical: usize) -> Result<SpriteCoordinates> {
        let (placement, texture, page) = self.placed(canonical)?;
        let uvs =
            SPRITE_CORNERS.map(|corner| self.corner_uv(placement, texture, page, corner, 0, false));
        Ok(SpriteCoordinates {
            page: placement.page,
            uvs,
        })
    }

    fn placed(&self, canonical: usize) -> Result<(Placement, &CanonicalTexture, PageInfo)> {
        let texture = self.registry.texture(canonical);
        let placement = texture.placement().ok_or(AtlasError::Unplaced(canonical))?;
        let page = self.page(placement.page)?;
        Ok((placement, texture, page))
    }

    fn corner_uv(
        &self,
        placement: Placement,
        texture: &CanonicalTexture,
        page: PageInfo,
        corner: CornerLocation,
        shift: i32,
        split: bool,
    ) -> [f32; 2] {
        let border = self.config.border_width as i64;
        let left = placement.x_with_border as i64 + border;
        let top = placement.y_with_border as i64 + border;

        let x = if corner.is_left() {
            left
        } else {
            left + texture.width() as i64
        };
        let y = if corner.is_top() {
            let y = top - shift as i64;
            if split {
                y + (texture.height() / 2) as i64
            } else {
                y
            }
        } else {
            top + texture.height() as i64 - shift as i64
        };

        [x as f32 / page.width as f32, y as f32 / page.height as f32]
    }

    /// Bake the pixels of one page.
    pub fn bake_page(&mut self, page: usize) -> Result<AtlasPage> {
        self.finalize()?;
        let info = self.page(page)?;
        bake::bake_page(
            &self.registry,
            &self.sources,
            page,
            info,
            self.config.border_width,
        )
    }

    /// Bake every page, in page order.
    pub fn bake_pages(&mut self) -> Result<Vec<AtlasPage>> {
        let count = self.num_pages()?;
        (0..count).map(|page| self.bake_page(page)).collect()
    }
}
