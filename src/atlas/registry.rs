//! Canonical texture registry.
//!
//! Every distinct source rectangle is stored once, no matter how many
//! polygons reference it. Indices are stable for the life of the atlas.

use crate::config::WHITE_TEXTURE_SIZE;
use crate::error::{AtlasError, Result};
use crate::source::SOURCE_PAGE_SIZE;
use std::collections::HashMap;

/// Largest width or height a source rectangle may have.
pub const MAX_SOURCE_EXTENT: u32 = 255;

/// Index of the built-in white texture.
pub const WHITE_TEXTURE: usize = 0;

/// Where the texels of a canonical texture come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// Solid opaque white, synthesized while baking.
    White,
    /// A registered source page.
    Page(usize),
}

/// Identity of a canonical texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRect {
    pub source: TextureSource,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// A non-empty rectangle on source page `page`, checked against the page bounds.
    pub fn on_page(page: usize, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        let fits = |origin: u32, extent: u32| {
            (1..=MAX_SOURCE_EXTENT).contains(&extent)
                && origin
                    .checked_add(extent)
                    .is_some_and(|end| end <= SOURCE_PAGE_SIZE)
        };
        let in_bounds = fits(x, width) && fits(y, height);
        if !in_bounds {
            return Err(AtlasError::RectangleOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        Ok(Self {
            source: TextureSource::Page(page),
            x,
            y,
            width,
            height,
        })
    }

    fn white() -> Self {
        Self {
            source: TextureSource::White,
            x: 0,
            y: 0,
            width: WHITE_TEXTURE_SIZE,
            height: WHITE_TEXTURE_SIZE,
        }
    }
}

/// Final position of a canonical texture's bordered footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    pub x_with_border: u32,
    pub y_with_border: u32,
}

/// A unique source rectangle and, once laid out, where it landed.
#[derive(Debug, Clone)]
pub struct CanonicalTexture {
    pub rect: SourceRect,
    placement: Option<Placement>,
}

impl CanonicalTexture {
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// Placement, available after layout.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn is_white(&self) -> bool {
        self.rect.source == TextureSource::White
    }
}

/// Append-only list of canonical textures with an identity index.
#[derive(Debug, Clone)]
pub struct Registry {
    textures: Vec<CanonicalTexture>,
    lookup: HashMap<SourceRect, usize>,
}

impl Registry {
    /// Create a registry holding only the white texture.
    pub fn new() -> Self {
        let mut registry = Self {
            textures: Vec::new(),
            lookup: HashMap::new(),
        };
        let white = registry.register(SourceRect::white());
        debug_assert_eq!(white, WHITE_TEXTURE);
        registry
    }

    /// Return the index of `rect`, adding it if it has not been seen before.
    pub fn register(&mut self, rect: SourceRect) -> usize {
        if let Some(&index) = self.lookup.get(&rect) {
            return index;
        }

        let index = self.textures.len();
        self.textures.push(CanonicalTexture {
            rect,
            placement: None,
        });
        self.lookup.insert(rect, index);
        index
    }

    pub fn get(&self, index: usize) -> Option<&CanonicalTexture> {
        self.textures.get(index)
    }

    /// Texture at an index handed out by `register`.
    pub(crate) fn texture(&self, index: usize) -> &CanonicalTexture {
        &self.textures[index]
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalTexture> {
        self.textures.iter()
    }

    /// Record where a texture was packed. Each texture is placed exactly once.
    pub(crate) fn place(&mut self, index: usize, placement: Placement) {
        let texture = &mut self.textures[index];
        debug_assert!(
            texture.placement.is_none(),
            "canonical texture {} placed twice",
            index
        );
        texture.placement = Some(placement);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
