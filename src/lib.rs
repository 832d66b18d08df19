//! # Bordered Atlas
//!
//! A deduplicating texture atlas builder for level geometry.
//!
//! ## Overview
//!
//! Polygons reference small rectangles of a few large 256x256 source pages.
//! Many of them reference the same rectangle. The atlas merges identical
//! rectangles into canonical textures, pads each one with a border of
//! replicated edge pixels and packs them onto fixed-width pages with a
//! binary space partition packer. UV coordinates for every polygon are
//! answered against the packed layout.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bordered_atlas::{AtlasConfig, BorderedAtlas};
//!
//! let mut atlas = BorderedAtlas::new(AtlasConfig::default())?;
//! let page = atlas.add_source_page(&pixels)?;
//! let quad = atlas.add_file_texture(page, &[[0, 0], [64, 0], [64, 64], [0, 64]])?;
//!
//! // The first query lays the atlas out; registration is closed from here on.
//! let coords = atlas.coordinates(quad, false, 0, false)?;
//! let pages = atlas.bake_pages()?;
//! ```

pub mod error;
pub mod config;
pub mod packer;
pub mod source;
pub mod atlas;
pub mod export;
pub mod manifest;

// Re-export main types for convenience
pub use error::{AtlasError, Result};
pub use config::AtlasConfig;
pub use packer::Packer;
pub use source::SourcePage;
pub use atlas::{
    AtlasPage, BorderedAtlas, CornerLocation, PageInfo, PolygonCoordinates, SpriteCoordinates,
};
pub use export::LayoutReport;
pub use manifest::AtlasManifest;
