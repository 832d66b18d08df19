//! Error types for the bordered texture atlas.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Main error type for atlas building and querying.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Failed to read a manifest, config or source image from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The atlas configuration is unusable.
    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(String),

    /// A bordered footprint does not fit on a single page.
    #[error(
        "Texture footprint {width}x{height} (border {border}) exceeds page width {page_width}"
    )]
    FootprintTooLarge {
        width: u32,
        height: u32,
        border: u32,
        page_width: u32,
    },

    /// A texture or page was registered after the layout was finalized.
    #[error("Cannot register {0} after the atlas layout has been finalized")]
    RegisterAfterLayout(&'static str),

    /// A source page buffer has the wrong length.
    #[error("Source page buffer holds {actual} bytes, expected {expected}")]
    SourcePageSize { expected: usize, actual: usize },

    /// A source image on disk is not 256x256.
    #[error("Source image {} is {width}x{height}, expected 256x256", .path.display())]
    SourceImageSize {
        path: std::path::PathBuf,
        width: u32,
        height: u32,
    },

    /// A reference names a source page that was never registered.
    #[error("Source page {index} out of range ({count} registered)")]
    InvalidSourcePage { index: usize, count: usize },

    /// A source rectangle is larger than 255 pixels or leaves its page.
    #[error("Source rectangle at ({x}, {y}) sized {width}x{height} is out of bounds")]
    RectangleOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A file texture was given neither 3 nor 4 vertices.
    #[error("File texture needs 3 or 4 vertices, got {0}")]
    InvalidVertexCount(usize),

    /// The fourth vertex of a quad is not a corner of the bounding box of the first three.
    #[error("Quad vertex ({x}, {y}) is not on the corners of its bounding box")]
    NonRectangularQuad { x: u32, y: u32 },

    /// A file texture handle is out of range.
    #[error("File texture {index} out of range ({count} registered)")]
    InvalidFileTexture { index: usize, count: usize },

    /// A sprite texture handle is out of range.
    #[error("Sprite texture {index} out of range ({count} registered)")]
    InvalidSprite { index: usize, count: usize },

    /// A canonical texture has no placement after layout.
    #[error("Canonical texture {0} was never placed")]
    Unplaced(usize),

    /// An atlas page index is out of range.
    #[error("Atlas page {index} out of range ({count} pages)")]
    InvalidPage { index: usize, count: usize },
}
