//! Atlas configuration.

use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard upper bound on the width of an atlas page.
pub const MAX_PAGE_WIDTH: u32 = 4096;

/// Side length of the built-in white texture used by untextured polygons.
pub const WHITE_TEXTURE_SIZE: u32 = 8;

/// Configuration fixed at atlas construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Pixels of replicated padding around every canonical texture.
    pub border_width: u32,
    /// Page width reported by the graphics backend. Clamped to 4096.
    pub max_page_width: u32,
    /// Whether the target accepts textures with non-power-of-two heights.
    pub supports_non_power_of_two: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            border_width: 16,
            max_page_width: MAX_PAGE_WIDTH,
            supports_non_power_of_two: true,
        }
    }
}

impl AtlasConfig {
    /// Set the border width.
    pub fn with_border_width(mut self, border_width: u32) -> Self {
        self.border_width = border_width;
        self
    }

    /// Set the page width limit.
    pub fn with_max_page_width(mut self, max_page_width: u32) -> Self {
        self.max_page_width = max_page_width;
        self
    }

    /// Set whether non-power-of-two page heights are allowed.
    pub fn with_non_power_of_two(mut self, supported: bool) -> Self {
        self.supports_non_power_of_two = supported;
        self
    }

    /// Effective page width after clamping.
    pub fn page_width(&self) -> u32 {
        self.max_page_width.min(MAX_PAGE_WIDTH)
    }

    /// Reject configurations that cannot hold even the white texture.
    pub fn validate(&self) -> Result<()> {
        if self.max_page_width == 0 {
            return Err(AtlasError::InvalidConfig(
                "max_page_width must be non-zero".to_string(),
            ));
        }

        let footprint = WHITE_TEXTURE_SIZE as u64 + 2 * self.border_width as u64;
        if footprint > self.page_width() as u64 {
            return Err(AtlasError::InvalidConfig(format!(
                "border width {} leaves no room on a {} pixel page",
                self.border_width,
                self.page_width()
            )));
        }

        Ok(())
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
