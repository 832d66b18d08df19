//! Caller-visible texture references and corner classification.

use crate::error::{AtlasError, Result};

/// Which corner of a canonical rectangle a polygon vertex maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CornerLocation {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerLocation {
    /// Classify a vertex by comparing it with the rectangle origin.
    pub fn classify(vertex: [u32; 2], min_x: u32, min_y: u32) -> Self {
        match (vertex[0] == min_x, vertex[1] == min_y) {
            (true, true) => CornerLocation::TopLeft,
            (true, false) => CornerLocation::BottomLeft,
            (false, true) => CornerLocation::TopRight,
            (false, false) => CornerLocation::BottomRight,
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, CornerLocation::TopLeft | CornerLocation::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, CornerLocation::TopLeft | CornerLocation::BottomLeft)
    }
}

/// Corner order used for every sprite.
pub const SPRITE_CORNERS: [CornerLocation; 4] = [
    CornerLocation::TopRight,
    CornerLocation::TopLeft,
    CornerLocation::BottomLeft,
    CornerLocation::BottomRight,
];

/// Axis-aligned bounds of a triangle or quad in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub width: u32,
    pub height: u32,
}

impl VertexBounds {
    /// Bounds of the first three vertices.
    ///
    /// A fourth vertex must sit on one of the corners those three span,
    /// otherwise the quad is not an axis-aligned rectangle.
    pub fn from_vertices(vertices: &[[u32; 2]]) -> Result<Self> {
        if vertices.len() != 3 && vertices.len() != 4 {
            return Err(AtlasError::InvalidVertexCount(vertices.len()));
        }

        let defining = &vertices[..3];
        let min_x = defining.iter().map(|v| v[0]).min().unwrap_or(0);
        let max_x = defining.iter().map(|v| v[0]).max().unwrap_or(0);
        let min_y = defining.iter().map(|v| v[1]).min().unwrap_or(0);
        let max_y = defining.iter().map(|v| v[1]).max().unwrap_or(0);

        if let Some(&[x, y]) = vertices.get(3) {
            let on_x = x == min_x || x == max_x;
            let on_y = y == min_y || y == max_y;
            if !on_x || !on_y {
                return Err(AtlasError::NonRectangularQuad { x, y });
            }
        }

        Ok(Self {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

/// A quad or triangle texture with per-vertex corner mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTextureReference {
    pub canonical: usize,
    corners: Vec<CornerLocation>,
}

impl FileTextureReference {
    pub fn new(canonical: usize, vertices: &[[u32; 2]], bounds: &VertexBounds) -> Self {
        let corners = vertices
            .iter()
            .map(|&v| CornerLocation::classify(v, bounds.min_x, bounds.min_y))
            .collect();
        Self { canonical, corners }
    }

    /// Corner of each vertex, in registration order.
    pub fn corners(&self) -> &[CornerLocation] {
        &self.corners
    }
}

/// A sprite texture. Corners always follow `SPRITE_CORNERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteTextureReference {
    pub canonical: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_corners() {
        assert_eq!(CornerLocation::classify([4, 8], 4, 8), CornerLocation::TopLeft);
        assert_eq!(CornerLocation::classify([4, 20], 4, 8), CornerLocation::BottomLeft);
        assert_eq!(CornerLocation::classify([30, 8], 4, 8), CornerLocation::TopRight);
        assert_eq!(CornerLocation::classify([30, 20], 4, 8), CornerLocation::BottomRight);
    }

    #[test]
    fn test_bounds_from_triangle() {
        let bounds = VertexBounds::from_vertices(&[[64, 0], [0, 32], [0, 0]]).unwrap();
        assert_eq!(
            bounds,
            VertexBounds {
                min_x: 0,
                min_y: 0,
                width: 64,
                height: 32
            }
        );
    }

    #[test]
    fn test_quad_fourth_vertex_checked() {
        let quad = [[10, 10], [20, 10], [20, 30], [10, 30]];
        assert!(VertexBounds::from_vertices(&quad).is_ok());

        let skewed = [[10, 10], [20, 10], [20, 30], [12, 30]];
        assert!(matches!(
            VertexBounds::from_vertices(&skewed),
            Err(AtlasError::NonRectangularQuad { x: 12, y: 30 })
        ));
    }

    #[test]
    fn test_vertex_count_checked() {
        assert!(matches!(
            VertexBounds::from_vertices(&[[0, 0], [1, 1]]),
            Err(AtlasError::InvalidVertexCount(2))
        ));
    }

    #[test]
    fn test_reference_keeps_winding() {
        let vertices = [[20, 30], [10, 30], [10, 10], [20, 10]];
        let bounds = VertexBounds::from_vertices(&vertices).unwrap();
        let reference = FileTextureReference::new(1, &vertices, &bounds);
        assert_eq!(
            reference.corners(),
            &[
                CornerLocation::BottomRight,
                CornerLocation::BottomLeft,
                CornerLocation::TopLeft,
                CornerLocation::TopRight,
            ]
        );
    }
}
