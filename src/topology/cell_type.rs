//! Geometric type of mesh entities.

use serde::{Deserialize, Serialize};

/// Geometric types for mesh entities at any level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CellType {
    /// 0D point cell.
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 2D polygon; the node count comes from the connectivity.
    Polygon,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D pyramid.
    Pyramid,
    /// 3D wedge/prism.
    Prism,
    /// 3D tensor-product cell (hex).
    Hexahedron,
    /// 3D polyhedron given by its node list.
    Polyhedron,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// All types, in canonical order.
    pub const CANONICAL: [CellType; 10] = [
        CellType::Vertex,
        CellType::Segment,
        CellType::Triangle,
        CellType::Quadrilateral,
        CellType::Polygon,
        CellType::Tetrahedron,
        CellType::Pyramid,
        CellType::Prism,
        CellType::Hexahedron,
        CellType::Polyhedron,
    ];

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral | CellType::Polygon => 2,
            CellType::Tetrahedron
            | CellType::Pyramid
            | CellType::Prism
            | CellType::Hexahedron
            | CellType::Polyhedron => 3,
        }
    }

    /// Number of nodes for fixed-size types, `None` for polygons and polyhedra.
    pub fn node_count(self) -> Option<usize> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Segment => Some(2),
            CellType::Triangle => Some(3),
            CellType::Quadrilateral => Some(4),
            CellType::Tetrahedron => Some(4),
            CellType::Pyramid => Some(5),
            CellType::Prism => Some(6),
            CellType::Hexahedron => Some(8),
            CellType::Polygon | CellType::Polyhedron => None,
        }
    }

    /// Position of this type in the output ordering: cells of a level are
    /// grouped by increasing rank.
    #[inline]
    pub fn canonical_rank(self) -> usize {
        // Declaration order is the canonical order.
        self as usize
    }
}
