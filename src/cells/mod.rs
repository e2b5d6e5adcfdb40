//! # Cell Topology
//!
//! Unstructured grids describe their cells with three parallel arrays: the flattened
//! `connectivity` of every cell, a VTK `types` tag per cell, and the `offsets` that delimit
//! each cell's slice of the connectivity. This module holds the input representations of
//! cells ([`Cells`]), the mapping from cell shapes to VTK tags ([`VtkCellType`]), and the
//! builder that produces the three arrays ([`CellArrays`]).
//!
//! ## Choosing a representation
//!
//! * [`Cells::Uniform`] for homogeneous meshes (every cell has the same number of vertices).
//!   The tag is looked up from the vertex count alone, treating higher counts as
//!   high-order simplices.
//! * [`Cells::Irregular`] for meshes whose cells have varying vertex counts but share a
//!   shape family, selected with the mesh-wide `is_simplex` / `is_poly` flags.
//! * [`Cells::Typed`] when every cell knows its own shape. This is the only representation
//!   that can describe wedges, pyramids, or a mix of tetrahedra and hexahedra.

mod arrays;
mod tags;

pub use arrays::CellArrays;
pub use tags::{resolve, resolve_by_count, resolve_planar, resolve_volume, VtkCellType};

use ndarray::Array2;

/// The shape of a single cell in a [`Cells::Typed`] list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CellKind {
    #[display(fmt = "vertex")]
    Vertex,
    #[display(fmt = "line")]
    Line,
    #[display(fmt = "triangle")]
    Triangle,
    #[display(fmt = "quadrilateral")]
    Quadrilateral,
    #[display(fmt = "polygon")]
    Polygon,
    #[display(fmt = "tetrahedron")]
    Tetrahedron,
    #[display(fmt = "hexahedron")]
    Hexahedron,
    #[display(fmt = "wedge")]
    Wedge,
    #[display(fmt = "pyramid")]
    Pyramid,
    #[display(fmt = "polyhedron")]
    Polyhedron,
}

/// A cell with an explicit shape. The vertices are 0-based indices into the point list
/// of the mesh. High-order elements list their vertices in VTK's Lagrange ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellElement {
    pub kind: CellKind,
    pub vertices: Vec<usize>,
}

impl CellElement {
    pub fn new(kind: CellKind, vertices: Vec<usize>) -> Self {
        Self { kind, vertices }
    }
}

/// The cells of a mesh
///
/// Vertex indices are not checked against the number of points; an out of range
/// index is written to the file as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Cells {
    /// `n_cells x n_vertices` table of vertex indices
    Uniform(Array2<usize>),
    /// independently sized cells whose shape follows from their vertex count and the flags
    Irregular {
        cells: Vec<Vec<usize>>,
        is_simplex: bool,
        is_poly: bool,
    },
    /// cells carrying their own shape
    Typed(Vec<CellElement>),
}

impl Cells {
    /// number of cells described
    pub fn len(&self) -> usize {
        match self {
            Self::Uniform(table) => table.nrows(),
            Self::Irregular { cells, .. } => cells.len(),
            Self::Typed(elements) => elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// total number of vertex indices over all cells
    pub fn n_connectivity_ids(&self) -> usize {
        match self {
            Self::Uniform(table) => table.len(),
            Self::Irregular { cells, .. } => cells.iter().map(Vec::len).sum(),
            Self::Typed(elements) => elements.iter().map(|e| e.vertices.len()).sum(),
        }
    }
}

/// A cell shape and vertex count that do not describe a valid VTK cell
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CellTypeError {
    #[error("a {kind} cell cannot have {n_vertices} vertices")]
    InvalidVertexCount { kind: CellKind, n_vertices: usize },
}
