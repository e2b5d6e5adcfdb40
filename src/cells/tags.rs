//! mapping from cell shapes to VTK cell type codes
//!
//! The codes follow `vtkCellType.h`
//! (<https://vtk.org/doc/nightly/html/vtkCellType_8h_source.html>) and are written
//! verbatim to the `types` array of every file.

use super::{CellKind, CellTypeError};

/// VTK cell type codes used by the writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VtkCellType {
    Vertex = 1,
    Line = 3,
    Triangle = 5,
    Polygon = 7,
    Quad = 9,
    Tetra = 10,
    Hexahedron = 12,
    Wedge = 13,
    Pyramid = 14,
    QuadraticWedge = 26,
    QuadraticPyramid = 27,
    BiquadraticQuadraticWedge = 32,
    Polyhedron = 42,
    LagrangeTriangle = 69,
    LagrangeQuadrilateral = 70,
    LagrangeTetrahedron = 71,
    LagrangeHexahedron = 72,
    LagrangeWedge = 73,
    LagrangePyramid = 74,
}

impl VtkCellType {
    /// the numeric code stored in a `types` array
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<VtkCellType> for u8 {
    fn from(x: VtkCellType) -> Self {
        x.code()
    }
}

/// Resolve the tag of a cell with an explicit shape.
///
/// Shapes with a linear form map their exact vertex count to the linear tag and any other
/// count to the matching Lagrange tag. Vertex and line cells must have exactly 1 and 2
/// vertices, polygons more than 4, and polyhedra at least 4.
pub fn resolve(kind: CellKind, n_vertices: usize) -> Result<VtkCellType, CellTypeError> {
    let tag = match (kind, n_vertices) {
        (CellKind::Vertex, 1) => VtkCellType::Vertex,
        (CellKind::Line, 2) => VtkCellType::Line,

        (CellKind::Triangle, 3) => VtkCellType::Triangle,
        (CellKind::Triangle, _) => VtkCellType::LagrangeTriangle,

        (CellKind::Quadrilateral, 4) => VtkCellType::Quad,
        (CellKind::Quadrilateral, _) => VtkCellType::LagrangeQuadrilateral,

        (CellKind::Polygon, n) if n > 4 => VtkCellType::Polygon,

        (CellKind::Tetrahedron, 4) => VtkCellType::Tetra,
        (CellKind::Tetrahedron, _) => VtkCellType::LagrangeTetrahedron,

        (CellKind::Hexahedron, 8) => VtkCellType::Hexahedron,
        (CellKind::Hexahedron, _) => VtkCellType::LagrangeHexahedron,

        (CellKind::Wedge, 6) => VtkCellType::Wedge,
        (CellKind::Wedge, 15) => VtkCellType::QuadraticWedge,
        (CellKind::Wedge, 18) => VtkCellType::BiquadraticQuadraticWedge,
        (CellKind::Wedge, _) => VtkCellType::LagrangeWedge,

        (CellKind::Pyramid, 5) => VtkCellType::Pyramid,
        (CellKind::Pyramid, 13) => VtkCellType::QuadraticPyramid,
        (CellKind::Pyramid, _) => VtkCellType::LagrangePyramid,

        (CellKind::Polyhedron, n) if n >= 4 => VtkCellType::Polyhedron,

        (kind, n_vertices) => {
            return Err(CellTypeError::InvalidVertexCount { kind, n_vertices })
        }
    };

    Ok(tag)
}

/// tag of a cell in a planar (2 component) mesh from its vertex count
pub fn resolve_planar(n_vertices: usize, is_simplex: bool, is_poly: bool) -> VtkCellType {
    match n_vertices {
        1 => VtkCellType::Vertex,
        2 => VtkCellType::Line,
        3 => VtkCellType::Triangle,
        4 => VtkCellType::Quad,
        _ if is_poly => VtkCellType::Polygon,
        _ if is_simplex => VtkCellType::LagrangeTriangle,
        _ => VtkCellType::LagrangeQuadrilateral,
    }
}

/// tag of a cell in a volumetric (3 component) mesh from its vertex count
pub fn resolve_volume(n_vertices: usize, is_simplex: bool, is_poly: bool) -> VtkCellType {
    match n_vertices {
        1 => VtkCellType::Vertex,
        2 => VtkCellType::Line,
        3 => VtkCellType::Triangle,
        4 => VtkCellType::Tetra,
        8 => VtkCellType::Hexahedron,
        _ if is_poly => VtkCellType::Polyhedron,
        _ if is_simplex => VtkCellType::LagrangeTetrahedron,
        _ => VtkCellType::LagrangeHexahedron,
    }
}

/// Resolve the tag of a cell without an explicit shape, choosing the planar or volume
/// table from `is_volume`.
#[inline]
pub fn resolve_by_count(
    n_vertices: usize,
    is_volume: bool,
    is_simplex: bool,
    is_poly: bool,
) -> VtkCellType {
    if is_volume {
        resolve_volume(n_vertices, is_simplex, is_poly)
    } else {
        resolve_planar(n_vertices, is_simplex, is_poly)
    }
}
