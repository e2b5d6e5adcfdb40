use super::tags::{resolve, resolve_by_count, VtkCellType};
use super::{CellTypeError, Cells};

/// The connectivity / types / offsets triple of an unstructured grid
///
/// `offsets` has one more entry than there are cells: `offsets[0]` is always `0` and
/// `offsets[i + 1] - offsets[i]` is the vertex count of cell `i`, so the last offset equals
/// the length of `connectivity`. The XML format stores only the end offsets (see
/// [`CellArrays::end_offsets`]), VTKHDF stores the full array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellArrays {
    pub connectivity: Vec<i64>,
    pub types: Vec<u8>,
    pub offsets: Vec<i64>,
}

impl CellArrays {
    fn with_capacity(n_cells: usize, n_ids: usize) -> Self {
        let mut offsets = Vec::with_capacity(n_cells + 1);
        offsets.push(0);

        Self {
            connectivity: Vec::with_capacity(n_ids),
            types: Vec::with_capacity(n_cells),
            offsets,
        }
    }

    /// Build the arrays for `cells` in a single pass, preserving the cell order.
    ///
    /// `is_volume` selects the volume tag table for cells that do not carry an explicit
    /// shape. Only [`Cells::Typed`] can fail, when a shape is paired with a vertex count
    /// that has no VTK cell type.
    ///
    /// ```
    /// use paraview_mesh::{CellArrays, CellElement, CellKind, Cells};
    ///
    /// let cells = Cells::Typed(vec![
    ///     CellElement::new(CellKind::Wedge, vec![0, 1, 2, 3, 4, 5]),
    ///     CellElement::new(CellKind::Pyramid, vec![0, 1, 2, 3, 6]),
    /// ]);
    /// let arrays = CellArrays::build(&cells, true).unwrap();
    ///
    /// assert_eq!(arrays.types, vec![13, 14]);
    /// assert_eq!(arrays.offsets, vec![0, 6, 11]);
    /// ```
    pub fn build(cells: &Cells, is_volume: bool) -> Result<Self, CellTypeError> {
        let mut arrays = Self::with_capacity(cells.len(), cells.n_connectivity_ids());

        match cells {
            Cells::Uniform(table) => {
                let tag = resolve_by_count(table.ncols(), is_volume, true, false);
                for row in table.rows() {
                    arrays.push_cell(row.iter().copied(), tag);
                }
            }
            Cells::Irregular {
                cells,
                is_simplex,
                is_poly,
            } => {
                for cell in cells {
                    let tag = resolve_by_count(cell.len(), is_volume, *is_simplex, *is_poly);
                    arrays.push_cell(cell.iter().copied(), tag);
                }
            }
            Cells::Typed(elements) => {
                for element in elements {
                    let tag = resolve(element.kind, element.vertices.len())?;
                    arrays.push_cell(element.vertices.iter().copied(), tag);
                }
            }
        }

        debug_assert_eq!(arrays.offsets.len(), arrays.types.len() + 1);
        debug_assert_eq!(
            arrays.offsets.last().copied(),
            Some(arrays.connectivity.len() as i64)
        );

        Ok(arrays)
    }

    // running sum: the offset after a cell is the connectivity length so far
    #[inline]
    fn push_cell<I: Iterator<Item = usize>>(&mut self, vertices: I, tag: VtkCellType) {
        self.connectivity.extend(vertices.map(|v| v as i64));
        self.types.push(tag.code());
        self.offsets.push(self.connectivity.len() as i64);
    }

    pub fn n_cells(&self) -> usize {
        self.types.len()
    }

    pub fn n_connectivity_ids(&self) -> usize {
        self.connectivity.len()
    }

    /// offsets without the leading zero, one entry per cell
    pub fn end_offsets(&self) -> &[i64] {
        &self.offsets[1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{CellElement, CellKind};
    use ndarray::array;

    #[test]
    fn uniform_triangles() {
        let cells = Cells::Uniform(array![[0, 1, 2], [2, 1, 3]]);
        let arrays = CellArrays::build(&cells, false).unwrap();

        assert_eq!(arrays.connectivity, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(arrays.types, vec![5, 5]);
        assert_eq!(arrays.offsets, vec![0, 3, 6]);
        assert_eq!(arrays.end_offsets(), &[3, 6]);
    }

    #[test]
    fn uniform_high_order_is_simplex() {
        // 10 node tetrahedra
        let cells = Cells::Uniform(ndarray::Array2::zeros((3, 10)));
        let arrays = CellArrays::build(&cells, true).unwrap();

        assert_eq!(arrays.types, vec![71, 71, 71]);
        assert_eq!(arrays.offsets, vec![0, 10, 20, 30]);
    }

    #[test]
    fn irregular_polygons() {
        let cells = Cells::Irregular {
            cells: vec![vec![0, 1, 2], vec![1, 2, 3, 4], vec![0, 1, 2, 3, 4, 5]],
            is_simplex: false,
            is_poly: true,
        };
        let arrays = CellArrays::build(&cells, false).unwrap();

        assert_eq!(arrays.types, vec![5, 9, 7]);
        assert_eq!(arrays.offsets, vec![0, 3, 7, 13]);
        assert_eq!(arrays.n_connectivity_ids(), 13);
    }

    #[test]
    fn typed_mixed_volume() {
        let cells = Cells::Typed(vec![
            CellElement::new(CellKind::Tetrahedron, vec![0, 1, 2, 3]),
            CellElement::new(CellKind::Hexahedron, (0..8).collect()),
            CellElement::new(CellKind::Wedge, (0..15).collect()),
            CellElement::new(CellKind::Vertex, vec![7]),
        ]);
        let arrays = CellArrays::build(&cells, true).unwrap();

        assert_eq!(arrays.types, vec![10, 12, 26, 1]);
        assert_eq!(arrays.offsets, vec![0, 4, 12, 27, 28]);
        assert_eq!(arrays.connectivity[27], 7);
    }

    #[test]
    fn typed_rejects_small_polygon() {
        let cells = Cells::Typed(vec![
            CellElement::new(CellKind::Triangle, vec![0, 1, 2]),
            CellElement::new(CellKind::Polygon, vec![0, 1, 2, 3]),
        ]);

        assert_eq!(
            CellArrays::build(&cells, false),
            Err(CellTypeError::InvalidVertexCount {
                kind: CellKind::Polygon,
                n_vertices: 4
            })
        );
    }

    #[test]
    fn empty_cells() {
        let cells = Cells::Irregular {
            cells: vec![],
            is_simplex: true,
            is_poly: false,
        };
        let arrays = CellArrays::build(&cells, true).unwrap();

        assert!(arrays.connectivity.is_empty());
        assert!(arrays.types.is_empty());
        assert_eq!(arrays.offsets, vec![0]);
        assert!(arrays.end_offsets().is_empty());
    }

    #[test]
    fn out_of_range_indices_pass_through() {
        let cells = Cells::Uniform(array![[0, 1, 99]]);
        let arrays = CellArrays::build(&cells, false).unwrap();
        assert_eq!(arrays.connectivity, vec![0, 1, 99]);
    }
}
