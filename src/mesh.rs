//! # Mesh Information
//!
//! A [`Mesh`] is a point matrix together with the [`Cells`] that connect the points.
//! Points are stored one per row: a mesh with 2 columns is *planar*, a mesh with 3 columns
//! is *volumetric*. Planar points are padded with a zero `z` coordinate when written, and
//! cells without an explicit shape are resolved against the planar tag table.

use crate::cells::{CellArrays, CellTypeError, Cells};
use crate::Error;

use ndarray::Array2;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    points: Array2<f64>,
    cells: Cells,
}

impl Mesh {
    /// Construct a mesh from a `n_points x 2` or `n_points x 3` matrix of coordinates.
    pub fn new(points: Array2<f64>, cells: Cells) -> Result<Self, Error> {
        let columns = points.ncols();
        if columns != 2 && columns != 3 {
            return Err(Error::PointDimension { columns });
        }

        Ok(Self { points, cells })
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn n_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// whether points carry 3 components
    pub fn is_volume(&self) -> bool {
        self.points.ncols() == 3
    }

    /// The points as a `n_points x 3` matrix, with a zero `z` column for planar meshes.
    pub fn padded_points(&self) -> Array2<f64> {
        if self.is_volume() {
            return self.points.as_standard_layout().into_owned();
        }

        let mut padded = Array2::zeros((self.n_points(), 3));
        padded
            .slice_mut(ndarray::s![.., 0..2])
            .assign(&self.points);
        padded
    }

    /// the connectivity / types / offsets arrays of the cells
    pub fn cell_arrays(&self) -> Result<CellArrays, CellTypeError> {
        CellArrays::build(&self.cells, self.is_volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_bad_dimension() {
        let points = Array2::<f64>::zeros((4, 4));
        let cells = Cells::Uniform(array![[0, 1, 2]]);
        assert!(matches!(
            Mesh::new(points, cells),
            Err(Error::PointDimension { columns: 4 })
        ));
    }

    #[test]
    fn planar_points_padded() {
        let points = array![[1., 2.], [3., 4.]];
        let mesh = Mesh::new(points, Cells::Uniform(array![[0, 1]])).unwrap();

        assert!(!mesh.is_volume());
        assert_eq!(mesh.padded_points(), array![[1., 2., 0.], [3., 4., 0.]]);
    }

    #[test]
    fn volume_points_unchanged() {
        let points = array![[1., 2., 3.]];
        let mesh = Mesh::new(points.clone(), Cells::Uniform(array![[0]])).unwrap();

        assert!(mesh.is_volume());
        assert_eq!(mesh.padded_points(), points);
        assert_eq!(mesh.cell_arrays().unwrap().types, vec![1]);
    }
}
