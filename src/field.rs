//! # Field Data
//!
//! Scalar and vector data attached to the points or the cells of a mesh. Fields are staged
//! in a [`FieldStore`] and written in registration order. Per attachment, the most recently
//! added scalar and vector fields are the *active* ones, which paraview colors by default.

use crate::utils;
use crate::Error;

use ndarray::{s, Array2, ArrayView1};

/// Where a field lives on the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Attachment {
    #[display(fmt = "PointData")]
    Point,
    #[display(fmt = "CellData")]
    Cell,
}

/// A named block of field data with one (scalar) or three (vector) columns
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    data: Array2<f64>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// number of tuples (rows)
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// 1 for scalars, 3 for vectors
    pub fn components(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_vector(&self) -> bool {
        self.components() == 3
    }

    /// the values in row-major (tuple interleaved) order
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// the single column of a scalar field
    pub fn scalars(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    /// check that the field has one tuple per entity it is attached to
    pub(crate) fn check_len(&self, expected: usize) -> Result<(), Error> {
        if self.len() != expected {
            return Err(Error::FieldLength {
                name: self.name.clone(),
                expected,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

/// The fields of one attachment point, along with the names of the active arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<Field>,
    active_scalars: Option<String>,
    active_vectors: Option<String>,
}

impl FieldSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn active_scalars(&self) -> Option<&str> {
        self.active_scalars.as_deref()
    }

    pub fn active_vectors(&self) -> Option<&str> {
        self.active_vectors.as_deref()
    }

    fn push(&mut self, field: Field) {
        let active = if field.is_vector() {
            &mut self.active_vectors
        } else {
            &mut self.active_scalars
        };

        if let Some(previous) = active.replace(field.name.clone()) {
            log::trace!("`{}` replaces `{previous}` as the active array", field.name);
        }

        self.fields.push(field);
    }

    /// check every field against the number of entities it is attached to
    pub(crate) fn check_len(&self, expected: usize) -> Result<(), Error> {
        self.fields.iter().try_for_each(|f| f.check_len(expected))
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Staging area for the fields of the next mesh write
///
/// ```
/// use paraview_mesh::{Attachment, FieldStore};
/// use paraview_mesh::ndarray::array;
///
/// let mut store = FieldStore::default();
/// store.add("velocity", Attachment::Point, array![[1., 2.], [3., 4.]]).unwrap();
///
/// let velocity = store.fields(Attachment::Point).iter().next().unwrap();
/// assert_eq!(velocity.data(), &array![[1., 2., 0.], [3., 4., 0.]]);
/// assert_eq!(store.fields(Attachment::Point).active_vectors(), Some("velocity"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    point: FieldSet,
    cell: FieldSet,
}

impl FieldStore {
    /// Register a field.
    ///
    /// One column is a scalar field, three columns a vector field. Two column vectors are
    /// padded with a zero third component. Values smaller than `1e-16` in magnitude are
    /// written as exactly zero.
    pub fn add(
        &mut self,
        name: &str,
        attachment: Attachment,
        data: Array2<f64>,
    ) -> Result<(), Error> {
        let columns = data.ncols();

        let data = match columns {
            1 | 3 => data,
            2 => {
                let mut padded = Array2::zeros((data.nrows(), 3));
                padded.slice_mut(s![.., 0..2]).assign(&data);
                padded
            }
            _ => {
                return Err(Error::FieldComponents {
                    name: name.to_string(),
                    columns,
                })
            }
        };

        let data = data.as_standard_layout().mapv(utils::flush_to_zero);

        let field = Field {
            name: name.to_string(),
            data,
        };

        self.fields_mut(attachment).push(field);

        Ok(())
    }

    pub fn fields(&self, attachment: Attachment) -> &FieldSet {
        match attachment {
            Attachment::Point => &self.point,
            Attachment::Cell => &self.cell,
        }
    }

    fn fields_mut(&mut self, attachment: Attachment) -> &mut FieldSet {
        match attachment {
            Attachment::Point => &mut self.point,
            Attachment::Cell => &mut self.cell,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty() && self.cell.is_empty()
    }

    /// Move the staged fields out of the store, leaving it empty
    pub fn take(&mut self) -> FieldStore {
        std::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.point = FieldSet::default();
        self.cell = FieldSet::default();
    }

    /// check every field against the entity counts of a mesh
    pub(crate) fn check_lengths(&self, n_points: usize, n_cells: usize) -> Result<(), Error> {
        self.point.check_len(n_points)?;
        self.cell.check_len(n_cells)?;
        Ok(())
    }
}
