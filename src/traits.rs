//! # Traits
//!
//! These are the general purpose traits shared by the writers in this crate.
//! [`Numeric`] describes the scalar types that may appear in a `DataArray`,
//! [`Encode`] carries the type-level choice between ascii and binary VTU output,
//! and [`MeshWriter`] is the common surface of the VTU and VTKHDF writers.
//!

use crate::field::{Attachment, FieldStore};
use crate::Error;
use crate::Mesh;

use ndarray::Array2;
use std::io::Write;
use std::path::Path;

/// The `type` attribute of a `DataArray` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Precision {
    #[display(fmt = "Float32")]
    Float32,
    #[display(fmt = "Float64")]
    Float64,
    #[display(fmt = "Int64")]
    Int64,
    #[display(fmt = "UInt8")]
    UInt8,
}

/// A fixed width number that can be written to a vtk file, either as
/// little endian bytes or as ascii text.
pub trait Numeric: Copy {
    /// number of bytes in the little endian representation
    const SIZE: usize;

    fn as_precision() -> Precision;

    fn extend_le_bytes(&self, buffer: &mut Vec<u8>);

    fn write_le_bytes<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error>;

    /// append the ascii representation of the number to `buffer`
    fn push_ascii(&self, buffer: &mut String);
}

macro_rules! impl_numeric_float {
    ($float:ty, $precision:expr) => {
        impl Numeric for $float {
            const SIZE: usize = std::mem::size_of::<$float>();

            fn as_precision() -> Precision {
                $precision
            }

            fn extend_le_bytes(&self, buffer: &mut Vec<u8>) {
                buffer.extend_from_slice(&self.to_le_bytes());
            }

            fn write_le_bytes<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
                writer.write_all(&self.to_le_bytes())
            }

            fn push_ascii(&self, buffer: &mut String) {
                let mut ryu_buffer = ryu::Buffer::new();
                buffer.push_str(ryu_buffer.format(*self));
            }
        }
    };
}

macro_rules! impl_numeric_int {
    ($int:ty, $precision:expr) => {
        impl Numeric for $int {
            const SIZE: usize = std::mem::size_of::<$int>();

            fn as_precision() -> Precision {
                $precision
            }

            fn extend_le_bytes(&self, buffer: &mut Vec<u8>) {
                buffer.extend_from_slice(&self.to_le_bytes());
            }

            fn write_le_bytes<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
                writer.write_all(&self.to_le_bytes())
            }

            fn push_ascii(&self, buffer: &mut String) {
                buffer.push_str(&self.to_string());
            }
        }
    };
}

impl_numeric_float!(f64, Precision::Float64);
impl_numeric_float!(f32, Precision::Float32);
impl_numeric_int!(i64, Precision::Int64);
impl_numeric_int!(u8, Precision::UInt8);

/// Type level switch between `format="ascii"` and `format="binary"` data arrays
pub trait Encode {
    fn is_binary() -> bool;
}

/// Common interface of the mesh writers.
///
/// Fields are staged with [`add_field`](MeshWriter::add_field) and
/// [`add_cell_field`](MeshWriter::add_cell_field) and are consumed by the next call to
/// [`write_mesh`](MeshWriter::write_mesh): after a write (successful or not) the writer
/// holds no fields.
///
/// ```
/// use paraview_mesh::prelude::*;
/// use paraview_mesh::ndarray::array;
///
/// let points = array![[0., 0.], [1., 0.], [0., 1.]];
/// let cells = Cells::Uniform(array![[0_usize, 1, 2]]);
/// let mesh = Mesh::new(points, cells).unwrap();
///
/// let mut writer = VtuWriter::<Ascii>::new();
/// writer.add_field("temperature", array![[1.], [2.], [3.]]).unwrap();
///
/// let mut buffer = Vec::new();
/// writer.write_mesh_to(&mut buffer, &mesh).unwrap();
/// assert!(writer.field_store().is_empty());
/// ```
pub trait MeshWriter {
    /// the fields staged for the next write
    fn field_store(&mut self) -> &mut FieldStore;

    /// Write `mesh` and every staged field to the file at `path`, then clear the
    /// staged fields.
    fn write_mesh<P: AsRef<Path>>(&mut self, path: P, mesh: &Mesh) -> Result<(), Error>;

    /// stage a field attached to the points of the next mesh
    fn add_field(&mut self, name: &str, data: Array2<f64>) -> Result<(), Error> {
        self.field_store().add(name, Attachment::Point, data)
    }

    /// stage a field attached to the cells of the next mesh
    fn add_cell_field(&mut self, name: &str, data: Array2<f64>) -> Result<(), Error> {
        self.field_store().add(name, Attachment::Cell, data)
    }

    fn clear(&mut self) {
        self.field_store().clear()
    }
}
