#![doc = include_str!("../README.md")]

pub mod cells;
pub mod collection;
pub mod encoding;
pub mod field;
mod mesh;
pub mod prelude;
pub mod store;
mod traits;
mod utils;
mod write_hdf;
mod write_vtu;

pub use cells::{CellArrays, CellElement, CellKind, CellTypeError, Cells, VtkCellType};
pub use collection::{PvdWriter, VtmWriter};
pub use encoding::Base64Frame;
pub use field::{Attachment, Field, FieldStore};
pub use mesh::Mesh;
pub use store::{AttributeValue, Dataset, DatasetStore, MemoryStore};
pub use traits::{Encode, MeshWriter, Numeric, Precision};
pub use write_hdf::{HdfOptions, HdfWriter};
pub use write_vtu::{Encoding, VtuWriter};

#[cfg(feature = "hdf5")]
pub use store::Hdf5Store;

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not convert encoded data to uf8: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("Could not resolve a vtk cell type: {0}")]
    CellType(#[from] CellTypeError),
    #[error("points must have 2 or 3 components, got {columns}")]
    PointDimension { columns: usize },
    #[error("field `{name}` must have 1, 2 or 3 components, got {columns}")]
    FieldComponents { name: String, columns: usize },
    #[error("field `{name}` has {actual} rows but is attached to {expected} entities")]
    FieldLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("a pvd collection cannot step through frames with a skip of zero")]
    InvalidSkipFrame,
    #[error("dataset store failure: {0}")]
    Store(String),
    #[cfg(feature = "hdf5")]
    #[error("hdf5 failure: {0}")]
    Hdf5(#[from] hdf5::Error),
}

/// Binary encoding marker type
///
/// Every `DataArray` is written inline as a base64 frame (`format="binary"`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Binary;

/// ascii encoding marker type
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ascii;

impl traits::Encode for Binary {
    fn is_binary() -> bool {
        true
    }
}

impl traits::Encode for Ascii {
    fn is_binary() -> bool {
        false
    }
}
