//! Common traits and types that are useful for writing meshes
#![allow(unused_imports)]

pub use crate::cells::{CellElement, CellKind, Cells};
pub use crate::collection::{PvdWriter, VtmWriter};
pub use crate::field::{Attachment, FieldStore};
pub use crate::store::{DatasetStore, MemoryStore};
pub use crate::traits::MeshWriter;
pub use crate::write_hdf::{HdfOptions, HdfWriter};
pub use crate::write_vtu::VtuWriter;
pub use crate::{Ascii, Binary, Error, Mesh};
