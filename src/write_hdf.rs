use crate::field::{Attachment, FieldSet, FieldStore};
use crate::store::{self, AttributeValue, Dataset, DatasetStore};
use crate::traits::MeshWriter;
use crate::Error;
use crate::Mesh;

use ndarray::{arr1, ArrayView1};
use std::path::Path;

const ROOT: &str = "/VTKHDF";

/// Output options for [`HdfWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdfOptions {
    /// deflate level for every dataset, 0 (none) to 9. Higher levels fail the
    /// file write with [`Error::Store`].
    pub compression: u8,
}

impl Default for HdfOptions {
    fn default() -> Self {
        Self { compression: 5 }
    }
}

/// Writes meshes in the VTKHDF unstructured grid layout
///
/// [`write_mesh_to`](HdfWriter::write_mesh_to) targets any [`DatasetStore`];
/// [`MeshWriter::write_mesh`] creates an `.hdf` file and requires the `hdf5` feature.
///
/// ```
/// use paraview_mesh::prelude::*;
/// use paraview_mesh::ndarray::array;
///
/// let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
/// let mesh = Mesh::new(points, Cells::Uniform(array![[0_usize, 1, 2, 3]])).unwrap();
///
/// let mut store = MemoryStore::new();
/// HdfWriter::new().write_mesh_to(&mut store, &mesh).unwrap();
///
/// let types = store.dataset("/VTKHDF/Types").unwrap();
/// assert_eq!(types.as_u8().unwrap().as_slice().unwrap(), &[10]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HdfWriter {
    fields: FieldStore,
    options: HdfOptions,
}

impl HdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: HdfOptions) -> Self {
        Self {
            fields: FieldStore::default(),
            options,
        }
    }

    pub fn options(&self) -> &HdfOptions {
        &self.options
    }

    /// Write `mesh` and the staged fields to `store`, then clear the staged fields.
    pub fn write_mesh_to<S: DatasetStore>(&mut self, store: &mut S, mesh: &Mesh) -> Result<(), Error> {
        let fields = self.fields.take();
        write_vtkhdf(store, mesh, &fields)?;
        store.flush()
    }
}

impl MeshWriter for HdfWriter {
    fn field_store(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    #[cfg(feature = "hdf5")]
    fn write_mesh<P: AsRef<Path>>(&mut self, path: P, mesh: &Mesh) -> Result<(), Error> {
        let fields = self.fields.take();
        store::check_compression(self.options.compression)?;

        let path = path.as_ref();
        log::debug!("writing vtkhdf file {}", path.display());

        let mut store = crate::store::Hdf5Store::create(path, self.options.compression)?;
        write_vtkhdf(&mut store, mesh, &fields)?;
        store.flush()
    }

    #[cfg(not(feature = "hdf5"))]
    fn write_mesh<P: AsRef<Path>>(&mut self, path: P, _mesh: &Mesh) -> Result<(), Error> {
        self.fields.clear();
        store::check_compression(self.options.compression)?;

        Err(Error::Store(format!(
            "cannot write {}: built without the `hdf5` feature",
            path.as_ref().display()
        )))
    }
}

fn write_vtkhdf<S: DatasetStore>(store: &mut S, mesh: &Mesh, fields: &FieldStore) -> Result<(), Error> {
    fields.check_lengths(mesh.n_points(), mesh.n_cells())?;
    let cell_arrays = mesh.cell_arrays()?;

    log::debug!(
        "vtkhdf: {} points, {} cells, {} connectivity ids",
        mesh.n_points(),
        cell_arrays.n_cells(),
        cell_arrays.n_connectivity_ids()
    );

    store.create_group(ROOT)?;
    store.write_attribute(ROOT, "Version", AttributeValue::Int64(&[1, 0]))?;
    store.write_attribute(ROOT, "Type", AttributeValue::Str("UnstructuredGrid"))?;

    write_count(store, "NumberOfPoints", mesh.n_points())?;
    write_count(store, "NumberOfCells", cell_arrays.n_cells())?;
    write_count(store, "NumberOfConnectivityIds", cell_arrays.n_connectivity_ids())?;

    let points = mesh.padded_points();
    store.write_dataset(
        &format!("{ROOT}/Points"),
        Dataset::Float64(points.view().into_dyn()),
    )?;

    write_field_set(store, Attachment::Point, fields.fields(Attachment::Point))?;
    write_field_set(store, Attachment::Cell, fields.fields(Attachment::Cell))?;

    store.write_dataset(
        &format!("{ROOT}/Connectivity"),
        Dataset::Int64(ArrayView1::from(&cell_arrays.connectivity)),
    )?;
    store.write_dataset(
        &format!("{ROOT}/Types"),
        Dataset::UInt8(ArrayView1::from(&cell_arrays.types)),
    )?;
    store.write_dataset(
        &format!("{ROOT}/Offsets"),
        Dataset::Int64(ArrayView1::from(&cell_arrays.offsets)),
    )?;

    Ok(())
}

/// the element counts are stored as one element arrays
fn write_count<S: DatasetStore>(store: &mut S, name: &str, count: usize) -> Result<(), Error> {
    let count = arr1(&[count as i64]);
    store.write_dataset(&format!("{ROOT}/{name}"), Dataset::Int64(count.view()))
}

fn write_field_set<S: DatasetStore>(
    store: &mut S,
    attachment: Attachment,
    fields: &FieldSet,
) -> Result<(), Error> {
    if fields.is_empty() {
        return Ok(());
    }

    let group = format!("{ROOT}/{attachment}");
    store.create_group(&group)?;

    for field in fields {
        log::trace!("writing {attachment} `{}`", field.name());

        let path = format!("{group}/{}", field.name());
        // scalars are stored as a flat array, vectors as n x 3
        let data = if field.is_vector() {
            field.data().view().into_dyn()
        } else {
            field.scalars().into_dyn()
        };

        store.write_dataset(&path, Dataset::Float64(data))?;
    }

    Ok(())
}
