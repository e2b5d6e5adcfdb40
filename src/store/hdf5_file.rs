use super::{AttributeValue, Dataset, DatasetStore};
use crate::Error;

use hdf5::types::FixedAscii;
use hdf5::H5Type;
use ndarray::{arr0, ArrayView, ArrayView1, Dimension};
use std::path::Path;

/// Length of fixed width string attributes. `"UnstructuredGrid"` fits exactly.
const STRING_ATTRIBUTE_LEN: usize = 16;

/// [`DatasetStore`] backed by an HDF5 file
pub struct Hdf5Store {
    file: hdf5::File,
    compression: u8,
}

impl Hdf5Store {
    /// Create (or truncate) the file at `path`. Datasets are deflated with
    /// `compression` (0 - 9, 0 disables compression). Other levels are rejected before
    /// the file is created.
    pub fn create<P: AsRef<Path>>(path: P, compression: u8) -> Result<Self, Error> {
        super::check_compression(compression)?;
        let file = hdf5::File::create(path)?;
        Ok(Self { file, compression })
    }

    fn write_array<T: H5Type, D: Dimension>(
        &self,
        path: &str,
        data: ArrayView<'_, T, D>,
    ) -> Result<(), Error> {
        let builder = self.file.new_dataset_builder();

        // deflate needs a chunked layout, which cannot be empty
        if self.compression > 0 && !data.is_empty() {
            builder
                .deflate(self.compression)
                .with_data(data)
                .create(path)?;
        } else {
            builder.with_data(data).create(path)?;
        }

        Ok(())
    }
}

impl DatasetStore for Hdf5Store {
    fn create_group(&mut self, path: &str) -> Result<(), Error> {
        self.file.create_group(path)?;
        Ok(())
    }

    fn write_dataset(&mut self, path: &str, data: Dataset<'_>) -> Result<(), Error> {
        match data {
            Dataset::Int64(x) => self.write_array(path, x),
            Dataset::UInt8(x) => self.write_array(path, x),
            Dataset::Float64(x) => self.write_array(path, x),
        }
    }

    fn write_attribute(
        &mut self,
        group: &str,
        name: &str,
        value: AttributeValue<'_>,
    ) -> Result<(), Error> {
        let group = self.file.group(group)?;

        match value {
            AttributeValue::Int64(values) => {
                group
                    .new_attr_builder()
                    .with_data(ArrayView1::from(values))
                    .create(name)?;
            }
            AttributeValue::Str(value) => {
                let fixed = FixedAscii::<STRING_ATTRIBUTE_LEN>::from_ascii(value.as_bytes())
                    .map_err(|e| Error::Store(format!("attribute `{name}`: {e}")))?;
                group
                    .new_attr_builder()
                    .with_data(&arr0(fixed))
                    .create(name)?;
            }
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.file.flush()?;
        Ok(())
    }
}
