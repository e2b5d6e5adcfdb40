//! # Dataset stores
//!
//! The VTKHDF writer does not talk to HDF5 directly. It writes through a
//! [`DatasetStore`]: a hierarchy of groups addressed by `/` separated paths, holding typed
//! n-dimensional datasets and attributes. [`MemoryStore`] keeps everything in memory and is
//! what the tests inspect; with the `hdf5` feature enabled, [`Hdf5Store`] writes a real
//! `.hdf` file.

#[cfg(feature = "hdf5")]
mod hdf5_file;

#[cfg(feature = "hdf5")]
pub use hdf5_file::Hdf5Store;

use crate::Error;

use ndarray::{ArrayD, ArrayView1, ArrayViewD};
use std::collections::BTreeMap;

/// A borrowed dataset to be written to a store
#[derive(Debug, Clone)]
pub enum Dataset<'a> {
    Int64(ArrayView1<'a, i64>),
    UInt8(ArrayView1<'a, u8>),
    Float64(ArrayViewD<'a, f64>),
}

impl<'a> Dataset<'a> {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int64(x) => x.shape(),
            Self::UInt8(x) => x.shape(),
            Self::Float64(x) => x.shape(),
        }
    }
}

/// A borrowed attribute value to be written to a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Int64(&'a [i64]),
    Str(&'a str),
}

/// A key-path store of groups, datasets and attributes
pub trait DatasetStore {
    /// create the group at `path`; its parent must already exist
    fn create_group(&mut self, path: &str) -> Result<(), Error>;

    /// write a dataset at `path`, replacing any previous dataset there
    fn write_dataset(&mut self, path: &str, data: Dataset<'_>) -> Result<(), Error>;

    /// attach an attribute named `name` to the group at `group`
    fn write_attribute(
        &mut self,
        group: &str,
        name: &str,
        value: AttributeValue<'_>,
    ) -> Result<(), Error>;

    /// make sure everything written so far has reached the backing storage
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// An owned dataset held by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoredDataset {
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    Float64(ArrayD<f64>),
}

impl StoredDataset {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int64(x) => x.shape(),
            Self::UInt8(x) => x.shape(),
            Self::Float64(x) => x.shape(),
        }
    }

    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            Self::Int64(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<&ArrayD<u8>> {
        match self {
            Self::UInt8(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Float64(x) => Some(x),
            _ => None,
        }
    }
}

impl<'a> From<Dataset<'a>> for StoredDataset {
    fn from(x: Dataset<'a>) -> Self {
        match x {
            Dataset::Int64(x) => Self::Int64(x.to_owned().into_dyn()),
            Dataset::UInt8(x) => Self::UInt8(x.to_owned().into_dyn()),
            Dataset::Float64(x) => Self::Float64(x.to_owned()),
        }
    }
}

/// An owned attribute held by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAttribute {
    Int64(Vec<i64>),
    Str(String),
}

impl<'a> From<AttributeValue<'a>> for StoredAttribute {
    fn from(x: AttributeValue<'a>) -> Self {
        match x {
            AttributeValue::Int64(values) => Self::Int64(values.to_vec()),
            AttributeValue::Str(value) => Self::Str(value.to_string()),
        }
    }
}

/// In-memory [`DatasetStore`]
///
/// Paths are normalized to start with a single `/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    groups: Vec<String>,
    datasets: BTreeMap<String, StoredDataset>,
    attributes: BTreeMap<(String, String), StoredAttribute>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_group(&self, path: &str) -> bool {
        let path = normalize(path);
        path == "/" || self.groups.contains(&path)
    }

    pub fn dataset(&self, path: &str) -> Option<&StoredDataset> {
        self.datasets.get(&normalize(path))
    }

    pub fn attribute(&self, group: &str, name: &str) -> Option<&StoredAttribute> {
        self.attributes.get(&(normalize(group), name.to_string()))
    }

    /// every dataset path, in sorted order
    pub fn dataset_paths(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    fn require_parent(&self, path: &str) -> Result<(), Error> {
        let parent = match path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &path[..idx],
        };

        if self.has_group(parent) {
            Ok(())
        } else {
            Err(Error::Store(format!("group `{parent}` does not exist")))
        }
    }
}

impl DatasetStore for MemoryStore {
    fn create_group(&mut self, path: &str) -> Result<(), Error> {
        let path = normalize(path);
        self.require_parent(&path)?;

        if self.has_group(&path) {
            return Err(Error::Store(format!("group `{path}` already exists")));
        }

        self.groups.push(path);
        Ok(())
    }

    fn write_dataset(&mut self, path: &str, data: Dataset<'_>) -> Result<(), Error> {
        let path = normalize(path);
        self.require_parent(&path)?;

        self.datasets.insert(path, StoredDataset::from(data));
        Ok(())
    }

    fn write_attribute(
        &mut self,
        group: &str,
        name: &str,
        value: AttributeValue<'_>,
    ) -> Result<(), Error> {
        let group = normalize(group);
        if !self.has_group(&group) {
            return Err(Error::Store(format!("group `{group}` does not exist")));
        }

        self.attributes
            .insert((group, name.to_string()), StoredAttribute::from(value));
        Ok(())
    }
}

/// highest deflate level accepted by HDF5
pub const MAX_COMPRESSION: u8 = 9;

/// reject deflate levels HDF5 does not accept
pub(crate) fn check_compression(level: u8) -> Result<(), Error> {
    if level > MAX_COMPRESSION {
        return Err(Error::Store(format!(
            "compression level {level} is outside 0..={MAX_COMPRESSION}"
        )));
    }
    Ok(())
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array2};

    #[test]
    fn groups_must_exist() {
        let mut store = MemoryStore::new();
        let values = arr1(&[1_i64, 2, 3]);

        assert!(store
            .write_dataset("/a/b", Dataset::Int64(values.view()))
            .is_err());

        store.create_group("a").unwrap();
        store
            .write_dataset("/a/b", Dataset::Int64(values.view()))
            .unwrap();

        let stored = store.dataset("a/b").unwrap();
        assert_eq!(stored.shape(), &[3]);
        assert_eq!(stored.as_i64().unwrap().as_slice().unwrap(), &[1, 2, 3]);
        assert!(stored.as_f64().is_none());
    }

    #[test]
    fn compression_levels() {
        assert!(check_compression(0).is_ok());
        assert!(check_compression(MAX_COMPRESSION).is_ok());
        assert!(matches!(check_compression(10), Err(Error::Store(_))));
    }

    #[test]
    fn duplicate_group() {
        let mut store = MemoryStore::new();
        store.create_group("/VTKHDF").unwrap();
        assert!(store.create_group("VTKHDF/").is_err());
        assert!(store.create_group("/missing/child").is_err());
    }

    #[test]
    fn matrix_dataset_and_attributes() {
        let mut store = MemoryStore::new();
        store.create_group("/g").unwrap();

        let points = Array2::<f64>::ones((4, 3));
        store
            .write_dataset("/g/points", Dataset::Float64(points.view().into_dyn()))
            .unwrap();
        store
            .write_attribute("/g", "Version", AttributeValue::Int64(&[1, 0]))
            .unwrap();
        store
            .write_attribute("/g", "Type", AttributeValue::Str("UnstructuredGrid"))
            .unwrap();

        assert_eq!(store.dataset("/g/points").unwrap().shape(), &[4, 3]);
        assert_eq!(
            store.attribute("/g", "Version"),
            Some(&StoredAttribute::Int64(vec![1, 0]))
        );
        assert_eq!(
            store.attribute("/g", "Type"),
            Some(&StoredAttribute::Str("UnstructuredGrid".into()))
        );
        assert!(store
            .write_attribute("/h", "x", AttributeValue::Int64(&[]))
            .is_err());
    }
}
