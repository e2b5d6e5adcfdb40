//! # Collections
//!
//! Index files that tie already written meshes together: [`PvdWriter`] writes a time series
//! (`.pvd`) and [`VtmWriter`] writes a multi-block dataset (`.vtm`). Neither touches the
//! mesh files themselves, they only reference them by name.

use crate::utils;
use crate::write_vtu::{end_element, newline, start_element};
use crate::Error;

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// Writes `.pvd` time series collections
///
/// ```
/// use paraview_mesh::PvdWriter;
///
/// let mut buffer = Vec::new();
/// PvdWriter::write_to(&mut buffer, |i| format!("step_{i}.vtu"), 4, 0.0, 0.5, 2).unwrap();
///
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.contains(r#"<DataSet timestep="1" group="" part="0" file="step_2.vtu"/>"#));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PvdWriter;

impl PvdWriter {
    /// Write a collection of the frames `0, skip_frame, 2 * skip_frame, ..` up to and
    /// including `time_steps` to the file at `path`. Frame `i` has timestep `t0 + i * dt`
    /// and references the file `vtu_names(i)`.
    pub fn save_pvd<P, F>(
        path: P,
        vtu_names: F,
        time_steps: usize,
        t0: f64,
        dt: f64,
        skip_frame: usize,
    ) -> Result<(), Error>
    where
        P: AsRef<Path>,
        F: Fn(usize) -> String,
    {
        let path = path.as_ref();
        log::debug!("writing pvd file {}", path.display());

        // validated before the file is created
        if skip_frame == 0 {
            return Err(Error::InvalidSkipFrame);
        }

        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        Self::write_to(&mut writer, vtu_names, time_steps, t0, dt, skip_frame)?;
        writer.flush()?;

        Ok(())
    }

    /// Same as [`save_pvd`](PvdWriter::save_pvd), writing to any writer.
    pub fn write_to<W, F>(
        writer: W,
        vtu_names: F,
        time_steps: usize,
        t0: f64,
        dt: f64,
        skip_frame: usize,
    ) -> Result<(), Error>
    where
        W: Write,
        F: Fn(usize) -> String,
    {
        if skip_frame == 0 {
            return Err(Error::InvalidSkipFrame);
        }

        let mut writer = Writer::new(writer);
        write_decl(&mut writer)?;

        let mut vtk_file = BytesStart::new("VTKFile");
        vtk_file.push_attribute(("type", "Collection"));
        vtk_file.push_attribute(("version", "0.1"));
        vtk_file.push_attribute(("byte_order", "LittleEndian"));
        vtk_file.push_attribute(("compressor", "vtkZLibDataCompressor"));
        start_element(&mut writer, vtk_file)?;

        start_element(&mut writer, BytesStart::new("Collection"))?;

        for frame in (0..=time_steps).step_by(skip_frame) {
            let timestep = utils::format_general(t0 + frame as f64 * dt);
            let file = vtu_names(frame);
            log::trace!("pvd frame {frame} at t = {timestep}: {file}");

            let mut dataset = BytesStart::new("DataSet");
            dataset.push_attribute(("timestep", timestep.as_str()));
            dataset.push_attribute(("group", ""));
            dataset.push_attribute(("part", "0"));
            dataset.push_attribute(("file", file.as_str()));
            empty_element(&mut writer, dataset)?;
        }

        end_element(&mut writer, "Collection")?;
        end_element(&mut writer, "VTKFile")?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BlockEntry {
    block_name: String,
    name: String,
    file_name: String,
}

/// Writes `.vtm` multi-block collections
///
/// Every call to [`add_dataset`](VtmWriter::add_dataset) adds one `Block` holding a single
/// `DataSet`. The time value of the collection is stored as `FieldData`.
///
/// ```
/// use paraview_mesh::VtmWriter;
///
/// let mut vtm = VtmWriter::new(0.5);
/// vtm.add_dataset("volume", "data", "volume.vtu");
/// vtm.add_dataset("surface", "data", "surface.vtu");
///
/// let mut buffer = Vec::new();
/// vtm.write_to(&mut buffer).unwrap();
///
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.contains(r#"<DataSet name="data" file="surface.vtu"/>"#));
/// assert!(text.contains("0.500000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VtmWriter {
    time: f64,
    blocks: Vec<BlockEntry>,
}

impl VtmWriter {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            blocks: Vec::new(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// number of blocks added so far
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn add_dataset(&mut self, block_name: &str, name: &str, file_name: &str) {
        self.blocks.push(BlockEntry {
            block_name: block_name.to_string(),
            name: name.to_string(),
            file_name: file_name.to_string(),
        });
    }

    /// write the collection to the file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        log::debug!("writing vtm file {} ({} blocks)", path.display(), self.len());

        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;

        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut writer = Writer::new(writer);
        write_decl(&mut writer)?;

        let mut vtk_file = BytesStart::new("VTKFile");
        vtk_file.push_attribute(("type", "vtkMultiBlockDataSet"));
        vtk_file.push_attribute(("version", "1.0"));
        start_element(&mut writer, vtk_file)?;

        start_element(&mut writer, BytesStart::new("vtkMultiBlockDataSet"))?;
        for entry in &self.blocks {
            let mut block = BytesStart::new("Block");
            block.push_attribute(("name", entry.block_name.as_str()));
            start_element(&mut writer, block)?;

            let mut dataset = BytesStart::new("DataSet");
            dataset.push_attribute(("name", entry.name.as_str()));
            dataset.push_attribute(("file", entry.file_name.as_str()));
            empty_element(&mut writer, dataset)?;

            end_element(&mut writer, "Block")?;
        }
        end_element(&mut writer, "vtkMultiBlockDataSet")?;

        start_element(&mut writer, BytesStart::new("FieldData"))?;
        let mut time_value = BytesStart::new("DataArray");
        time_value.push_attribute(("type", "Float32"));
        time_value.push_attribute(("Name", "TimeValue"));
        writer.write_event(Event::Start(time_value))?;
        let time = format!("{:.6}", self.time);
        writer.write_event(Event::Text(BytesText::new(&time)))?;
        end_element(&mut writer, "DataArray")?;
        end_element(&mut writer, "FieldData")?;

        end_element(&mut writer, "VTKFile")?;

        Ok(())
    }
}

fn write_decl<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    newline(writer)
}

fn empty_element<W: Write>(writer: &mut Writer<W>, element: BytesStart) -> Result<(), Error> {
    writer.write_event(Event::Empty(element))?;
    newline(writer)
}
