use crate::cells::CellArrays;
use crate::encoding::Base64Frame;
use crate::field::{Attachment, Field, FieldSet, FieldStore};
use crate::traits::{Encode, MeshWriter, Numeric, Precision};
use crate::Error;
use crate::Mesh;

use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// Writes meshes to `.vtu` (XML UnstructuredGrid) files
///
/// The encoding of every `DataArray` is chosen with the type parameter:
/// [`Ascii`](crate::Ascii) writes human readable values, [`Binary`](crate::Binary) writes
/// base64 frames (see [`encoding`](crate::encoding)).
///
/// ```
/// use paraview_mesh::prelude::*;
/// use paraview_mesh::ndarray::array;
///
/// let points = array![[0., 0.], [1., 0.], [0., 1.], [1., 1.]];
/// let mesh = Mesh::new(points, Cells::Uniform(array![[0_usize, 1, 3, 2]])).unwrap();
///
/// let mut writer = VtuWriter::<Ascii>::new();
/// writer.add_field("p", array![[1.], [2.], [3.], [4.]]).unwrap();
///
/// let mut buffer = Vec::new();
/// writer.write_mesh_to(&mut buffer, &mesh).unwrap();
///
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.contains(r#"NumberOfPoints="4" NumberOfCells="1""#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VtuWriter<Enc> {
    fields: FieldStore,
    _marker: PhantomData<Enc>,
}

impl<Enc: Encode> VtuWriter<Enc> {
    pub fn new() -> Self {
        Self {
            fields: FieldStore::default(),
            _marker: PhantomData,
        }
    }

    /// the `format` attribute used for every data array
    pub fn encoding(&self) -> Encoding {
        Encoding::of::<Enc>()
    }

    /// Write `mesh` and the staged fields to any writer, then clear the staged fields.
    pub fn write_mesh_to<W: Write>(&mut self, writer: W, mesh: &Mesh) -> Result<(), Error> {
        let fields = self.fields.take();
        write_vtu(writer, mesh, &fields, self.encoding())
    }
}

impl<Enc: Encode> MeshWriter for VtuWriter<Enc> {
    fn field_store(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    fn write_mesh<P: AsRef<Path>>(&mut self, path: P, mesh: &Mesh) -> Result<(), Error> {
        // fields belong to this write even if the file cannot be created
        let fields = self.fields.take();

        let path = path.as_ref();
        log::debug!("writing vtu file {}", path.display());

        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        write_vtu(&mut writer, mesh, &fields, self.encoding())?;
        writer.flush()?;

        Ok(())
    }
}

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Base64,
}

impl Encoding {
    fn of<Enc: Encode>() -> Self {
        if Enc::is_binary() {
            Self::Base64
        } else {
            Self::Ascii
        }
    }

    pub fn to_str(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// Write a complete unstructured grid document to a `Writer`
fn write_vtu<W: Write>(
    writer: W,
    mesh: &Mesh,
    fields: &FieldStore,
    encoding: Encoding,
) -> Result<(), Error> {
    fields.check_lengths(mesh.n_points(), mesh.n_cells())?;
    let cell_arrays = mesh.cell_arrays()?;

    log::debug!(
        "vtu: {} points, {} cells, {} connectivity ids, {} encoding",
        mesh.n_points(),
        cell_arrays.n_cells(),
        cell_arrays.n_connectivity_ids(),
        encoding.to_str()
    );

    let mut writer = Writer::new(writer);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    newline(&mut writer)?;

    let mut vtk_file = BytesStart::new("VTKFile");
    vtk_file.push_attribute(("type", "UnstructuredGrid"));
    vtk_file.push_attribute(("version", "1.0"));
    vtk_file.push_attribute(("byte_order", "LittleEndian"));
    vtk_file.push_attribute(("header_type", "UInt64"));
    start_element(&mut writer, vtk_file)?;

    start_element(&mut writer, BytesStart::new("UnstructuredGrid"))?;

    let n_points = mesh.n_points().to_string();
    let n_cells = cell_arrays.n_cells().to_string();
    let mut piece = BytesStart::new("Piece");
    piece.push_attribute(("NumberOfPoints", n_points.as_str()));
    piece.push_attribute(("NumberOfCells", n_cells.as_str()));
    start_element(&mut writer, piece)?;

    write_points(&mut writer, mesh, encoding)?;
    write_field_set(
        &mut writer,
        Attachment::Point,
        fields.fields(Attachment::Point),
        encoding,
    )?;
    write_field_set(
        &mut writer,
        Attachment::Cell,
        fields.fields(Attachment::Cell),
        encoding,
    )?;
    write_cells(&mut writer, &cell_arrays, encoding)?;

    end_element(&mut writer, "Piece")?;
    end_element(&mut writer, "UnstructuredGrid")?;
    end_element(&mut writer, "VTKFile")?;

    Ok(())
}

fn write_points<W: Write>(
    writer: &mut Writer<W>,
    mesh: &Mesh,
    encoding: Encoding,
) -> Result<(), Error> {
    start_element(writer, BytesStart::new("Points"))?;

    let points = mesh.padded_points();

    match encoding {
        Encoding::Ascii => {
            write_inline_array_header(writer, encoding, None, 3, Precision::Float32)?;
            let mut text = String::new();
            for row in points.rows() {
                push_ascii_row(&mut text, row.iter().map(|x| *x as f32));
            }
            write_ascii_body(writer, &text)?;
        }
        Encoding::Base64 => {
            write_inline_array_header(writer, encoding, None, 3, Precision::Float64)?;
            write_base64_body(writer, points.iter().copied())?;
        }
    }

    close_inline_array_header(writer)?;
    end_element(writer, "Points")?;

    Ok(())
}

/// write the `<PointData>` or `<CellData>` section, skipped when there are no fields
fn write_field_set<W: Write>(
    writer: &mut Writer<W>,
    attachment: Attachment,
    fields: &FieldSet,
    encoding: Encoding,
) -> Result<(), Error> {
    if fields.is_empty() {
        return Ok(());
    }

    let section = attachment.to_string();
    let mut element = BytesStart::new(section.as_str());
    if let Some(scalars) = fields.active_scalars() {
        element.push_attribute(("Scalars", scalars));
    }
    if let Some(vectors) = fields.active_vectors() {
        element.push_attribute(("Vectors", vectors));
    }
    start_element(writer, element)?;

    for field in fields {
        write_field(writer, field, encoding)?;
    }

    end_element(writer, &section)?;

    Ok(())
}

fn write_field<W: Write>(
    writer: &mut Writer<W>,
    field: &Field,
    encoding: Encoding,
) -> Result<(), Error> {
    log::trace!("writing field `{}` ({} components)", field.name(), field.components());

    write_inline_array_header(
        writer,
        encoding,
        Some(field.name()),
        field.components(),
        Precision::Float64,
    )?;

    match encoding {
        Encoding::Ascii => {
            let mut text = String::new();
            for row in field.data().rows() {
                push_ascii_row(&mut text, row.iter().copied());
            }
            write_ascii_body(writer, &text)?;
        }
        Encoding::Base64 => write_base64_body(writer, field.values())?,
    }

    close_inline_array_header(writer)
}

fn write_cells<W: Write>(
    writer: &mut Writer<W>,
    arrays: &CellArrays,
    encoding: Encoding,
) -> Result<(), Error> {
    start_element(writer, BytesStart::new("Cells"))?;

    write_inline_array_header(writer, encoding, Some("connectivity"), 1, Precision::Int64)?;
    match encoding {
        Encoding::Ascii => {
            // one cell per line
            let mut text = String::new();
            for bounds in arrays.offsets.windows(2) {
                let cell = &arrays.connectivity[bounds[0] as usize..bounds[1] as usize];
                push_ascii_row(&mut text, cell.iter().copied());
            }
            write_ascii_body(writer, &text)?;
        }
        Encoding::Base64 => write_base64_body(writer, arrays.connectivity.iter().copied())?,
    }
    close_inline_array_header(writer)?;

    write_inline_array_header(writer, encoding, Some("types"), 1, Precision::UInt8)?;
    write_column(writer, &arrays.types, encoding)?;
    close_inline_array_header(writer)?;

    // the xml format stores the end offset of every cell
    write_inline_array_header(writer, encoding, Some("offsets"), 1, Precision::Int64)?;
    write_column(writer, arrays.end_offsets(), encoding)?;
    close_inline_array_header(writer)?;

    end_element(writer, "Cells")?;

    Ok(())
}

/// write a one component array, one value per line in ascii
fn write_column<W: Write, T: Numeric>(
    writer: &mut Writer<W>,
    values: &[T],
    encoding: Encoding,
) -> Result<(), Error> {
    match encoding {
        Encoding::Ascii => {
            let mut text = String::new();
            for value in values {
                push_ascii_row(&mut text, std::iter::once(*value));
            }
            write_ascii_body(writer, &text)
        }
        Encoding::Base64 => {
            let inner = writer.inner();
            let mut frame = Base64Frame::open_for::<T>(inner, values.len())?;
            frame.push_slice(values)?;
            frame.close()
        }
    }
}

/// append a line of space separated values to `text`
fn push_ascii_row<T: Numeric, I: IntoIterator<Item = T>>(text: &mut String, row: I) {
    for (idx, value) in row.into_iter().enumerate() {
        if idx > 0 {
            text.push(' ');
        }
        value.push_ascii(text);
    }
    text.push('\n');
}

fn write_ascii_body<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), Error> {
    writer.write_event(Event::Text(BytesText::new(text)))?;
    Ok(())
}

/// stream `values` as a single base64 frame
fn write_base64_body<W, T, I>(writer: &mut Writer<W>, values: I) -> Result<(), Error>
where
    W: Write,
    T: Numeric,
    I: ExactSizeIterator<Item = T>,
{
    let inner = writer.inner();
    let mut frame = Base64Frame::open_for::<T>(inner, values.len())?;
    for value in values {
        frame.push(value)?;
    }
    frame.close()
}

/// open a `DataArray` element whose data is written inline
fn write_inline_array_header<W: Write>(
    writer: &mut Writer<W>,
    format: Encoding,
    name: Option<&str>,
    components: usize,
    precision: Precision,
) -> Result<(), Error> {
    let precision = precision.to_string();
    let components = components.to_string();

    let mut element = BytesStart::new("DataArray");
    element.push_attribute(("type", precision.as_str()));
    if let Some(name) = name {
        element.push_attribute(("Name", name));
    }
    element.push_attribute(("NumberOfComponents", components.as_str()));
    element.push_attribute(("format", format.to_str()));

    start_element(writer, element)
}

fn close_inline_array_header<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    end_element(writer, "DataArray")
}

pub(crate) fn start_element<W: Write>(
    writer: &mut Writer<W>,
    element: BytesStart,
) -> Result<(), Error> {
    writer.write_event(Event::Start(element))?;
    newline(writer)
}

pub(crate) fn end_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), Error> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    newline(writer)
}

pub(crate) fn newline<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    writer.inner().write_all(b"\n")?;
    Ok(())
}
