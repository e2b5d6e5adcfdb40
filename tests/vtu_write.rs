use paraview_mesh::ndarray::{array, Array2};
use paraview_mesh::prelude::*;

fn quad_mesh() -> Mesh {
    let points = array![[0., 0.], [1., 0.], [0., 1.], [1., 1.]];
    Mesh::new(points, Cells::Uniform(array![[0_usize, 1, 3, 2]])).unwrap()
}

fn write_ascii(writer: &mut VtuWriter<Ascii>, mesh: &Mesh) -> String {
    let mut buffer = Vec::new();
    writer.write_mesh_to(&mut buffer, mesh).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// the text content of the first `DataArray` whose start tag closes after `marker`
fn array_body<'a>(text: &'a str, marker: &str) -> &'a str {
    let start = text.find(marker).unwrap() + marker.len();
    let rest = &text[start..];
    let open = rest.find('>').unwrap() + 1;
    let close = rest.find("</DataArray>").unwrap();
    rest[open..close].trim()
}

fn decode_frame(body: &str) -> (u64, Vec<u8>) {
    let bytes = base64::decode(body).unwrap();
    let mut header = [0_u8; 8];
    header.copy_from_slice(&bytes[..8]);
    (u64::from_le_bytes(header), bytes[8..].to_vec())
}

#[test]
fn ascii_quad_with_point_scalar() {
    let mut writer = VtuWriter::<Ascii>::new();
    writer.add_field("p", array![[1.], [2.], [3.], [4.]]).unwrap();

    let text = write_ascii(&mut writer, &quad_mesh());

    assert!(text.contains(r#"NumberOfPoints="4" NumberOfCells="1""#));
    assert!(text.contains(r#"<PointData Scalars="p">"#));
    assert!(text.contains(
        r#"<DataArray type="Float64" Name="p" NumberOfComponents="1" format="ascii">"#
    ));
    assert_eq!(array_body(&text, r#"Name="connectivity""#), "0 1 3 2");
    assert_eq!(array_body(&text, r#"Name="types""#), "9");
    assert_eq!(array_body(&text, r#"Name="offsets""#), "4");
    assert!(!text.contains("<CellData"));
}

#[test]
fn fields_do_not_carry_over() {
    let mut writer = VtuWriter::<Ascii>::new();
    writer.add_field("p", array![[1.], [2.], [3.], [4.]]).unwrap();

    let first = write_ascii(&mut writer, &quad_mesh());
    let second = write_ascii(&mut writer, &quad_mesh());

    assert!(first.contains(r#"Name="p""#));
    assert!(!second.contains(r#"Name="p""#));
    assert!(!second.contains("<PointData"));
}

#[test]
fn planar_points_have_zero_z() {
    let points = array![[0.5, 1.5], [2.5, 3.5], [4.5, 5.5]];
    let mesh = Mesh::new(points, Cells::Uniform(array![[0_usize, 1, 2]])).unwrap();

    let mut writer = VtuWriter::<Binary>::new();
    let mut buffer = Vec::new();
    writer.write_mesh_to(&mut buffer, &mesh).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let body = array_body(&text, "<Points>");
    let (declared, payload) = decode_frame(body);
    assert_eq!(declared, 9 * 8);
    assert_eq!(payload.len(), 9 * 8);

    let values: Vec<f64> = payload
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0_u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect();

    assert_eq!(values, vec![0.5, 1.5, 0.0, 2.5, 3.5, 0.0, 4.5, 5.5, 0.0]);
}

#[test]
fn binary_vectors_are_padded() {
    let mut writer = VtuWriter::<Binary>::new();
    writer
        .add_field("u", array![[1., 2.], [3., 4.], [5., 6.], [7., 8.]])
        .unwrap();

    let mut buffer = Vec::new();
    writer.write_mesh_to(&mut buffer, &quad_mesh()).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains(r#"<PointData Vectors="u">"#));
    assert!(text.contains(
        r#"<DataArray type="Float64" Name="u" NumberOfComponents="3" format="binary">"#
    ));

    let (declared, _) = decode_frame(array_body(&text, r#"Name="u""#));
    assert_eq!(declared, 4 * 3 * 8);
}

#[test]
fn identical_inputs_give_identical_files() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = std::env::temp_dir();
    let first = dir.join("paraview_mesh_idempotent_a.vtu");
    let second = dir.join("paraview_mesh_idempotent_b.vtu");

    let mut writer = VtuWriter::<Binary>::new();
    for path in [&first, &second] {
        writer.add_field("p", array![[1.], [2.], [3.], [4.]]).unwrap();
        writer.add_cell_field("c", array![[0.5]]).unwrap();
        writer.write_mesh(path, &quad_mesh()).unwrap();
    }

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn mixed_wedge_and_pyramid() {
    let points = Array2::<f64>::zeros((7, 3));
    let cells = Cells::Typed(vec![
        CellElement::new(CellKind::Wedge, vec![0, 1, 2, 3, 4, 5]),
        CellElement::new(CellKind::Pyramid, vec![0, 1, 4, 3, 6]),
    ]);
    let mesh = Mesh::new(points, cells).unwrap();

    let mut writer = VtuWriter::<Ascii>::new();
    writer.add_cell_field("volume", array![[1.], [2.]]).unwrap();
    let text = write_ascii(&mut writer, &mesh);

    assert_eq!(array_body(&text, r#"Name="types""#), "13\n14");
    assert_eq!(array_body(&text, r#"Name="offsets""#), "6\n11");
    assert_eq!(
        array_body(&text, r#"Name="connectivity""#),
        "0 1 2 3 4 5\n0 1 4 3 6"
    );
    assert!(text.contains(r#"<CellData Scalars="volume">"#));
}

#[test]
fn unwritable_path_still_clears_fields() {
    let mut writer = VtuWriter::<Ascii>::new();
    writer.add_field("p", array![[1.], [2.], [3.], [4.]]).unwrap();

    let path = std::env::temp_dir()
        .join("paraview_mesh_missing_dir")
        .join("nested")
        .join("mesh.vtu");
    let result = writer.write_mesh(&path, &quad_mesh());

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(writer.field_store().is_empty());
}
