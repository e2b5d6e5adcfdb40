use paraview_mesh::ndarray::array;
use paraview_mesh::prelude::*;

#[test]
fn time_series_of_written_meshes() {
    let dir = std::env::temp_dir().join("paraview_mesh_series");
    std::fs::create_dir_all(&dir).unwrap();

    let points = array![[0., 0.], [1., 0.], [0., 1.]];
    let mesh = Mesh::new(points, Cells::Uniform(array![[0_usize, 1, 2]])).unwrap();
    let name = |i: usize| format!("step_{i}.vtu");

    let mut writer = VtuWriter::<Binary>::new();
    for step in 0..=4 {
        writer
            .add_field("t", array![[step as f64], [step as f64], [step as f64]])
            .unwrap();
        writer.write_mesh(dir.join(name(step)), &mesh).unwrap();
    }

    let pvd = dir.join("series.pvd");
    PvdWriter::save_pvd(&pvd, name, 4, 0.0, 0.1, 2).unwrap();

    let text = std::fs::read_to_string(&pvd).unwrap();
    assert_eq!(text.matches("<DataSet ").count(), 3);
    assert!(text.contains(r#"timestep="0.2" group="" part="0" file="step_2.vtu""#));
    assert!(text.contains(r#"file="step_4.vtu""#));
    assert!(!text.contains("step_1.vtu"));

    for frame in [0, 2, 4] {
        assert!(dir.join(name(frame)).exists());
    }
}

#[test]
fn multi_block_file() {
    let path = std::env::temp_dir().join("paraview_mesh_blocks.vtm");

    let mut vtm = VtmWriter::new(1.25);
    vtm.add_dataset("fluid", "mesh", "fluid.vtu");
    vtm.add_dataset("solid", "mesh", "solid.hdf");
    vtm.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"<Block name="fluid">"#));
    assert!(text.contains(r#"<DataSet name="mesh" file="solid.hdf"/>"#));
    assert!(text.contains(">1.250000</DataArray>"));
}
