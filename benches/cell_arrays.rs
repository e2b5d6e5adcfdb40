use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use paraview_mesh::{CellArrays, Cells};

fn uniform_cells(n_cells: usize) -> Cells {
    Cells::Uniform(Array2::random((n_cells, 8), Uniform::new(0, n_cells)))
}

/// alternating cells of 4 and 8 vertices, shaped by their vertex count
fn irregular_cells(n_cells: usize) -> Cells {
    let cells = (0..n_cells)
        .map(|i| {
            let n = if i % 2 == 0 { 4 } else { 8 };
            (i..i + n).collect()
        })
        .collect();

    Cells::Irregular {
        cells,
        is_simplex: false,
        is_poly: false,
    }
}

fn cell_arrays_bench(c: &mut Criterion) {
    let uniform = uniform_cells(200_000);
    let irregular = irregular_cells(200_000);

    c.bench_function("cell arrays uniform 200k", |b| {
        b.iter(|| CellArrays::build(black_box(&uniform), true).unwrap())
    });

    c.bench_function("cell arrays irregular 200k", |b| {
        b.iter(|| CellArrays::build(black_box(&irregular), true).unwrap())
    });
}

criterion_group!(benches, cell_arrays_bench);
criterion_main!(benches);
