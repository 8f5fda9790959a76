// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use rand::{Rng, SeedableRng};

use intri::geometry::Vector3;
use intri::matrix::laplacian::{cotan_laplacian, vertex_lumped_mass};
use intri::matrix::transfer::{
    face_index_and_length_arrays, transfer_a_to_b_pointwise, transfer_b_to_a_pointwise,
    vertex_interpolation_matrix, vertex_position_matrix,
};
use intri::{Backend, BaseSurface, IntrinsicTriangulation};

fn tetrahedron() -> BaseSurface {
    let positions = vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ];
    let faces = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    BaseSurface::from_face_list(positions, &faces).unwrap()
}

#[test]
fn test_laplacian_rows_sum_to_zero() {
    let base = tetrahedron();
    let lap = cotan_laplacian(&base.conn, &base.edge_length).unwrap();
    let ones = vec![1.0; base.n_vertices()];
    for v in lap.mul_vec(&ones).unwrap() {
        assert!(v.abs() < 1e-12);
    }
    // symmetry
    let triplets = lap.to_triplets();
    let t = lap.transpose().to_triplets();
    for (a, b) in triplets.iter().zip(t.iter()) {
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
        assert!((a.2 - b.2).abs() < 1e-12);
    }
}

#[test]
fn test_equilateral_laplacian_weights() {
    // every dihedral pair of equilateral triangles gives the edge weight
    // 2 * (1/2) * cot(60 deg) = 1/sqrt(3)
    let base = tetrahedron();
    let lap = cotan_laplacian(&base.conn, &base.edge_length).unwrap();
    let w = 1.0 / 3.0f64.sqrt();
    for (r, c, v) in lap.to_triplets() {
        if r == c {
            assert!((v - 3.0 * w).abs() < 1e-12);
        } else {
            assert!((v + w).abs() < 1e-12);
        }
    }
}

#[test]
fn test_lumped_mass_matches_area() {
    let base = tetrahedron();
    let mass = vertex_lumped_mass(&base.conn, &base.edge_length);
    assert!(mass.iter().all(|&m| m > 0.0));
    let total: f64 = mass.iter().sum();
    assert!((total - base.total_area()).abs() < 1e-10);
}

#[test]
fn test_delaunay_laplacian_has_no_negative_weights() {
    // after flipping to Delaunay every off-diagonal entry is non-positive
    let positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.5, 0.1, 0.0),
        Vector3::new(0.5, -0.1, 0.0),
    ];
    let faces = [[0, 1, 2], [1, 0, 3]];
    let base = BaseSurface::from_face_list(positions, &faces).unwrap();

    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    tri.flip_to_delaunay().unwrap();
    let lap = cotan_laplacian(&tri.conn, &tri.edge_length).unwrap();
    for (r, c, v) in lap.to_triplets() {
        if r != c {
            assert!(v <= 1e-12);
        }
    }
}

#[test]
fn test_face_arrays_are_consistent() {
    let base = tetrahedron();
    let tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let (inds, lens) = face_index_and_length_arrays(&tri);
    assert_eq!(inds.len(), tri.n_faces());
    assert_eq!(lens.len(), tri.n_faces());
    for row in &lens {
        for &l in row {
            assert!((l - 8.0f64.sqrt()).abs() < 1e-12);
        }
    }
}

#[test]
fn test_vertex_position_matrix_matches_embedding() {
    let base = tetrahedron();
    let tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let m = vertex_position_matrix(&tri);
    assert_eq!((m.n_rows, m.n_cols), (4, 3));
    for (v, p) in base.positions.iter().enumerate() {
        assert_eq!(m.row(v), &[p.x, p.y, p.z]);
    }
}

#[test]
fn test_random_insertions_preserve_area_and_locations() {
    let base = tetrahedron();
    let mut rng = rand::rngs::StdRng::seed_from_u64(17);
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let area = tri.total_area();

    let mut inserted = 0;
    while inserted < 5 {
        let faces = tri.conn.live_faces();
        let f = faces[rng.random_range(0..faces.len())];
        let mut b = [
            0.2 + 0.6 * rng.random::<f64>(),
            0.2 + 0.6 * rng.random::<f64>(),
            0.2 + 0.6 * rng.random::<f64>(),
        ];
        let s: f64 = b.iter().sum();
        for x in b.iter_mut() {
            *x /= s;
        }
        if tri.insert_vertex(f, b).is_ok() {
            inserted += 1;
        }
    }

    assert_eq!(tri.n_vertices(), base.n_vertices() + 5);
    assert!((tri.total_area() - area).abs() < 1e-9);

    // every inserted vertex reports a genuine on-surface location
    for v in base.n_vertices()..tri.n_vertices() {
        let p = base.position_of(&tri.locations[v]);
        // all surface points of the tetrahedron satisfy |x|+|y|+|z| <= 3
        assert!(p.x.abs() + p.y.abs() + p.z.abs() <= 3.0 + 1e-9);
    }

    // pointwise transfer of a linear ambient function stays in range
    let xs: Vec<f64> = base.positions.iter().map(|p| p.x).collect();
    let on_b = transfer_a_to_b_pointwise(&tri, &xs);
    assert_eq!(on_b.len(), tri.n_vertices());
    for v in &on_b {
        assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(v));
    }

    // base vertices are intrinsic vertices, so the pointwise round trip
    // restores their values exactly
    let back = transfer_b_to_a_pointwise(&tri, &on_b);
    assert_eq!(back.len(), base.n_vertices());
    for (a, b) in back.iter().zip(xs.iter()) {
        assert!((a - b).abs() < 1e-12);
    }

    // the interpolation matrix agrees with pointwise evaluation and its
    // rows are convex combinations
    let interp = vertex_interpolation_matrix(&tri).unwrap();
    let via_matrix = interp.mul_vec(&xs).unwrap();
    for (a, b) in via_matrix.iter().zip(on_b.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
    for (_, _, w) in interp.to_triplets() {
        assert!(w >= 0.0);
    }
    for row_sum in interp.mul_vec(&vec![1.0; base.n_vertices()]).unwrap() {
        assert!((row_sum - 1.0).abs() < 1e-12);
    }
}
