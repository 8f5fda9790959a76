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

use std::fs;

use intri::geometry::Vector3;
use intri::io::matrix_io::{
    write_dense_matrix, write_dense_rows, write_positions, write_sparse_matrix,
};
use intri::io::obj::{read_obj, write_obj, write_subdivision_obj};
use intri::matrix::transfer::vertex_position_matrix;
use intri::matrix::SparseMatrix;
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
fn test_obj_round_trip() {
    let base = tetrahedron();
    let path = std::env::temp_dir().join("intri_test_tetra.obj");
    write_obj(&base, &path).unwrap();
    let back = read_obj(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(back.n_vertices(), base.n_vertices());
    assert_eq!(back.n_faces(), base.n_faces());
    for (p, q) in back.positions.iter().zip(base.positions.iter()) {
        assert!((p.x - q.x).abs() < 1e-12);
        assert!((p.y - q.y).abs() < 1e-12);
        assert!((p.z - q.z).abs() < 1e-12);
    }
}

#[test]
fn test_read_obj_triangulates_polygons_and_slashes() {
    let path = std::env::temp_dir().join("intri_test_quad.obj");
    fs::write(
        &path,
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n# a quad with normals\nf 1//1 2//2 3//3 4//4\n",
    )
    .unwrap();
    let base = read_obj(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(base.n_vertices(), 4);
    assert_eq!(base.n_faces(), 2);
    assert!((base.total_area() - 1.0).abs() < 1e-12);
}

#[test]
fn test_subdivision_obj_counts() {
    let base = tetrahedron();
    let tri = IntrinsicTriangulation::new(&base, Backend::IntegerCoordinate);
    let cs = tri.common_subdivision().unwrap();

    let path = std::env::temp_dir().join("intri_test_subdivision.obj");
    write_subdivision_obj(&cs, &base, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();

    let vs = text.lines().filter(|l| l.starts_with("v ")).count();
    let fs_ = text.lines().filter(|l| l.starts_with("f ")).count();
    assert_eq!(vs, cs.n_points());
    assert_eq!(fs_, cs.n_faces());
}

#[test]
fn test_position_dumps_have_headers() {
    let base = tetrahedron();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    tri.insert_vertex(0, [0.25, 0.25, 0.5]).unwrap();

    let m = vertex_position_matrix(&tri);
    assert_eq!((m.n_rows, m.n_cols), (5, 3));
    let path = std::env::temp_dir().join("intri_test_vpos.dmat");
    write_dense_matrix(&m, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(text.lines().next(), Some("5 3"));
    assert_eq!(text.lines().count(), 6);

    let cs = tri.common_subdivision().unwrap();
    let pts = cs.sample_vertex_positions(&base);
    let path = std::env::temp_dir().join("intri_test_pts.dmat");
    write_positions(&pts, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();
    let header = format!("{} 3", pts.len());
    assert_eq!(text.lines().next(), Some(header.as_str()));
}

#[test]
fn test_matrix_dumps_have_headers() {
    let dense_path = std::env::temp_dir().join("intri_test_rows.dmat");
    write_dense_rows(&[[1.0, 2.0], [3.0, 4.0]], &dense_path).unwrap();
    let text = fs::read_to_string(&dense_path).unwrap();
    fs::remove_file(&dense_path).ok();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("2 2"));
    assert_eq!(lines.next(), Some("1 2"));

    let m = SparseMatrix::from_triplets(2, 3, &[(0, 1, 0.5), (1, 2, -2.0)]).unwrap();
    let sparse_path = std::env::temp_dir().join("intri_test_m.spmat");
    write_sparse_matrix(&m, &sparse_path).unwrap();
    let text = fs::read_to_string(&sparse_path).unwrap();
    fs::remove_file(&sparse_path).ok();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("2 3 2"));
    assert_eq!(lines.next(), Some("0 1 0.5"));
    assert_eq!(lines.next(), Some("1 2 -2"));
}
