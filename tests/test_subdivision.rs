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

use intri::geometry::Vector3;
use intri::matrix::AttributeTransfer;
use intri::{Backend, BaseSurface, IntrinsicTriangulation};

fn thin_quad() -> BaseSurface {
    let positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.5, 0.1, 0.0),
        Vector3::new(0.5, -0.1, 0.0),
    ];
    let faces = [[0, 1, 2], [1, 0, 3]];
    BaseSurface::from_face_list(positions, &faces).unwrap()
}

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

fn icosahedron() -> BaseSurface {
    let p = (1.0 + 5.0f64.sqrt()) / 2.0;
    let positions = vec![
        Vector3::new(-1.0, p, 0.0),
        Vector3::new(1.0, p, 0.0),
        Vector3::new(-1.0, -p, 0.0),
        Vector3::new(1.0, -p, 0.0),
        Vector3::new(0.0, -1.0, p),
        Vector3::new(0.0, 1.0, p),
        Vector3::new(0.0, -1.0, -p),
        Vector3::new(0.0, 1.0, -p),
        Vector3::new(p, 0.0, -1.0),
        Vector3::new(p, 0.0, 1.0),
        Vector3::new(-p, 0.0, -1.0),
        Vector3::new(-p, 0.0, 1.0),
    ];
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    BaseSurface::from_face_list(positions, &faces).unwrap()
}

#[test]
fn test_identity_subdivision() {
    let base = tetrahedron();
    let tri = IntrinsicTriangulation::new(&base, Backend::IntegerCoordinate);
    let cs = tri.common_subdivision().unwrap();

    assert_eq!(cs.n_points(), 4);
    assert_eq!(cs.n_faces(), 4);
    assert!((cs.total_area() - base.total_area()).abs() < 1e-9);
    for (i, &f) in cs.base_face.iter().enumerate() {
        // identity: each polygon is one whole face of both triangulations
        assert_eq!(cs.faces[i].len(), 3);
        assert_eq!(f, cs.intrinsic_face[i]);
    }
}

#[test]
fn test_subdivision_after_flip() {
    let base = thin_quad();
    for backend in [Backend::Signpost, Backend::IntegerCoordinate] {
        let mut tri = IntrinsicTriangulation::new(&base, backend);
        tri.flip_to_delaunay().unwrap();
        let cs = tri.common_subdivision().unwrap();

        // 4 vertices plus the single crossing on the old diagonal
        assert_eq!(cs.n_points(), 5);
        // each of the two base faces splits into two triangles
        assert_eq!(cs.n_faces(), 4);
        assert!((cs.total_area() - base.total_area()).abs() < 1e-10);
        for &a in &cs.areas {
            assert!(a > 0.0);
        }
        for f in 0..2 {
            assert_eq!(cs.base_face.iter().filter(|&&x| x == f).count(), 2);
        }
        for f in tri.conn.live_faces() {
            assert_eq!(cs.intrinsic_face.iter().filter(|&&x| x == f).count(), 2);
        }
    }
}

#[test]
fn test_icosahedron_already_delaunay_identity_overlay() {
    let base = icosahedron();
    for backend in [Backend::Signpost, Backend::IntegerCoordinate] {
        let mut tri = IntrinsicTriangulation::new(&base, backend);
        assert!(tri.is_delaunay());
        assert_eq!(tri.flip_to_delaunay().unwrap(), 0);

        let cs = tri.common_subdivision().unwrap();
        assert_eq!(cs.n_points(), 12);
        assert_eq!(cs.n_faces(), 20);
        assert!((cs.total_area() - base.total_area()).abs() < 1e-9);
        for (i, &f) in cs.base_face.iter().enumerate() {
            assert_eq!(f, cs.intrinsic_face[i]);
        }
    }
}

#[test]
fn test_linear_function_interpolates_exactly() {
    let base = thin_quad();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    tri.flip_to_delaunay().unwrap();
    let cs = tri.common_subdivision().unwrap();

    // the patch is planar, so x is linear over every face
    let xs: Vec<f64> = base.positions.iter().map(|p| p.x).collect();
    let at_points = cs.interpolate_across_a(&base, &xs);
    let sampled = cs.sample_vertex_positions(&base);
    for (v, p) in at_points.iter().zip(sampled.iter()) {
        assert!((v - p.x).abs() < 1e-9);
    }

    // intrinsic vertices coincide with base vertices here, so the same
    // values interpolated across the intrinsic side agree
    let across_b = cs.interpolate_across_b(&tri, &xs);
    for (v, p) in across_b.iter().zip(sampled.iter()) {
        assert!((v - p.x).abs() < 1e-9);
    }
}

#[test]
fn test_face_copies_partition_each_face() {
    let base = thin_quad();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::IntegerCoordinate);
    tri.flip_to_delaunay().unwrap();
    let cs = tri.common_subdivision().unwrap();

    // indicator of base face 0 spread to polygons tiles exactly that face
    let ind = cs.copy_from_a(&[1.0, 0.0]);
    let covered: f64 = ind.iter().zip(cs.areas.iter()).map(|(i, a)| i * a).sum();
    assert!((covered - 0.05).abs() < 1e-10);

    // intrinsic-face indicators tile the flipped faces the same way
    for f in tri.conn.live_faces() {
        let mut vals = vec![0.0; tri.conn.faces.len()];
        vals[f] = 1.0;
        let ind = cs.copy_from_b(&vals);
        let covered: f64 = ind.iter().zip(cs.areas.iter()).map(|(i, a)| i * a).sum();
        let [a, b, c] = tri.face_lengths(f);
        let face_area = intri::geometry::triangle::area_from_lengths(a, b, c);
        assert!((covered - face_area).abs() < 1e-10);
    }
}

#[test]
fn test_transfer_matrices_partition_unity() {
    let base = thin_quad();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::IntegerCoordinate);
    tri.flip_to_delaunay().unwrap();
    let cs = tri.common_subdivision().unwrap();
    let at = AttributeTransfer::new(&cs, &tri).unwrap();

    let ones_a = vec![1.0; base.n_vertices()];
    let ones_b = vec![1.0; tri.n_vertices()];
    for v in at.p_a.mul_vec(&ones_a).unwrap() {
        assert!((v - 1.0).abs() < 1e-12);
    }
    for v in at.p_b.mul_vec(&ones_b).unwrap() {
        assert!((v - 1.0).abs() < 1e-12);
    }

    // lumped mass accounts for the whole surface
    let total: f64 = at.mass.values.iter().sum();
    assert!((total - base.total_area()).abs() < 1e-10);

    // constants are fixed points of the Galerkin transfer in both directions
    let (lhs, rhs) = at.a_to_b_matrices().unwrap();
    let l1 = lhs.mul_vec(&ones_b).unwrap();
    let r1 = rhs.mul_vec(&ones_a).unwrap();
    for (a, b) in l1.iter().zip(r1.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
    let (lhs, rhs) = at.b_to_a_matrices().unwrap();
    let l1 = lhs.mul_vec(&ones_a).unwrap();
    let r1 = rhs.mul_vec(&ones_b).unwrap();
    for (a, b) in l1.iter().zip(r1.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_backends_build_the_same_overlay() {
    let base = thin_quad();
    let mut sp = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let mut ic = IntrinsicTriangulation::new(&base, Backend::IntegerCoordinate);
    sp.flip_to_delaunay().unwrap();
    ic.flip_to_delaunay().unwrap();

    let cs_sp = sp.common_subdivision().unwrap();
    let cs_ic = ic.common_subdivision().unwrap();
    assert_eq!(cs_sp.n_points(), cs_ic.n_points());
    assert_eq!(cs_sp.n_faces(), cs_ic.n_faces());
    assert!((cs_sp.total_area() - cs_ic.total_area()).abs() < 1e-10);
}

#[test]
fn test_subdivision_points_agree_on_both_surfaces() {
    let base = thin_quad();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    tri.flip_to_delaunay().unwrap();
    let cs = tri.common_subdivision().unwrap();

    // a point's base location and its intrinsic location describe the same
    // spot: intrinsic vertex locations are the bridge
    for p in &cs.points {
        if let intri::mesh::SurfacePoint::Vertex(v) = p.on_intrinsic {
            assert_eq!(tri.locations[v], p.on_base);
        }
    }
}
