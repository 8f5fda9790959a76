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

use std::f64::consts::PI;

use intri::geometry::Vector3;
use intri::{Backend, BaseSurface, IntrinsicTriangulation, RefineOptions};

/// Flat strip of very thin triangles. The straight sides make their
/// non-corner boundary vertices metrically flat (angle sum pi), so the
/// sliver angles there are genuine quality defects.
fn thin_strip() -> BaseSurface {
    let mut positions = Vec::new();
    for i in 0..4 {
        positions.push(Vector3::new(i as f64, 0.0, 0.0));
    }
    for i in 0..4 {
        positions.push(Vector3::new(i as f64, 0.15, 0.0));
    }
    let mut faces = Vec::new();
    for i in 0..3 {
        faces.push([i, i + 1, i + 4]);
        faces.push([i + 1, i + 5, i + 4]);
    }
    BaseSurface::from_face_list(positions, &faces).unwrap()
}

/// Closed double cover of the unit square: one sheet carries an interior
/// vertex squeezed toward an edge, the other a centered one. Interior
/// vertices of both sheets are flat; the four square corners are cones.
fn pillow() -> BaseSurface {
    let positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.5, 0.07, 0.0),
        Vector3::new(0.5, 0.5, 0.0),
    ];
    let faces = [
        [0, 1, 4],
        [1, 2, 4],
        [2, 3, 4],
        [3, 0, 4],
        [1, 0, 5],
        [2, 1, 5],
        [3, 2, 5],
        [0, 3, 5],
    ];
    BaseSurface::from_face_list(positions, &faces).unwrap()
}

/// One needle triangle with a 170 degree apex. The two 5 degree corners sit
/// at cones too sharp to ever meet the default bound; the obtuse apex can
/// be improved by splitting.
fn needle() -> BaseSurface {
    let apex = 170.0f64.to_radians();
    let positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(apex.cos(), apex.sin(), 0.0),
    ];
    BaseSurface::from_face_list(positions, &[[0, 1, 2]]).unwrap()
}

fn assert_quality(tri: &IntrinsicTriangulation, min_angle_degrees: f64) {
    let threshold = min_angle_degrees.to_radians();
    for f in tri.conn.live_faces() {
        for h in tri.conn.face_half_edges(f) {
            if tri.vertex_is_flat(tri.conn.tail(h)) {
                assert!(
                    tri.corner_angle(h) >= threshold - 1e-12,
                    "corner angle {} below target at a flat vertex",
                    tri.corner_angle(h)
                );
            }
        }
    }
}

#[test]
fn test_flat_vertex_classification() {
    let base = thin_strip();
    let tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    // straight-side boundary vertices are flat, corners are not
    assert!(tri.vertex_is_flat(1));
    assert!(tri.vertex_is_flat(2));
    assert!(tri.vertex_is_flat(5));
    assert!(!tri.vertex_is_flat(0));
    assert!(!tri.vertex_is_flat(3));
}

#[test]
fn test_refine_thin_strip_reaches_target() {
    let base = thin_strip();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let report = tri.delaunay_refine(&RefineOptions::default()).unwrap();

    assert!(report.insertions > 0);
    assert!(!report.hit_insertion_cap);
    assert!(!report.hit_safety_limit);
    assert!(tri.is_delaunay());
    assert_quality(&tri, 25.0);
    assert!(tri.min_angle_degrees_at_flat_vertices() >= 25.0 - 1e-9);
    assert!(tri.min_angle_degrees() <= tri.min_angle_degrees_at_flat_vertices());
    assert!((tri.total_area() - base.total_area()).abs() < 1e-9);

    // inserted vertices carry real surface locations
    for v in base.n_vertices()..tri.n_vertices() {
        let p = base.position_of(&tri.locations[v]);
        assert!((-1e-9..=3.0 + 1e-9).contains(&p.x));
        assert!((-1e-9..=0.15 + 1e-9).contains(&p.y));
    }
}

#[test]
fn test_refine_respects_insertion_cap() {
    let base = thin_strip();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let opts = RefineOptions { max_insertions: Some(2), ..Default::default() };
    let report = tri.delaunay_refine(&opts).unwrap();
    assert!(report.insertions <= 2);
    assert!(report.hit_insertion_cap);
}

#[test]
fn test_refine_closed_pillow() {
    let base = pillow();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    assert!(tri.vertex_is_flat(4));
    assert!(tri.vertex_is_flat(5));
    for corner in 0..4 {
        assert!(!tri.vertex_is_flat(corner));
    }

    let report = tri.delaunay_refine(&RefineOptions::default()).unwrap();
    assert!(!report.hit_insertion_cap);
    assert!(!report.hit_safety_limit);
    assert!(tri.is_delaunay());
    assert_quality(&tri, 25.0);
    assert!((tri.total_area() - 2.0).abs() < 1e-9);
}

#[test]
fn test_refine_needle_splits_obtuse_apex() {
    let base = needle();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let report = tri.delaunay_refine(&RefineOptions::default()).unwrap();

    assert!(report.insertions >= 1);
    assert!(!report.hit_safety_limit);
    assert!(tri.is_delaunay());
    assert!((tri.total_area() - base.total_area()).abs() < 1e-9);

    // corners at vertices whose cone can host the bound all meet it, and
    // none is obtuse enough to force a sliver elsewhere; the 5 degree
    // cones keep their irreducible corners
    let threshold = 25.0f64.to_radians();
    let mut saw_irreducible = false;
    for f in tri.conn.live_faces() {
        for h in tri.conn.face_half_edges(f) {
            let v = tri.conn.tail(h);
            let supportable =
                v >= base.n_vertices() || base.vertex_angle_sum[v] >= threshold;
            if supportable {
                assert!(tri.corner_angle(h) >= threshold - 1e-9);
                assert!(tri.corner_angle(h) <= PI - 2.0 * threshold + 1e-9);
            } else {
                saw_irreducible = true;
            }
        }
    }
    assert!(saw_irreducible);
}

#[test]
fn test_circumradius_bound_inserts() {
    let base = pillow();
    let mut tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    let opts = RefineOptions {
        min_angle_degrees: 0.0,
        max_circumradius: 0.3,
        ..Default::default()
    };
    let report = tri.delaunay_refine(&opts).unwrap();
    assert!(report.insertions > 0);
    for f in tri.conn.live_faces() {
        let [a, b, c] = tri.face_lengths(f);
        let r = intri::geometry::triangle::circumradius_from_lengths(a, b, c);
        assert!(r <= 0.3 + 1e-12);
    }
}