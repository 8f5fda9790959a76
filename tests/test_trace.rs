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
use intri::mesh::SurfacePoint;
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

fn interior_edge(tri: &IntrinsicTriangulation) -> usize {
    tri.conn
        .canonical_edges()
        .into_iter()
        .find(|&h| !tri.conn.is_boundary_edge(h))
        .unwrap()
}

#[test]
fn test_unflipped_edge_traces_without_crossings() {
    let base = thin_quad();
    for backend in [Backend::Signpost, Backend::IntegerCoordinate] {
        let tri = IntrinsicTriangulation::new(&base, backend);
        for h in tri.conn.canonical_edges() {
            if tri.conn.half_edges[h].face.is_none() {
                continue;
            }
            let tr = tri.trace_edge(h).unwrap();
            assert!(tr.crossings.is_empty());
            assert_eq!(tr.end, SurfacePoint::Vertex(tri.conn.head(h)));
            assert!((tr.length - tri.edge_length[h]).abs() < 1e-9);
            assert!(!tr.stopped_at_boundary);
        }
    }
}

#[test]
fn test_flipped_edge_crosses_base_diagonal() {
    let base = thin_quad();
    for backend in [Backend::Signpost, Backend::IntegerCoordinate] {
        let mut tri = IntrinsicTriangulation::new(&base, backend);
        tri.flip_to_delaunay().unwrap();

        let h = interior_edge(&tri);
        let start = tri.conn.tail(h);
        let tr = tri.trace_edge(h).unwrap();

        assert_eq!(tr.crossings.len(), 1);
        let c = &tr.crossings[0];
        let ends = [base.conn.tail(c.halfedge), base.conn.head(c.halfedge)];
        assert!(ends.contains(&0) && ends.contains(&1));
        // the apexes sit symmetrically over the crossed edge's midpoint
        assert!((c.t - 0.5).abs() < 1e-9);

        // geodesic length equals the planar distance between the apexes
        assert!((tr.length - 0.2).abs() < 1e-9);
        assert_eq!(tr.end, SurfacePoint::Vertex(if start == 2 { 3 } else { 2 }));

        // crossing position on the base surface
        let p = base.position_of(&SurfacePoint::Edge { halfedge: c.halfedge, t: c.t });
        assert!((p.x - 0.5).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }
}

#[test]
fn test_halfedge_direction_angles_partition_the_fan() {
    let base = thin_quad();
    let tri = IntrinsicTriangulation::new(&base, Backend::Signpost);
    // at vertex 0 the outgoing edges sweep the full cone angle
    let out = tri.conn.outgoing_halfedges(0);
    let mut angles = Vec::new();
    for &g in out.iter() {
        if tri.conn.half_edges[g].face.is_some() {
            angles.push(tri.halfedge_direction_angle(g).unwrap());
        }
    }
    for &a in &angles {
        assert!((0.0..tri.vertex_angle_sum[0] + 1e-12).contains(&a));
    }
    // the fan's first edge sits at angle zero
    assert!(angles.iter().any(|&a| a.abs() < 1e-12));
}
