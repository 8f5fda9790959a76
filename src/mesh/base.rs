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

use crate::geometry::triangle;
use crate::geometry::{Vector2, Vector3};
use crate::mesh::core::Connectivity;
use crate::mesh::surface_point::SurfacePoint;

/// The fixed input surface: an immutable manifold triangle mesh with 3D
/// vertex positions and precomputed metric data (edge lengths, corner
/// angles, vertex angle sums). Intrinsic triangulations sit on top of one
/// of these and never mutate it.
#[derive(Debug, Clone)]
pub struct BaseSurface {
    pub conn: Connectivity,
    pub positions: Vec<Vector3>,
    /// Length of each half-edge's edge (mirrored across twins).
    pub edge_length: Vec<f64>,
    /// Interior angle at the *tail* of each half-edge within its face;
    /// zero for border half-edges.
    pub corner_angle: Vec<f64>,
    /// Total angle around each vertex, summed over incident corners.
    pub vertex_angle_sum: Vec<f64>,
}

impl BaseSurface {
    /// Build a base surface from positions and CCW triangle corner lists.
    pub fn from_face_list(
        positions: Vec<Vector3>,
        faces: &[[usize; 3]],
    ) -> Result<Self, &'static str> {
        let mut conn = Connectivity::new();
        for _ in 0..positions.len() {
            conn.add_vertex();
        }
        for &[a, b, c] in faces {
            if a >= positions.len() || b >= positions.len() || c >= positions.len() {
                return Err("face references a vertex out of range");
            }
            conn.add_triangle(a, b, c)?;
        }
        conn.build_boundary_loops();

        // Manifold vertex check: the fan walk from the representative
        // half-edge must visit every incident face.
        let mut incident = vec![0usize; positions.len()];
        for f in 0..conn.faces.len() {
            for v in conn.face_vertices(f) {
                incident[v] += 1;
            }
        }
        for v in 0..positions.len() {
            let fan_faces = conn
                .outgoing_halfedges(v)
                .iter()
                .filter(|&&h| conn.half_edges[h].face.is_some())
                .count();
            if fan_faces != incident[v] {
                return Err("non-manifold vertex: incident faces form more than one fan");
            }
        }

        let m = conn.half_edges.len();
        let mut edge_length = vec![0.0; m];
        for h in 0..m {
            let a = positions[conn.tail(h)];
            let b = positions[conn.head(h)];
            edge_length[h] = a.distance(&b);
        }

        let mut corner_angle = vec![0.0; m];
        for f in 0..conn.faces.len() {
            let [h0, h1, h2] = conn.face_half_edges(f);
            let (l0, l1, l2) = (edge_length[h0], edge_length[h1], edge_length[h2]);
            // Angle at the tail of h0 is opposite the far side h1, etc.
            corner_angle[h0] = triangle::angle_opposite(l1, l2, l0);
            corner_angle[h1] = triangle::angle_opposite(l2, l0, l1);
            corner_angle[h2] = triangle::angle_opposite(l0, l1, l2);
        }

        let mut vertex_angle_sum = vec![0.0; positions.len()];
        for h in 0..m {
            if conn.half_edges[h].face.is_some() {
                vertex_angle_sum[conn.tail(h)] += corner_angle[h];
            }
        }

        Ok(Self { conn, positions, edge_length, corner_angle, vertex_angle_sum })
    }

    pub fn n_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn n_faces(&self) -> usize {
        self.conn.n_live_faces()
    }

    /// True if the vertex lies on a border loop.
    pub fn is_boundary_vertex(&self, v: usize) -> bool {
        self.conn
            .outgoing_halfedges(v)
            .iter()
            .any(|&h| self.conn.is_boundary_edge(h))
    }

    /// Lay face `f` out in the plane: corner 0 at the origin, corner 1 on
    /// the positive x axis, corner 2 in the upper half plane. Corners are
    /// ordered like `Connectivity::face_vertices`.
    pub fn face_layout(&self, f: usize) -> [Vector2; 3] {
        let [h0, h1, h2] = self.conn.face_half_edges(f);
        triangle::layout_from_lengths(
            self.edge_length[h0],
            self.edge_length[h1],
            self.edge_length[h2],
        )
    }

    /// Raw cumulative angle of outgoing half-edge `he` at its tail,
    /// measured CCW from the tail's reference half-edge. In `[0, angle sum)`.
    pub fn direction_of_halfedge(&self, he: usize) -> f64 {
        let v = self.conn.tail(he);
        let mut acc = 0.0;
        for &g in self.conn.outgoing_halfedges(v).iter() {
            if g == he {
                return acc;
            }
            acc += self.corner_angle[g];
        }
        acc
    }

    /// 3D position of an arbitrary surface point.
    pub fn position_of(&self, p: &SurfacePoint) -> Vector3 {
        match *p {
            SurfacePoint::Vertex(v) => self.positions[v],
            SurfacePoint::Edge { halfedge, t } => {
                let a = self.positions[self.conn.tail(halfedge)];
                let b = self.positions[self.conn.head(halfedge)];
                a * (1.0 - t) + b * t
            }
            SurfacePoint::Face { face, bary } => {
                let [v0, v1, v2] = self.conn.face_vertices(face);
                self.positions[v0] * bary[0]
                    + self.positions[v1] * bary[1]
                    + self.positions[v2] * bary[2]
            }
        }
    }

    /// Total surface area.
    pub fn total_area(&self) -> f64 {
        self.conn
            .live_faces()
            .iter()
            .map(|&f| {
                let [h0, h1, h2] = self.conn.face_half_edges(f);
                triangle::area_from_lengths(
                    self.edge_length[h0],
                    self.edge_length[h1],
                    self.edge_length[h2],
                )
            })
            .sum()
    }
}
