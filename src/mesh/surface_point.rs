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

use crate::mesh::core::Connectivity;

/// A point on a triangulated surface, referenced to the simplex that
/// contains it. This is the ground-truth location of every intrinsic
/// element relative to the base surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfacePoint {
    /// Exactly at a mesh vertex.
    Vertex(usize),
    /// On the interior of an edge, at parameter `t` in (0,1) measured from
    /// the tail to the head of `halfedge`.
    Edge { halfedge: usize, t: f64 },
    /// In the interior of a face, with barycentric coordinates ordered as
    /// `Connectivity::face_vertices`.
    Face { face: usize, bary: [f64; 3] },
}

impl SurfacePoint {
    /// Express this point in the coordinates of some incident face. Vertex
    /// and edge points are pushed into an arbitrary (but deterministic)
    /// adjacent face.
    pub fn in_some_face(&self, conn: &Connectivity) -> (usize, [f64; 3]) {
        match *self {
            SurfacePoint::Face { face, bary } => (face, bary),
            SurfacePoint::Edge { halfedge, t } => {
                // Prefer the half-edge's own face; fall back to the twin for
                // border half-edges.
                let (he, s) = match conn.half_edges[halfedge].face {
                    Some(_) => (halfedge, t),
                    None => (conn.half_edges[halfedge].twin, 1.0 - t),
                };
                let f = conn.half_edges[he].face.expect("edge with no face on either side");
                let hes = conn.face_half_edges(f);
                let mut bary = [0.0; 3];
                // he runs from corner i to corner i+1 where i is its slot.
                let i = hes.iter().position(|&x| x == he).expect("half-edge not in its face");
                bary[i] = 1.0 - s;
                bary[(i + 1) % 3] = s;
                (f, bary)
            }
            SurfacePoint::Vertex(v) => {
                let he = conn.vertices[v].half_edge.expect("isolated vertex");
                let he = if conn.half_edges[he].face.is_some() { he } else { conn.half_edges[he].twin };
                let f = conn.half_edges[he].face.expect("vertex with no incident face");
                let vs = conn.face_vertices(f);
                let mut bary = [0.0; 3];
                let i = vs.iter().position(|&x| x == v).expect("vertex not in its face");
                bary[i] = 1.0;
                (f, bary)
            }
        }
    }
}
