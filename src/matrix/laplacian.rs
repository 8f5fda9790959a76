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

//! Cotangent Laplacian and lumped mass, computed from edge lengths alone so
//! they apply equally to the base surface and any intrinsic triangulation
//! over it. On an intrinsic Delaunay triangulation all edge weights are
//! non-negative, which is the main reason to build the operator there.

use crate::geometry::triangle;
use crate::matrix::sparse::SparseMatrix;
use crate::mesh::Connectivity;

/// Weak cotangent Laplacian (positive semi-definite convention: diagonal
/// positive, off-diagonals negative).
pub fn cotan_laplacian(conn: &Connectivity, lengths: &[f64]) -> Result<SparseMatrix, &'static str> {
    let n = conn.n_vertices();
    let mut triplets = Vec::new();
    for h in conn.canonical_edges() {
        let t = conn.half_edges[h].twin;
        let mut w = 0.0;
        for g in [h, t] {
            if conn.half_edges[g].face.is_none() {
                continue;
            }
            let a = lengths[g];
            let b = lengths[conn.half_edges[g].next];
            let c = lengths[conn.half_edges[g].prev];
            w += 0.5 * triangle::cot_angle_opposite(a, b, c);
        }
        let i = conn.tail(h);
        let j = conn.head(h);
        triplets.push((i, j, -w));
        triplets.push((j, i, -w));
        triplets.push((i, i, w));
        triplets.push((j, j, w));
    }
    SparseMatrix::from_triplets(n, n, &triplets)
}

/// Lumped (barycentric) vertex masses: one third of each incident face
/// area.
pub fn vertex_lumped_mass(conn: &Connectivity, lengths: &[f64]) -> Vec<f64> {
    let mut mass = vec![0.0; conn.n_vertices()];
    for f in conn.live_faces() {
        let [h0, h1, h2] = conn.face_half_edges(f);
        let area = triangle::area_from_lengths(lengths[h0], lengths[h1], lengths[h2]);
        for v in conn.face_vertices(f) {
            mass[v] += area / 3.0;
        }
    }
    mass
}
