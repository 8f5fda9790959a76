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

//! L2-optimal attribute transfer between the base surface and an intrinsic
//! triangulation, via the common subdivision. Both interpolation matrices
//! have rows of convex barycentric weights; the Galerkin normal equations
//! are assembled with a mass lumped from subdivision polygon areas.

use crate::intrinsic::subdivision::CommonSubdivision;
use crate::intrinsic::tri::IntrinsicTriangulation;
use crate::matrix::sparse::{DenseMatrix, SparseMatrix};
use crate::mesh::{BaseSurface, Connectivity, SurfacePoint};

fn point_row(conn: &Connectivity, p: &SurfacePoint) -> Vec<(usize, f64)> {
    match *p {
        SurfacePoint::Vertex(v) => vec![(v, 1.0)],
        SurfacePoint::Edge { halfedge, t } => {
            vec![(conn.tail(halfedge), 1.0 - t), (conn.head(halfedge), t)]
        }
        SurfacePoint::Face { face, bary } => {
            let [v0, v1, v2] = conn.face_vertices(face);
            vec![(v0, bary[0]), (v1, bary[1]), (v2, bary[2])]
        }
    }
}

fn interpolation_matrix<F>(
    cs: &CommonSubdivision,
    n_cols: usize,
    locate: F,
) -> Result<SparseMatrix, &'static str>
where
    F: Fn(usize) -> Vec<(usize, f64)>,
{
    let mut triplets = Vec::with_capacity(3 * cs.n_points());
    for i in 0..cs.n_points() {
        for (j, w) in locate(i) {
            if w != 0.0 {
                triplets.push((i, j, w));
            }
        }
    }
    SparseMatrix::from_triplets(cs.n_points(), n_cols, &triplets)
}

/// Rows interpolate per-base-vertex data to subdivision points.
pub fn base_interpolation_matrix(
    cs: &CommonSubdivision,
    base: &BaseSurface,
) -> Result<SparseMatrix, &'static str> {
    interpolation_matrix(cs, base.n_vertices(), |i| point_row(&base.conn, &cs.points[i].on_base))
}

/// Rows interpolate per-intrinsic-vertex data to subdivision points.
pub fn intrinsic_interpolation_matrix(
    cs: &CommonSubdivision,
    tri: &IntrinsicTriangulation,
) -> Result<SparseMatrix, &'static str> {
    interpolation_matrix(cs, tri.n_vertices(), |i| {
        point_row(&tri.conn, &cs.points[i].on_intrinsic)
    })
}

/// Diagonal mass over subdivision points, lumping each polygon's area
/// equally onto its corners.
pub fn subdivision_point_mass(cs: &CommonSubdivision) -> SparseMatrix {
    let mut mass = vec![0.0; cs.n_points()];
    for (poly, &area) in cs.faces.iter().zip(cs.areas.iter()) {
        let share = area / poly.len() as f64;
        for &p in poly {
            mass[p] += share;
        }
    }
    SparseMatrix::diagonal(&mass)
}

/// Precomputed operators for moving piecewise-linear data between the two
/// triangulations.
#[derive(Debug, Clone)]
pub struct AttributeTransfer {
    /// Subdivision points from base vertices.
    pub p_a: SparseMatrix,
    /// Subdivision points from intrinsic vertices.
    pub p_b: SparseMatrix,
    /// Lumped mass on subdivision points.
    pub mass: SparseMatrix,
}

impl AttributeTransfer {
    pub fn new(
        cs: &CommonSubdivision,
        tri: &IntrinsicTriangulation,
    ) -> Result<Self, &'static str> {
        Ok(Self {
            p_a: base_interpolation_matrix(cs, tri.base)?,
            p_b: intrinsic_interpolation_matrix(cs, tri)?,
            mass: subdivision_point_mass(cs),
        })
    }

    /// Normal equations for the L2-optimal transfer of base data onto the
    /// intrinsic triangulation: solve `lhs x = rhs u`.
    pub fn a_to_b_matrices(&self) -> Result<(SparseMatrix, SparseMatrix), &'static str> {
        let pbt = self.p_b.transpose();
        let pbt_m = pbt.multiply(&self.mass)?;
        Ok((pbt_m.multiply(&self.p_b)?, pbt_m.multiply(&self.p_a)?))
    }

    /// Normal equations for the reverse transfer: solve `lhs x = rhs u`.
    pub fn b_to_a_matrices(&self) -> Result<(SparseMatrix, SparseMatrix), &'static str> {
        let pat = self.p_a.transpose();
        let pat_m = pat.multiply(&self.mass)?;
        Ok((pat_m.multiply(&self.p_a)?, pat_m.multiply(&self.p_b)?))
    }
}

/// Rows interpolate per-base-vertex data to the intrinsic vertices, each
/// row holding the convex weights of the vertex's location on the base
/// surface. Rows sum to one.
pub fn vertex_interpolation_matrix(
    tri: &IntrinsicTriangulation,
) -> Result<SparseMatrix, &'static str> {
    let mut triplets = Vec::with_capacity(3 * tri.n_vertices());
    for v in 0..tri.n_vertices() {
        for (j, w) in point_row(&tri.base.conn, &tri.locations[v]) {
            if w != 0.0 {
                triplets.push((v, j, w));
            }
        }
    }
    SparseMatrix::from_triplets(tri.n_vertices(), tri.base.n_vertices(), &triplets)
}

/// Pointwise transfer of per-base-vertex data: evaluate at each intrinsic
/// vertex's location on the base surface.
pub fn transfer_a_to_b_pointwise(tri: &IntrinsicTriangulation, values: &[f64]) -> Vec<f64> {
    (0..tri.n_vertices())
        .map(|v| {
            point_row(&tri.base.conn, &tri.locations[v])
                .into_iter()
                .map(|(j, w)| w * values[j])
                .sum()
        })
        .collect()
}

/// Pointwise transfer of per-intrinsic-vertex data back to base vertices;
/// base vertices are intrinsic vertices with the same index.
pub fn transfer_b_to_a_pointwise(tri: &IntrinsicTriangulation, values: &[f64]) -> Vec<f64> {
    values[..tri.base.n_vertices()].to_vec()
}

/// Extrinsic positions of the intrinsic vertices, one row per vertex,
/// sampled from each vertex's location on the base surface.
pub fn vertex_position_matrix(tri: &IntrinsicTriangulation) -> DenseMatrix<f64> {
    let mut m = DenseMatrix::zeros(tri.n_vertices(), 3);
    for v in 0..tri.n_vertices() {
        let p = tri.base.position_of(&tri.locations[v]);
        m.set(v, 0, p.x);
        m.set(v, 1, p.y);
        m.set(v, 2, p.z);
    }
    m
}

/// Per-face corner indices and edge lengths of the intrinsic triangulation,
/// in a stable face order. Lengths are in slot order: side `i` connects
/// corners `i` and `i + 1`.
pub fn face_index_and_length_arrays(
    tri: &IntrinsicTriangulation,
) -> (Vec<[usize; 3]>, Vec<[f64; 3]>) {
    let faces = tri.conn.live_faces();
    let mut inds = Vec::with_capacity(faces.len());
    let mut lens = Vec::with_capacity(faces.len());
    for f in faces {
        inds.push(tri.conn.face_vertices(f));
        lens.push(tri.face_lengths(f));
    }
    (inds, lens)
}
