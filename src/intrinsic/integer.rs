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

//! Integer-coordinate backend state: each intrinsic half-edge stores the
//! combinatorial sequence of base edges its geodesic crosses. All geometry
//! (crossing parameters, lengths, launch directions) is re-derived by
//! unfolding the recorded strip of base faces, so repeated queries never
//! accumulate drift.

use crate::geometry::Vector2;
use crate::intrinsic::trace::{self, Crossing};
use crate::mesh::{BaseSurface, SurfacePoint};

/// Combinatorial path of one intrinsic half-edge over the base surface.
#[derive(Debug, Clone)]
pub enum EdgePath {
    /// The intrinsic edge coincides with the base edge of this half-edge,
    /// oriented the same way.
    Shared(usize),
    /// Transversal crossings: base half-edges whose face the path exits, in
    /// order from tail to head. Empty when both endpoints lie in a common
    /// base face.
    Crossings(Vec<usize>),
}

impl EdgePath {
    /// The same path as seen from the opposite half-edge.
    pub fn reversed(&self, base: &BaseSurface) -> EdgePath {
        match self {
            EdgePath::Shared(h) => EdgePath::Shared(base.conn.half_edges[*h].twin),
            EdgePath::Crossings(seq) => EdgePath::Crossings(
                seq.iter().rev().map(|&h| base.conn.half_edges[h].twin).collect(),
            ),
        }
    }
}

/// Per-half-edge path storage for the integer-coordinate backend.
#[derive(Debug, Clone, Default)]
pub struct IntegerData {
    pub path: Vec<EdgePath>,
}

/// Geometry of a path, recovered by strip unfolding.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub crossings: Vec<Crossing>,
    /// Fraction of the path length at each crossing, strictly increasing.
    pub along: Vec<f64>,
    pub length: f64,
    pub start_face: usize,
    /// Unit launch direction in the canonical frame of `start_face`.
    pub start_direction: Vector2,
    pub end_face: usize,
    /// Unit arrival direction (direction of travel) in the canonical frame
    /// of `end_face`.
    pub end_direction: Vector2,
}

/// Rigid motion of the plane, as rotation (unit complex) plus translation.
#[derive(Debug, Clone, Copy)]
struct Rigid {
    rot: Vector2,
    shift: Vector2,
}

impl Rigid {
    fn identity() -> Self {
        Self { rot: Vector2::new(1.0, 0.0), shift: Vector2::zero() }
    }

    fn apply(&self, p: Vector2) -> Vector2 {
        Vector2::new(
            self.rot.x * p.x - self.rot.y * p.y,
            self.rot.y * p.x + self.rot.x * p.y,
        ) + self.shift
    }

    fn rotate(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.rot.x * v.x - self.rot.y * v.y, self.rot.y * v.x + self.rot.x * v.y)
    }

    fn unrotate(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.rot.x * v.x + self.rot.y * v.y, -self.rot.y * v.x + self.rot.x * v.y)
    }

    /// The rigid motion taking `x1 -> y1` and (up to length error) `x2 -> y2`.
    fn from_pairs(x1: Vector2, x2: Vector2, y1: Vector2, y2: Vector2) -> Self {
        let u = (x2 - x1).normalized();
        let w = (y2 - y1).normalized();
        // w = rot * u, so rot = w * conj(u).
        let rot = Vector2::new(w.x * u.x + w.y * u.y, w.y * u.x - w.x * u.y);
        let rotated = Vector2::new(rot.x * x1.x - rot.y * x1.y, rot.y * x1.x + rot.x * x1.y);
        Self { rot, shift: y1 - rotated }
    }
}

/// Recover the geometry of a path from its endpoints and crossing sequence
/// by unfolding the crossed base faces into a common plane and connecting
/// the endpoints with a straight segment.
pub fn resolve_path(
    base: &BaseSurface,
    start: &SurfacePoint,
    end: &SurfacePoint,
    seq: &[usize],
) -> Result<ResolvedPath, &'static str> {
    let conn = &base.conn;
    let lengths = &base.edge_length;

    let start_face = if let Some(&h0) = seq.first() {
        conn.half_edges[h0].face.ok_or("path crosses a border half-edge")?
    } else {
        trace::common_face(conn, start, end).ok_or("endpoints share no face")?
    };

    // Unfold the strip. For each crossing remember the unfolded endpoints
    // of the crossed edge.
    let mut xf = Rigid::identity();
    let mut face = start_face;
    let mut strip_edges: Vec<(Vector2, Vector2)> = Vec::with_capacity(seq.len());
    for &h in seq {
        if conn.half_edges[h].face != Some(face) {
            return Err("crossing sequence is not a connected strip");
        }
        let layout = trace::face_layout(conn, lengths, face);
        let hes = conn.face_half_edges(face);
        let slot = hes.iter().position(|&x| x == h).expect("half-edge in its face");
        let a = xf.apply(layout[slot]);
        let b = xf.apply(layout[(slot + 1) % 3]);
        strip_edges.push((a, b));

        let g = conn.half_edges[h].twin;
        let nf = conn.half_edges[g].face.ok_or("path exits through a border edge")?;
        let n_layout = trace::face_layout(conn, lengths, nf);
        let n_hes = conn.face_half_edges(nf);
        let k = n_hes.iter().position(|&x| x == g).expect("twin in its face");
        // g runs head(h) -> tail(h), so its tail corner lands on b.
        xf = Rigid::from_pairs(n_layout[k], n_layout[(k + 1) % 3], b, a);
        face = nf;
    }
    let end_face = face;
    let end_xf = xf;

    let p0 = trace::coords_in_face(conn, lengths, start, start_face)
        .ok_or("path tail is not incident to the first strip face")?;
    let p1_local = trace::coords_in_face(conn, lengths, end, end_face)
        .ok_or("path head is not incident to the last strip face")?;
    let p1 = end_xf.apply(p1_local);

    let v = p1 - p0;
    let length = v.norm();
    if length <= 0.0 {
        return Err("zero-length path");
    }
    let dir = v / length;

    let mut crossings = Vec::with_capacity(seq.len());
    let mut along = Vec::with_capacity(seq.len());
    let mut last_s = 0.0f64;
    for (i, &h) in seq.iter().enumerate() {
        let (a, b) = strip_edges[i];
        let e = b - a;
        let denom = e.cross(&v);
        if denom.abs() < 1e-300 {
            return Err("path runs parallel to a crossed edge");
        }
        let t = (p0 - a).cross(&v) / denom;
        let s = (a - p0).cross(&e) / v.cross(&e);
        crossings.push(Crossing { halfedge: h, t: t.clamp(1e-12, 1.0 - 1e-12) });
        last_s = s.clamp(last_s + f64::EPSILON, 1.0 - 1e-12);
        along.push(last_s);
    }

    Ok(ResolvedPath {
        crossings,
        along,
        length,
        start_face,
        start_direction: dir,
        end_face,
        end_direction: end_xf.unrotate(dir),
    })
}

/// Raw tangent angle at the path's tail vertex of its launch direction.
pub fn launch_angle_from_tail(
    base: &BaseSurface,
    tail: usize,
    resolved: &ResolvedPath,
) -> f64 {
    trace::vertex_angle_of_direction(
        &base.conn,
        &base.edge_length,
        tail,
        resolved.start_face,
        resolved.start_direction,
    )
}
