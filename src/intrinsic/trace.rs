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

//! Straight-line walks over a triangle mesh equipped with edge lengths.
//! Each face is laid out in its own canonical plane frame and the walk is
//! transferred across edges by re-expressing the direction in the
//! neighboring frame. Works for both the base surface (geodesic tracing)
//! and the intrinsic triangulation itself (point location walks).

use crate::geometry::triangle;
use crate::geometry::Vector2;
use crate::mesh::{Connectivity, SurfacePoint};

/// Relative tolerance for snapping walk endpoints onto edges and vertices.
pub const SNAP_EPS: f64 = 1e-9;

/// One transversal crossing of an edge, identified by the half-edge whose
/// face the walk is leaving, with `t` measured from its tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub halfedge: usize,
    pub t: f64,
}

/// Result of a straight walk.
#[derive(Debug, Clone)]
pub struct GeodesicTrace {
    pub crossings: Vec<Crossing>,
    pub end: SurfacePoint,
    /// Face in whose canonical frame `end_point` and `end_direction` are
    /// expressed. Always a face the walk actually entered.
    pub end_face: usize,
    pub end_point: Vector2,
    /// Unit direction of arrival in the `end_face` frame.
    pub end_direction: Vector2,
    /// Length actually walked. Shorter than requested only when the walk
    /// ran into a border edge.
    pub length: f64,
    pub stopped_at_boundary: bool,
}

/// Canonical planar layout of a face from edge lengths alone.
pub fn face_layout(conn: &Connectivity, lengths: &[f64], f: usize) -> [Vector2; 3] {
    let [h0, h1, h2] = conn.face_half_edges(f);
    triangle::layout_from_lengths(lengths[h0], lengths[h1], lengths[h2])
}

/// Interior angle at the tail of `he` inside its face, from lengths.
pub fn corner_angle(conn: &Connectivity, lengths: &[f64], he: usize) -> f64 {
    let f = conn.half_edges[he].face.expect("corner angle of a border half-edge");
    let [h0, h1, h2] = conn.face_half_edges(f);
    let (l0, l1, l2) = (lengths[h0], lengths[h1], lengths[h2]);
    if he == h0 {
        triangle::angle_opposite(l1, l2, l0)
    } else if he == h1 {
        triangle::angle_opposite(l2, l0, l1)
    } else {
        triangle::angle_opposite(l0, l1, l2)
    }
}

/// Total interior angle around a vertex.
pub fn vertex_angle_sum(conn: &Connectivity, lengths: &[f64], v: usize) -> f64 {
    conn.outgoing_halfedges(v)
        .iter()
        .filter(|&&h| conn.half_edges[h].face.is_some())
        .map(|&h| corner_angle(conn, lengths, h))
        .sum()
}

/// Raw cumulative angle of outgoing half-edge `he` at its tail, measured
/// CCW from the first half-edge of the tail's fan.
pub fn direction_of_halfedge(conn: &Connectivity, lengths: &[f64], he: usize) -> f64 {
    let v = conn.tail(he);
    let mut acc = 0.0;
    for &g in conn.outgoing_halfedges(v).iter() {
        if g == he {
            return acc;
        }
        if conn.half_edges[g].face.is_some() {
            acc += corner_angle(conn, lengths, g);
        }
    }
    acc
}

/// Walk straight from a point inside `face` (canonical frame coordinates)
/// along unit direction `dir` for `length`.
pub fn trace_in_face(
    conn: &Connectivity,
    lengths: &[f64],
    face: usize,
    start: Vector2,
    dir: Vector2,
    length: f64,
) -> GeodesicTrace {
    let mut f = face;
    let mut p = start;
    let mut d = dir.normalized();
    let mut remaining = length;
    let mut entry_slot: Option<usize> = None;
    let mut crossings = Vec::new();
    let mut stopped_at_boundary = false;

    // Each iteration either consumes the rest of the length inside the
    // current face or crosses into a neighbor. The cap only guards against
    // numerical stalls.
    let max_steps = 8 * conn.half_edges.len() + 64;
    for _ in 0..max_steps {
        let layout = face_layout(conn, lengths, f);
        let hes = conn.face_half_edges(f);

        // Find the exit edge: smallest positive ray parameter among the
        // two or three candidate sides.
        let mut best: Option<(f64, f64, usize)> = None; // (s, t, slot)
        for slot in 0..3 {
            if entry_slot == Some(slot) {
                continue;
            }
            let a = layout[slot];
            let b = layout[(slot + 1) % 3];
            let e = b - a;
            let denom = d.cross(&e);
            if denom.abs() < 1e-300 {
                continue;
            }
            let ap = a - p;
            let s = ap.cross(&e) / denom;
            let t = ap.cross(&d) / denom;
            let scale = e.norm();
            // Strictly positive: the start point may sit on an edge when
            // launching from a vertex or crossing near a corner.
            if s > SNAP_EPS * scale
                && (-SNAP_EPS..=1.0 + SNAP_EPS).contains(&t)
                && best.map_or(true, |(bs, _, _)| s < bs)
            {
                best = Some((s, t.clamp(0.0, 1.0), slot));
            }
        }

        let Some((s_exit, t_exit, slot)) = best else {
            // Numerically wedged against a corner; end where we stand.
            break;
        };

        // Tolerant arrival: a walk whose length expires within snapping
        // distance of the exit edge ends there instead of crossing it.
        if remaining <= s_exit + SNAP_EPS * (1.0 + remaining) {
            p = p + d * remaining.min(s_exit);
            remaining = 0.0;
            break;
        }

        let h = hes[slot];
        let g = conn.half_edges[h].twin;
        remaining -= s_exit;

        if conn.half_edges[g].face.is_none() {
            // Ran off the surface; stop on the border edge.
            p = layout[slot] + (layout[(slot + 1) % 3] - layout[slot]) * t_exit;
            stopped_at_boundary = true;
            let end = SurfacePoint::Edge { halfedge: h, t: t_exit };
            return GeodesicTrace {
                crossings,
                end,
                end_face: f,
                end_point: p,
                end_direction: d,
                length: length - remaining,
                stopped_at_boundary,
            };
        }

        // Keep crossings strictly interior to the edge.
        let t_exit = t_exit.clamp(1e-12, 1.0 - 1e-12);
        crossings.push(Crossing { halfedge: h, t: t_exit });

        // Transfer into the neighbor frame. The shared edge appears with
        // reversed orientation there, so both direction components negate
        // and the crossing parameter becomes 1 - t.
        let a = layout[slot];
        let b = layout[(slot + 1) % 3];
        let e_hat = (b - a).normalized();
        let n_hat = e_hat.perp();
        let comp_e = d.dot(&e_hat);
        let comp_n = d.dot(&n_hat);

        let nf = conn.half_edges[g].face.expect("twin face checked above");
        let n_layout = face_layout(conn, lengths, nf);
        let n_hes = conn.face_half_edges(nf);
        let k = n_hes.iter().position(|&x| x == g).expect("twin not in its face");
        let a2 = n_layout[k];
        let b2 = n_layout[(k + 1) % 3];
        let e2_hat = (b2 - a2).normalized();
        let n2_hat = e2_hat.perp();

        p = a2 + (b2 - a2) * (1.0 - t_exit);
        d = (e2_hat * (-comp_e) + n2_hat * (-comp_n)).normalized();
        f = nf;
        entry_slot = Some(k);
    }

    let layout = face_layout(conn, lengths, f);
    let bary = triangle::barycentric(&p, &layout);
    let end = snap_point(conn, f, bary);
    GeodesicTrace {
        crossings,
        end,
        end_face: f,
        end_point: p,
        end_direction: d,
        length: length - remaining,
        stopped_at_boundary,
    }
}

/// Walk straight out of vertex `v` at raw tangent angle `angle` (CCW from
/// the first half-edge of the vertex fan) for `length`.
pub fn trace_from_vertex(
    conn: &Connectivity,
    lengths: &[f64],
    v: usize,
    angle: f64,
    length: f64,
) -> Result<GeodesicTrace, &'static str> {
    let total = vertex_angle_sum(conn, lengths, v);
    if total <= 0.0 {
        return Err("cannot trace from an isolated vertex");
    }
    let mut angle = angle % total;
    if angle < 0.0 {
        angle += total;
    }

    // Find the wedge containing the launch angle.
    let fan = conn.outgoing_halfedges(v);
    let mut acc = 0.0;
    let mut wedge = usize::MAX;
    let mut offset = 0.0;
    for &g in fan.iter() {
        if conn.half_edges[g].face.is_none() {
            continue;
        }
        let ca = corner_angle(conn, lengths, g);
        if angle <= acc + ca || g == *fan.last().expect("non-empty fan") {
            wedge = g;
            offset = (angle - acc).clamp(0.0, ca);
            break;
        }
        acc += ca;
    }
    if wedge == usize::MAX {
        // Launch angle past the last interior wedge of a boundary fan.
        let g = *fan
            .iter()
            .rev()
            .find(|&&g| conn.half_edges[g].face.is_some())
            .ok_or("vertex has no incident face")?;
        wedge = g;
        offset = corner_angle(conn, lengths, g);
    }

    let f = conn.half_edges[wedge].face.expect("wedge is interior");
    let layout = face_layout(conn, lengths, f);
    let hes = conn.face_half_edges(f);
    let slot = hes.iter().position(|&x| x == wedge).expect("wedge in its face");
    let p = layout[slot];
    let along = (layout[(slot + 1) % 3] - p).normalized();
    let d = along.rotated(offset);
    Ok(trace_in_face(conn, lengths, f, p, d, length))
}

/// Canonical-frame coordinates of a surface point within face `f`, if the
/// point is incident to that face.
pub fn coords_in_face(
    conn: &Connectivity,
    lengths: &[f64],
    p: &SurfacePoint,
    f: usize,
) -> Option<Vector2> {
    let layout = face_layout(conn, lengths, f);
    match *p {
        SurfacePoint::Vertex(v) => {
            let vs = conn.face_vertices(f);
            let i = vs.iter().position(|&x| x == v)?;
            Some(layout[i])
        }
        SurfacePoint::Edge { halfedge, t } => {
            let hes = conn.face_half_edges(f);
            if let Some(i) = hes.iter().position(|&x| x == halfedge) {
                return Some(layout[i] + (layout[(i + 1) % 3] - layout[i]) * t);
            }
            let tw = conn.half_edges[halfedge].twin;
            let i = hes.iter().position(|&x| x == tw)?;
            Some(layout[i] + (layout[(i + 1) % 3] - layout[i]) * (1.0 - t))
        }
        SurfacePoint::Face { face, bary } => {
            if face != f {
                return None;
            }
            Some(triangle::from_barycentric(&bary, &layout))
        }
    }
}

/// Faces incident to a surface point.
pub fn incident_faces(conn: &Connectivity, p: &SurfacePoint) -> Vec<usize> {
    match *p {
        SurfacePoint::Vertex(v) => conn
            .outgoing_halfedges(v)
            .iter()
            .filter_map(|&h| conn.half_edges[h].face)
            .collect(),
        SurfacePoint::Edge { halfedge, .. } => {
            let tw = conn.half_edges[halfedge].twin;
            [halfedge, tw]
                .iter()
                .filter_map(|&h| conn.half_edges[h].face)
                .collect()
        }
        SurfacePoint::Face { face, .. } => vec![face],
    }
}

/// A face incident to both points, if one exists.
pub fn common_face(conn: &Connectivity, a: &SurfacePoint, b: &SurfacePoint) -> Option<usize> {
    let fb = incident_faces(conn, b);
    incident_faces(conn, a).into_iter().find(|f| fb.contains(f))
}

/// Raw tangent angle at vertex `v` of a direction given in the canonical
/// frame of incident face `f`.
pub fn vertex_angle_of_direction(
    conn: &Connectivity,
    lengths: &[f64],
    v: usize,
    f: usize,
    dir: Vector2,
) -> f64 {
    let g = conn.face_halfedge_from(f, v).expect("vertex not in face");
    let layout = face_layout(conn, lengths, f);
    let hes = conn.face_half_edges(f);
    let slot = hes.iter().position(|&x| x == g).expect("half-edge in its face");
    let e0 = (layout[(slot + 1) % 3] - layout[slot]).normalized();
    let delta = e0.cross(&dir).atan2(e0.dot(&dir));
    let ca = corner_angle(conn, lengths, g);
    let delta = if delta < 0.0 { 0.0 } else { delta.min(ca) };
    direction_of_halfedge(conn, lengths, g) + delta
}

/// Snap barycentric coordinates in `f` to the closest simplex: vertex if
/// two coordinates vanish, edge if one does, otherwise the face interior.
pub fn snap_point(conn: &Connectivity, f: usize, bary: [f64; 3]) -> SurfacePoint {
    let mut b = bary;
    let mut small = [false; 3];
    for i in 0..3 {
        if b[i].abs() < SNAP_EPS {
            b[i] = 0.0;
            small[i] = true;
        }
    }
    let n_small = small.iter().filter(|&&x| x).count();
    let vs = conn.face_vertices(f);
    match n_small {
        2 => {
            let i = (0..3).find(|&i| !small[i]).expect("one coordinate survives");
            SurfacePoint::Vertex(vs[i])
        }
        1 => {
            // bary[k] = 0 puts the point on the edge from corner k+1 to
            // corner k+2, which is the face's half-edge in slot k+1.
            let k = (0..3).find(|&i| small[i]).expect("one coordinate vanished");
            let hes = conn.face_half_edges(f);
            let i = (k + 1) % 3;
            let j = (k + 2) % 3;
            let t = b[j] / (b[i] + b[j]);
            SurfacePoint::Edge { halfedge: hes[i], t }
        }
        _ => {
            let sum: f64 = b.iter().sum();
            SurfacePoint::Face { face: f, bary: [b[0] / sum, b[1] / sum, b[2] / sum] }
        }
    }
}
