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

use std::cmp::Ordering;
use std::f64::consts::TAU;

use crate::geometry::triangle;
use crate::geometry::Vector2;
use crate::intrinsic::integer::{self, EdgePath, IntegerData};
use crate::intrinsic::signpost::SignpostData;
use crate::intrinsic::trace::{self, Crossing, GeodesicTrace};
use crate::mesh::{BaseSurface, Connectivity, SurfacePoint};
use crate::numeric::exact;

/// Which representation tracks where intrinsic edges run over the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Per-half-edge direction angles, updated incrementally.
    Signpost,
    /// Per-half-edge crossing sequences, with geometry re-derived by
    /// unfolding on every query.
    IntegerCoordinate,
}

impl Backend {
    pub fn from_name(name: &str) -> Result<Self, &'static str> {
        match name {
            "signpost" => Ok(Backend::Signpost),
            "integer" | "integer-coordinate" => Ok(Backend::IntegerCoordinate),
            _ => Err("unknown backend name; expected \"signpost\" or \"integer\""),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum BackendData {
    Signpost(SignpostData),
    Integer(IntegerData),
}

/// A triangulation of the same vertex set (plus any inserted vertices)
/// sitting on a fixed base surface, described purely by its connectivity
/// and intrinsic edge lengths.
#[derive(Debug, Clone)]
pub struct IntrinsicTriangulation<'a> {
    pub base: &'a BaseSurface,
    pub conn: Connectivity,
    /// Intrinsic length of each half-edge's edge, mirrored across twins.
    pub edge_length: Vec<f64>,
    /// Where each intrinsic vertex sits on the base surface.
    pub locations: Vec<SurfacePoint>,
    /// Total tangent angle at each intrinsic vertex. Base vertices keep
    /// their cone angle; inserted vertices are flat.
    pub vertex_angle_sum: Vec<f64>,
    /// Half-width of the floating-point dead zone around the Delaunay
    /// threshold; inside it the exact rational predicate decides.
    pub delaunay_tolerance: f64,
    pub(crate) backend: BackendData,
}

impl<'a> IntrinsicTriangulation<'a> {
    /// Start from a copy of the base triangulation.
    pub fn new(base: &'a BaseSurface, backend: Backend) -> Self {
        let conn = base.conn.clone();
        let edge_length = base.edge_length.clone();
        let locations = (0..base.n_vertices()).map(SurfacePoint::Vertex).collect();
        let vertex_angle_sum = base.vertex_angle_sum.clone();
        let backend = match backend {
            Backend::Signpost => BackendData::Signpost(SignpostData::init(base)),
            Backend::IntegerCoordinate => {
                let path = (0..conn.half_edges.len()).map(EdgePath::Shared).collect();
                BackendData::Integer(IntegerData { path })
            }
        };
        Self {
            base,
            conn,
            edge_length,
            locations,
            vertex_angle_sum,
            delaunay_tolerance: 1e-12,
            backend,
        }
    }

    pub fn backend(&self) -> Backend {
        match self.backend {
            BackendData::Signpost(_) => Backend::Signpost,
            BackendData::Integer(_) => Backend::IntegerCoordinate,
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.conn.n_vertices()
    }

    pub fn n_faces(&self) -> usize {
        self.conn.n_live_faces()
    }

    /// Interior angle at the tail of `he` inside its face.
    pub fn corner_angle(&self, he: usize) -> f64 {
        trace::corner_angle(&self.conn, &self.edge_length, he)
    }

    /// Lengths of the three sides of face `f`, in half-edge slot order.
    pub fn face_lengths(&self, f: usize) -> [f64; 3] {
        let [h0, h1, h2] = self.conn.face_half_edges(f);
        [self.edge_length[h0], self.edge_length[h1], self.edge_length[h2]]
    }

    /// Canonical planar layout of intrinsic face `f`.
    pub fn face_layout(&self, f: usize) -> [Vector2; 3] {
        trace::face_layout(&self.conn, &self.edge_length, f)
    }

    /// Whether the edge of `he` satisfies the intrinsic Delaunay condition.
    /// Border edges and edges with the same face on both sides always do.
    /// Inside the floating-point dead zone the exact predicate decides, and
    /// an exact tie counts as Delaunay.
    pub fn is_edge_delaunay(&self, he: usize) -> bool {
        let t = self.conn.half_edges[he].twin;
        let (Some(f0), Some(f1)) = (self.conn.half_edges[he].face, self.conn.half_edges[t].face)
        else {
            return true;
        };
        if f0 == f1 {
            return true;
        }
        let a = self.edge_length[he];
        let b = self.edge_length[self.conn.half_edges[he].next];
        let c = self.edge_length[self.conn.half_edges[he].prev];
        let d = self.edge_length[self.conn.half_edges[t].next];
        let e = self.edge_length[self.conn.half_edges[t].prev];
        let cos_alpha = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
        let cos_beta = ((d * d + e * e - a * a) / (2.0 * d * e)).clamp(-1.0, 1.0);
        let sum = cos_alpha + cos_beta;
        if sum > self.delaunay_tolerance {
            return true;
        }
        if sum < -self.delaunay_tolerance {
            return false;
        }
        exact::delaunay_cos_sum_sign(a, b, c, d, e) != Ordering::Less
    }

    /// True when every edge is intrinsically Delaunay.
    pub fn is_delaunay(&self) -> bool {
        self.conn.canonical_edges().iter().all(|&h| self.is_edge_delaunay(h))
    }

    /// Smallest corner angle of face `f`, in radians.
    pub fn min_face_angle(&self, f: usize) -> f64 {
        let [l0, l1, l2] = self.face_lengths(f);
        triangle::min_angle_from_lengths(l0, l1, l2)
    }

    /// Smallest corner angle over the whole triangulation, in degrees.
    pub fn min_angle_degrees(&self) -> f64 {
        self.conn
            .live_faces()
            .iter()
            .map(|&f| self.min_face_angle(f))
            .fold(f64::INFINITY, f64::min)
            .to_degrees()
    }

    /// Smallest corner angle over corners at metrically flat vertices, in
    /// degrees. Small angles wedged against cone vertices cannot be refined
    /// away, so quality is judged without them.
    pub fn min_angle_degrees_at_flat_vertices(&self) -> f64 {
        let mut min = f64::INFINITY;
        for f in self.conn.live_faces() {
            for h in self.conn.face_half_edges(f) {
                if self.vertex_is_flat(self.conn.tail(h)) {
                    min = min.min(self.corner_angle(h));
                }
            }
        }
        min.to_degrees()
    }

    /// Total intrinsic surface area; always matches the base surface up to
    /// floating-point error.
    pub fn total_area(&self) -> f64 {
        self.conn
            .live_faces()
            .iter()
            .map(|&f| {
                let [l0, l1, l2] = self.face_lengths(f);
                triangle::area_from_lengths(l0, l1, l2)
            })
            .sum()
    }

    /// If this intrinsic edge coincides with a full base edge, the base
    /// half-edge with matching orientation.
    pub fn edge_shared_with_base(&self, he: usize) -> Option<usize> {
        if let BackendData::Integer(data) = &self.backend {
            if let EdgePath::Shared(bhe) = data.path[he] {
                return Some(bhe);
            }
            return None;
        }
        // Signpost backend: shared edges are exactly those connecting two
        // base vertices with no crossings; since the initial triangulation
        // is a copy, half-edge indices below the base's count that still
        // join their original endpoints qualify.
        let tail = self.conn.tail(he);
        let head = self.conn.head(he);
        if tail >= self.base.n_vertices() || head >= self.base.n_vertices() {
            return None;
        }
        if let Ok(crossings) = self.edge_crossings(he) {
            if crossings.is_empty() {
                if let SurfacePoint::Vertex(_) = self.locations[tail] {
                    return self.base.conn.edge_map.get(&(tail, head)).copied();
                }
            }
        }
        None
    }

    /// The base edges crossed by intrinsic half-edge `he`, in order from
    /// its tail, each with the crossing parameter along the base half-edge.
    pub fn edge_crossings(&self, he: usize) -> Result<Vec<Crossing>, &'static str> {
        match &self.backend {
            BackendData::Integer(data) => match &data.path[he] {
                EdgePath::Shared(_) => Ok(Vec::new()),
                EdgePath::Crossings(seq) if seq.is_empty() => Ok(Vec::new()),
                EdgePath::Crossings(seq) => {
                    let tail = &self.locations[self.conn.tail(he)];
                    let head = &self.locations[self.conn.head(he)];
                    let rp = integer::resolve_path(self.base, tail, head, seq)?;
                    Ok(rp.crossings)
                }
            },
            BackendData::Signpost(_) => {
                let tr = self.trace_edge(he)?;
                Ok(tr.crossings)
            }
        }
    }

    /// Trace the geodesic of intrinsic half-edge `he` over the base
    /// surface, from its tail toward its head.
    pub fn trace_edge(&self, he: usize) -> Result<GeodesicTrace, &'static str> {
        self.trace_offset_from_edge(he, 0.0, self.edge_length[he])
    }

    /// Trace over the base surface starting at the tail of intrinsic edge
    /// `he`, in the direction of `he` rotated CCW by `extra_angle`.
    pub fn trace_offset_from_edge(
        &self,
        he: usize,
        extra_angle: f64,
        length: f64,
    ) -> Result<GeodesicTrace, &'static str> {
        let v = self.conn.tail(he);
        let loc = &self.locations[v];
        match &self.backend {
            BackendData::Signpost(data) => {
                let sigma = data.direction[he] + extra_angle;
                match *loc {
                    SurfacePoint::Vertex(bv) => trace::trace_from_vertex(
                        &self.base.conn,
                        &self.base.edge_length,
                        bv,
                        sigma,
                        length,
                    ),
                    _ => {
                        let (f, _) = loc.in_some_face(&self.base.conn);
                        let p = trace::coords_in_face(&self.base.conn, &self.base.edge_length, loc, f)
                            .ok_or("location not incident to its own frame face")?;
                        let dir = Vector2::new(sigma.cos(), sigma.sin());
                        self.launch_on_base(loc, f, p, dir, length)
                    }
                }
            }
            BackendData::Integer(data) => {
                let (frame, p, dir) = match &data.path[he] {
                    EdgePath::Shared(bhe) => {
                        let bhe = *bhe;
                        let bconn = &self.base.conn;
                        let (g, flip) = if bconn.half_edges[bhe].face.is_some() {
                            (bhe, false)
                        } else {
                            (bconn.half_edges[bhe].twin, true)
                        };
                        let f = bconn.half_edges[g].face.ok_or("base edge with no face")?;
                        let layout = self.base.face_layout(f);
                        let hes = bconn.face_half_edges(f);
                        let slot =
                            hes.iter().position(|&x| x == g).expect("half-edge in its face");
                        let a = layout[slot];
                        let b = layout[(slot + 1) % 3];
                        let (p, d) =
                            if flip { (b, (a - b).normalized()) } else { (a, (b - a).normalized()) };
                        (f, p, d)
                    }
                    EdgePath::Crossings(seq) => {
                        let head = &self.locations[self.conn.head(he)];
                        if seq.is_empty() {
                            let f = trace::common_face(&self.base.conn, loc, head)
                                .ok_or("endpoints share no base face")?;
                            let p =
                                trace::coords_in_face(&self.base.conn, &self.base.edge_length, loc, f)
                                    .ok_or("tail not incident to its face")?;
                            let q =
                                trace::coords_in_face(&self.base.conn, &self.base.edge_length, head, f)
                                    .ok_or("head not incident to its face")?;
                            (f, p, (q - p).normalized())
                        } else {
                            let rp = integer::resolve_path(self.base, loc, head, seq)?;
                            let p = trace::coords_in_face(
                                &self.base.conn,
                                &self.base.edge_length,
                                loc,
                                rp.start_face,
                            )
                            .ok_or("tail not incident to the strip")?;
                            (rp.start_face, p, rp.start_direction)
                        }
                    }
                };
                let dir = dir.rotated(extra_angle);
                self.launch_on_base(loc, frame, p, dir, length)
            }
        }
    }

    /// Start a walk from an arbitrary surface point with a direction given
    /// in the frame of `frame_face`. Vertex starts are converted to fan
    /// angles; edge starts pick the adjacent face the direction points
    /// into.
    fn launch_on_base(
        &self,
        loc: &SurfacePoint,
        frame_face: usize,
        p: Vector2,
        dir: Vector2,
        length: f64,
    ) -> Result<GeodesicTrace, &'static str> {
        let bconn = &self.base.conn;
        let blen = &self.base.edge_length;
        match *loc {
            SurfacePoint::Vertex(v) => {
                let raw = trace::vertex_angle_of_direction(bconn, blen, v, frame_face, dir);
                trace::trace_from_vertex(bconn, blen, v, raw, length)
            }
            SurfacePoint::Face { .. } => Ok(trace::trace_in_face(bconn, blen, frame_face, p, dir, length)),
            SurfacePoint::Edge { halfedge, t } => {
                let hes = bconn.face_half_edges(frame_face);
                let (slot, s) = if let Some(i) = hes.iter().position(|&x| x == halfedge) {
                    (i, t)
                } else {
                    let tw = bconn.half_edges[halfedge].twin;
                    let i = hes
                        .iter()
                        .position(|&x| x == tw)
                        .ok_or("edge location not on frame face")?;
                    (i, 1.0 - t)
                };
                let layout = self.base.face_layout(frame_face);
                let a = layout[slot];
                let b = layout[(slot + 1) % 3];
                let e_hat = (b - a).normalized();
                let n_hat = e_hat.perp(); // points into frame_face
                if dir.dot(&n_hat) >= 0.0 {
                    return Ok(trace::trace_in_face(bconn, blen, frame_face, p, dir, length));
                }
                // Direction points into the neighboring face; transfer.
                let h = hes[slot];
                let g = bconn.half_edges[h].twin;
                let nf = bconn.half_edges[g].face.ok_or("walk leaves the surface at its start")?;
                let n_layout = self.base.face_layout(nf);
                let n_hes = bconn.face_half_edges(nf);
                let k = n_hes.iter().position(|&x| x == g).expect("twin in its face");
                let a2 = n_layout[k];
                let b2 = n_layout[(k + 1) % 3];
                let e2_hat = (b2 - a2).normalized();
                let n2_hat = e2_hat.perp();
                let comp_e = dir.dot(&e_hat);
                let comp_n = dir.dot(&n_hat);
                let p2 = a2 + (b2 - a2) * (1.0 - s);
                let d2 = (e2_hat * (-comp_e) + n2_hat * (-comp_n)).normalized();
                Ok(trace::trace_in_face(bconn, blen, nf, p2, d2, length))
            }
        }
    }

    /// Raw base-tangent launch angle of intrinsic half-edge `he`, whose
    /// tail must be an original base vertex.
    pub fn halfedge_direction_angle(&self, he: usize) -> Result<f64, &'static str> {
        let v = self.conn.tail(he);
        if v >= self.base.n_vertices() {
            return Err("tail is not a base vertex");
        }
        match &self.backend {
            BackendData::Signpost(data) => Ok(data.direction[he]),
            BackendData::Integer(data) => match &data.path[he] {
                EdgePath::Shared(bhe) => Ok(self.base.direction_of_halfedge(*bhe)),
                EdgePath::Crossings(seq) => {
                    let tail = &self.locations[v];
                    let head = &self.locations[self.conn.head(he)];
                    if seq.is_empty() {
                        let f = trace::common_face(&self.base.conn, tail, head)
                            .ok_or("endpoints share no base face")?;
                        let p =
                            trace::coords_in_face(&self.base.conn, &self.base.edge_length, tail, f)
                                .ok_or("tail not incident to its face")?;
                        let q =
                            trace::coords_in_face(&self.base.conn, &self.base.edge_length, head, f)
                                .ok_or("head not incident to its face")?;
                        Ok(trace::vertex_angle_of_direction(
                            &self.base.conn,
                            &self.base.edge_length,
                            v,
                            f,
                            (q - p).normalized(),
                        ))
                    } else {
                        let rp = integer::resolve_path(self.base, tail, head, seq)?;
                        Ok(integer::launch_angle_from_tail(self.base, v, &rp))
                    }
                }
            },
        }
    }

    /// The intrinsic face whose wedge at base vertex `v` contains the raw
    /// tangent direction `angle`.
    pub fn face_containing_direction(&self, v: usize, angle: f64) -> Result<usize, &'static str> {
        let sum = self.vertex_angle_sum[v];
        let mut fallback = None;
        for &g in self.conn.outgoing_halfedges(v).iter() {
            if self.conn.half_edges[g].face.is_none() {
                continue;
            }
            let sigma = self.halfedge_direction_angle(g)?;
            let delta = (angle - sigma).rem_euclid(sum);
            if delta < self.corner_angle(g) {
                return self.conn.half_edges[g].face.ok_or("wedge without face");
            }
            fallback = self.conn.half_edges[g].face;
        }
        fallback.ok_or("vertex has no incident intrinsic face")
    }

    /// Attempt to flip the edge of `he`. Returns `Ok(false)` when the flip
    /// is combinatorially or geometrically impossible (border edge, shared
    /// face on both sides, non-convex unfolded quad).
    pub fn try_flip_edge(&mut self, h: usize) -> Result<bool, &'static str> {
        let t = self.conn.half_edges[h].twin;
        let (Some(f0), Some(f1)) = (self.conn.half_edges[h].face, self.conn.half_edges[t].face)
        else {
            return Ok(false);
        };
        if f0 == f1 {
            return Ok(false);
        }

        let hb = self.conn.half_edges[h].next; // v -> c
        let hc = self.conn.half_edges[h].prev; // c -> u
        let he2 = self.conn.half_edges[t].next; // u -> d
        let hf = self.conn.half_edges[t].prev; // d -> v

        // Unfold the two faces across the shared edge: u at the origin,
        // v on the positive x axis, c above, d below.
        let l_uv = self.edge_length[h];
        let (l_vc, l_cu) = (self.edge_length[hb], self.edge_length[hc]);
        let (l_ud, l_dv) = (self.edge_length[he2], self.edge_length[hf]);
        let cx = (l_uv * l_uv + l_cu * l_cu - l_vc * l_vc) / (2.0 * l_uv);
        let cy = (l_cu * l_cu - cx * cx).max(0.0).sqrt();
        let dx = (l_uv * l_uv + l_ud * l_ud - l_dv * l_dv) / (2.0 * l_uv);
        let dy = -(l_ud * l_ud - dx * dx).max(0.0).sqrt();
        if cy <= 0.0 || dy >= 0.0 {
            return Ok(false);
        }

        // The new diagonal must cross the old edge strictly between its
        // endpoints, otherwise the quad is not convex.
        let s = cy / (cy - dy);
        let x_cross = cx + s * (dx - cx);
        if !(x_cross > 0.0 && x_cross < l_uv) {
            return Ok(false);
        }

        let new_len = ((cx - dx) * (cx - dx) + (cy - dy) * (cy - dy)).sqrt();
        if !(new_len.is_finite() && new_len > 0.0) {
            return Ok(false);
        }

        self.conn.flip_edge(h)?;
        self.edge_length[h] = new_len;
        self.edge_length[t] = new_len;

        match self.backend() {
            Backend::Signpost => {
                if let BackendData::Signpost(data) = &mut self.backend {
                    data.after_flip(&self.conn, &self.edge_length, &self.vertex_angle_sum, h);
                }
            }
            Backend::IntegerCoordinate => {
                // Re-trace the new diagonal c -> d: aim CCW of the kept
                // edge c -> u by the new corner angle at c.
                let phi = self.corner_angle(hc);
                let tr = self.trace_offset_from_edge(hc, phi, new_len)?;
                let seq: Vec<usize> = tr.crossings.iter().map(|x| x.halfedge).collect();
                let path = self.classify_traced_path(h, seq);
                let rev = path.reversed(self.base);
                if let BackendData::Integer(data) = &mut self.backend {
                    data.path[h] = path;
                    data.path[t] = rev;
                }
            }
        }
        Ok(true)
    }

    /// Promote a traced crossing sequence to `Shared` when the edge in fact
    /// coincides with a base edge.
    fn classify_traced_path(&self, he: usize, seq: Vec<usize>) -> EdgePath {
        if seq.is_empty() {
            let tail = self.conn.tail(he);
            let head = self.conn.head(he);
            if let (SurfacePoint::Vertex(a), SurfacePoint::Vertex(b)) =
                (&self.locations[tail], &self.locations[head])
            {
                if let Some(&bhe) = self.base.conn.edge_map.get(&(*a, *b)) {
                    return EdgePath::Shared(bhe);
                }
            }
        }
        EdgePath::Crossings(seq)
    }

    /// Insert a new vertex at barycentric coordinates `bary` inside
    /// intrinsic face `f`, splitting it into three. Returns the new vertex.
    pub fn insert_vertex(&mut self, f: usize, bary: [f64; 3]) -> Result<usize, &'static str> {
        let hes = self.conn.face_half_edges(f);
        let layout = self.face_layout(f);
        let w_pos = triangle::from_barycentric(&bary, &layout);

        let mut spoke_len = [0.0; 3];
        let mut psi = [0.0; 3];
        for i in 0..3 {
            let to_w = w_pos - layout[i];
            spoke_len[i] = to_w.norm();
            if spoke_len[i] <= 0.0 {
                return Err("insertion point coincides with a face corner");
            }
            let along = layout[(i + 1) % 3] - layout[i];
            psi[i] = signed_angle(along, to_w).max(0.0);
        }

        // One trace pins the new vertex onto the base surface.
        let tr0 = self.trace_offset_from_edge(hes[0], psi[0], spoke_len[0])?;
        if tr0.stopped_at_boundary {
            return Err("insertion point traces off the surface");
        }
        if let SurfacePoint::Vertex(_) = tr0.end {
            return Err("insertion point coincides with an existing vertex");
        }

        let split = self.conn.split_face(f)?;
        let w = split.vertex;
        self.locations.push(tr0.end.clone());
        self.vertex_angle_sum.push(TAU);
        self.edge_length.resize(self.conn.half_edges.len(), 0.0);
        for i in 0..3 {
            let s = split.spokes[i];
            let tw = self.conn.half_edges[s].twin;
            self.edge_length[s] = spoke_len[i];
            self.edge_length[tw] = spoke_len[i];
        }

        let n_half_edges = self.conn.half_edges.len();
        match self.backend() {
            Backend::Signpost => {
                // Outgoing spokes at the original corners extend existing
                // signposts; spokes at the new vertex come from the traced
                // arrival direction plus flat in-plane rotations.
                let old_dirs = match &self.backend {
                    BackendData::Signpost(data) => {
                        [data.direction[hes[0]], data.direction[hes[1]], data.direction[hes[2]]]
                    }
                    _ => unreachable!(),
                };
                let back = -tr0.end_direction;
                let sigma_w0 = back.y.atan2(back.x).rem_euclid(TAU);
                let mut sigma_out = [0.0; 3];
                let mut sigma_in = [0.0; 3];
                for i in 0..3 {
                    let v_i = self.conn.tail(split.spokes[i]);
                    sigma_out[i] = (old_dirs[i] + psi[i]).rem_euclid(self.vertex_angle_sum[v_i]);
                    let theta = signed_angle(layout[0] - w_pos, layout[i] - w_pos).rem_euclid(TAU);
                    sigma_in[i] = (sigma_w0 + theta).rem_euclid(TAU);
                }
                if let BackendData::Signpost(data) = &mut self.backend {
                    data.direction.resize(n_half_edges, 0.0);
                    for i in 0..3 {
                        let s = split.spokes[i];
                        let tw = self.conn.half_edges[s].twin;
                        data.direction[s] = sigma_out[i];
                        data.direction[tw] = sigma_in[i];
                    }
                }
            }
            Backend::IntegerCoordinate => {
                let mut paths: Vec<(usize, EdgePath)> = Vec::with_capacity(6);
                for i in 0..3 {
                    let tr = if i == 0 {
                        tr0.clone()
                    } else {
                        self.trace_offset_from_edge(hes[i], psi[i], spoke_len[i])?
                    };
                    let seq: Vec<usize> = tr.crossings.iter().map(|x| x.halfedge).collect();
                    let s = split.spokes[i];
                    let tw = self.conn.half_edges[s].twin;
                    let path = EdgePath::Crossings(seq);
                    let rev = path.reversed(self.base);
                    paths.push((s, path));
                    paths.push((tw, rev));
                }
                if let BackendData::Integer(data) = &mut self.backend {
                    data.path.resize(n_half_edges, EdgePath::Crossings(Vec::new()));
                    for (he, path) in paths {
                        data.path[he] = path;
                    }
                }
            }
        }
        Ok(w)
    }

    /// Split a boundary edge of the intrinsic triangulation at parameter
    /// `t` from the tail of interior half-edge `he`. The edge must lie on
    /// the surface boundary, where intrinsic and base edges coincide up to
    /// subdivision.
    pub fn split_boundary_edge(&mut self, he: usize, t: f64) -> Result<usize, &'static str> {
        let tw = self.conn.half_edges[he].twin;
        if self.conn.half_edges[he].face.is_none() {
            return self.split_boundary_edge(tw, 1.0 - t);
        }
        if self.conn.half_edges[tw].face.is_some() {
            return Err("not a boundary edge");
        }
        if !(t > 0.0 && t < 1.0) {
            return Err("split parameter out of range");
        }

        let tail = self.conn.tail(he);
        let head = self.conn.head(he);
        let loc_tail = self.locations[tail].clone();
        let loc_head = self.locations[head].clone();
        let (bhe, s_tail) = boundary_edge_param(self.base, &loc_tail, &loc_head)?;
        let s_head = boundary_param_on(self.base, &loc_head, bhe)?;
        let s_new = s_tail + t * (s_head - s_tail);

        let f = self.conn.half_edges[he].face.ok_or("interior side missing")?;
        let layout = self.face_layout(f);
        let hes = self.conn.face_half_edges(f);
        let i = hes.iter().position(|&x| x == he).expect("half-edge in its face");
        let w_pos = layout[i] + (layout[(i + 1) % 3] - layout[i]) * t;
        let z_slot = (i + 2) % 3;
        let cross_len = (w_pos - layout[z_slot]).norm();
        let hp = hes[z_slot]; // z -> x
        let psi = signed_angle(layout[i] - layout[z_slot], w_pos - layout[z_slot]).max(0.0);
        let old_len = self.edge_length[he];

        // Trace the new cross edge from the opposite corner before the
        // connectivity changes underneath us.
        let tr_z = self.trace_offset_from_edge(hp, psi, cross_len)?;

        let split = self.conn.split_boundary_edge(he)?;
        let w = split.vertex;
        self.locations.push(SurfacePoint::Edge { halfedge: bhe, t: s_new });
        self.vertex_angle_sum.push(TAU);
        self.edge_length.resize(self.conn.half_edges.len(), 0.0);

        let h_xw = split.he_tail_to_new;
        let h_wy = split.he_new_to_head;
        let h_wz = split.cross;
        let b_wx = self.conn.half_edges[h_xw].twin;
        let b_yw = self.conn.half_edges[h_wy].twin;
        let h_zw = self.conn.half_edges[h_wz].twin;
        self.edge_length[h_xw] = t * old_len;
        self.edge_length[b_wx] = t * old_len;
        self.edge_length[h_wy] = (1.0 - t) * old_len;
        self.edge_length[b_yw] = (1.0 - t) * old_len;
        self.edge_length[h_wz] = cross_len;
        self.edge_length[h_zw] = cross_len;

        match &mut self.backend {
            BackendData::Signpost(data) => {
                data.direction.resize(self.conn.half_edges.len(), 0.0);
                // Frame of w is the interior base face beside its edge.
                let loc_w = &self.locations[w];
                let (fw, _) = loc_w.in_some_face(&self.base.conn);
                let b_layout = self.base.face_layout(fw);
                let b_hes = self.base.conn.face_half_edges(fw);
                let (slot, forward) = if let Some(j) = b_hes.iter().position(|&x| x == bhe) {
                    (j, true)
                } else {
                    let btw = self.base.conn.half_edges[bhe].twin;
                    let j = b_hes
                        .iter()
                        .position(|&x| x == btw)
                        .ok_or("boundary edge not on its own face")?;
                    (j, false)
                };
                let e_dir = (b_layout[(slot + 1) % 3] - b_layout[slot]).normalized();
                let e_dir = if forward == (s_head > s_tail) { e_dir } else { -e_dir };
                // e_dir now points from w toward the original head y.
                data.direction[h_wy] = e_dir.y.atan2(e_dir.x).rem_euclid(TAU);
                let back = -e_dir;
                data.direction[b_wx] = back.y.atan2(back.x).rem_euclid(TAU);
                let arrive = -tr_z.end_direction;
                data.direction[h_wz] = arrive.y.atan2(arrive.x).rem_euclid(TAU);
                let z = self.conn.tail(h_zw);
                data.direction[h_zw] =
                    (data.direction[hp] + psi).rem_euclid(self.vertex_angle_sum[z]);
                // h_xw keeps the old signpost of `he`, which it reuses.
            }
            BackendData::Integer(data) => {
                data.path.resize(self.conn.half_edges.len(), EdgePath::Crossings(Vec::new()));
                // tr_z runs z -> w, matching h_zw.
                let seq: Vec<usize> = tr_z.crossings.iter().map(|x| x.halfedge).collect();
                let path = EdgePath::Crossings(seq);
                let rev = path.reversed(self.base);
                data.path[h_zw] = path;
                data.path[h_wz] = rev;
                // Boundary sub-segments lie inside a single base face fan.
                data.path[h_xw] = EdgePath::Crossings(Vec::new());
                data.path[b_wx] = EdgePath::Crossings(Vec::new());
                data.path[h_wy] = EdgePath::Crossings(Vec::new());
                data.path[b_yw] = EdgePath::Crossings(Vec::new());
            }
        }
        Ok(w)
    }
}

/// CCW angle from `a` to `b`, in `(-pi, pi]`.
pub(crate) fn signed_angle(a: Vector2, b: Vector2) -> f64 {
    a.cross(&b).atan2(a.dot(&b))
}

fn boundary_param_on(
    base: &BaseSurface,
    loc: &SurfacePoint,
    bhe: usize,
) -> Result<f64, &'static str> {
    match *loc {
        SurfacePoint::Vertex(v) => {
            if base.conn.tail(bhe) == v {
                Ok(0.0)
            } else if base.conn.head(bhe) == v {
                Ok(1.0)
            } else {
                Err("vertex not on the boundary edge")
            }
        }
        SurfacePoint::Edge { halfedge, t } => {
            if halfedge == bhe {
                Ok(t)
            } else if base.conn.half_edges[halfedge].twin == bhe {
                Ok(1.0 - t)
            } else {
                Err("point not on the boundary edge")
            }
        }
        SurfacePoint::Face { .. } => Err("face point on a boundary edge"),
    }
}

/// The base edge a boundary segment lies on, with the tail's parameter.
fn boundary_edge_param(
    base: &BaseSurface,
    tail: &SurfacePoint,
    head: &SurfacePoint,
) -> Result<(usize, f64), &'static str> {
    // An edge-point endpoint names the base edge directly; otherwise both
    // endpoints are vertices of one base edge.
    if let SurfacePoint::Edge { halfedge, t } = *tail {
        return Ok((halfedge, t));
    }
    if let SurfacePoint::Edge { halfedge, .. } = *head {
        let s = boundary_param_on(base, tail, halfedge)?;
        return Ok((halfedge, s));
    }
    match (tail, head) {
        (SurfacePoint::Vertex(a), SurfacePoint::Vertex(b)) => {
            let bhe = base
                .conn
                .edge_map
                .get(&(*a, *b))
                .copied()
                .ok_or("boundary segment endpoints do not span a base edge")?;
            Ok((bhe, 0.0))
        }
        _ => Err("boundary segment endpoints are not on the boundary"),
    }
}
