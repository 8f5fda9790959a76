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

//! The common subdivision of the base surface and an intrinsic
//! triangulation: the polygonal mesh obtained by overlaying both edge sets.
//! Built one base face at a time as a small planar arrangement of boundary
//! sub-segments and geodesic chord pieces, whose faces are read off with a
//! dart walk.

use std::collections::HashMap;

use crate::geometry::triangle;
use crate::geometry::{Vector2, Vector3};
use crate::intrinsic::integer;
use crate::intrinsic::trace::{self, SNAP_EPS};
use crate::intrinsic::tri::IntrinsicTriangulation;
use crate::mesh::{BaseSurface, Connectivity, SurfacePoint};

/// One vertex of the common subdivision, located on both meshes.
#[derive(Debug, Clone)]
pub struct CommonSubdivisionPoint {
    pub on_base: SurfacePoint,
    pub on_intrinsic: SurfacePoint,
}

/// The overlay mesh. Polygons are CCW lists of point indices; each polygon
/// lies inside exactly one base face and one intrinsic face.
#[derive(Debug, Clone)]
pub struct CommonSubdivision {
    pub points: Vec<CommonSubdivisionPoint>,
    pub faces: Vec<Vec<usize>>,
    pub base_face: Vec<usize>,
    pub intrinsic_face: Vec<usize>,
    /// Geodesic area of each polygon.
    pub areas: Vec<f64>,
}

impl CommonSubdivision {
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Linearly interpolate per-base-vertex values to every subdivision
    /// point.
    pub fn interpolate_across_a(&self, base: &BaseSurface, values: &[f64]) -> Vec<f64> {
        self.points.iter().map(|p| eval_at(&base.conn, values, &p.on_base)).collect()
    }

    /// Linearly interpolate per-intrinsic-vertex values to every
    /// subdivision point.
    pub fn interpolate_across_b(
        &self,
        tri: &IntrinsicTriangulation,
        values: &[f64],
    ) -> Vec<f64> {
        self.points.iter().map(|p| eval_at(&tri.conn, values, &p.on_intrinsic)).collect()
    }

    /// Transfer per-base-face values to subdivision polygons.
    pub fn copy_from_a(&self, face_values: &[f64]) -> Vec<f64> {
        self.base_face.iter().map(|&f| face_values[f]).collect()
    }

    /// Transfer per-intrinsic-face values to subdivision polygons.
    pub fn copy_from_b(&self, face_values: &[f64]) -> Vec<f64> {
        self.intrinsic_face.iter().map(|&f| face_values[f]).collect()
    }

    /// 3D positions of the subdivision points on the base surface.
    pub fn sample_vertex_positions(&self, base: &BaseSurface) -> Vec<Vector3> {
        self.points.iter().map(|p| base.position_of(&p.on_base)).collect()
    }

    pub fn total_area(&self) -> f64 {
        self.areas.iter().sum()
    }
}

/// Piecewise-linear evaluation of per-vertex values at a surface point.
fn eval_at(conn: &Connectivity, values: &[f64], p: &SurfacePoint) -> f64 {
    match *p {
        SurfacePoint::Vertex(v) => values[v],
        SurfacePoint::Edge { halfedge, t } => {
            let a = values[conn.tail(halfedge)];
            let b = values[conn.head(halfedge)];
            a * (1.0 - t) + b * t
        }
        SurfacePoint::Face { face, bary } => {
            let [v0, v1, v2] = conn.face_vertices(face);
            values[v0] * bary[0] + values[v1] * bary[1] + values[v2] * bary[2]
        }
    }
}

/// Canonical base edges a surface point lies on.
fn edges_of_point(conn: &Connectivity, p: &SurfacePoint) -> Vec<usize> {
    match *p {
        SurfacePoint::Vertex(v) => conn
            .outgoing_halfedges(v)
            .iter()
            .map(|&h| conn.canonical(h))
            .collect(),
        SurfacePoint::Edge { halfedge, .. } => vec![conn.canonical(halfedge)],
        SurfacePoint::Face { .. } => Vec::new(),
    }
}

fn on_common_base_edge(conn: &Connectivity, a: &SurfacePoint, b: &SurfacePoint) -> bool {
    let eb = edges_of_point(conn, b);
    edges_of_point(conn, a).iter().any(|e| eb.contains(e))
}

impl<'a> IntrinsicTriangulation<'a> {
    /// Build the common subdivision of the base surface and this
    /// triangulation.
    pub fn common_subdivision(&self) -> Result<CommonSubdivision, &'static str> {
        construct(self)
    }
}

pub fn construct(tri: &IntrinsicTriangulation) -> Result<CommonSubdivision, &'static str> {
    let base = tri.base;
    let bconn = &base.conn;

    // Every intrinsic vertex is a subdivision point, with matching index.
    let mut points: Vec<CommonSubdivisionPoint> = (0..tri.n_vertices())
        .map(|v| CommonSubdivisionPoint {
            on_base: tri.locations[v].clone(),
            on_intrinsic: SurfacePoint::Vertex(v),
        })
        .collect();

    // Nodes on each canonical base edge, as (param from canonical tail,
    // point index); intrinsic vertices inside each base face.
    let mut edge_nodes: HashMap<usize, Vec<(f64, usize)>> = HashMap::new();
    let mut interior_nodes: HashMap<usize, Vec<usize>> = HashMap::new();
    for v in 0..tri.n_vertices() {
        match tri.locations[v] {
            SurfacePoint::Vertex(_) => {}
            SurfacePoint::Edge { halfedge, t } => {
                let cb = bconn.canonical(halfedge);
                let s = if halfedge == cb { t } else { 1.0 - t };
                edge_nodes.entry(cb).or_default().push((s, v));
            }
            SurfacePoint::Face { face, .. } => interior_nodes.entry(face).or_default().push(v),
        }
    }

    // Chord pieces inside each base face: (point a, point b, intrinsic
    // half-edge), with a -> b along the half-edge's direction.
    let mut chords: HashMap<usize, Vec<(usize, usize, usize)>> = HashMap::new();

    for he in tri.conn.canonical_edges() {
        if tri.conn.is_boundary_edge(he) {
            continue; // boundary edges lie along the base boundary
        }
        if tri.edge_shared_with_base(he).is_some() {
            continue;
        }
        let tail = tri.conn.tail(he);
        let head = tri.conn.head(he);
        let loc_tail = &tri.locations[tail];
        let loc_head = &tri.locations[head];
        let crossings = tri.edge_crossings(he)?;
        if crossings.is_empty() && on_common_base_edge(bconn, loc_tail, loc_head) {
            continue; // collinear with a base edge; only subdivides it
        }
        let seq: Vec<usize> = crossings.iter().map(|c| c.halfedge).collect();
        let rp = integer::resolve_path(base, loc_tail, loc_head, &seq)?;

        let mut chain = vec![tail];
        for (k, c) in rp.crossings.iter().enumerate() {
            let cb = bconn.canonical(c.halfedge);
            let s = if c.halfedge == cb { c.t } else { 1.0 - c.t };
            let id = if s < SNAP_EPS {
                bconn.tail(cb)
            } else if s > 1.0 - SNAP_EPS {
                bconn.head(cb)
            } else {
                let list = edge_nodes.entry(cb).or_default();
                if let Some(&(_, id)) = list.iter().find(|(x, _)| (x - s).abs() < SNAP_EPS) {
                    id
                } else {
                    let id = points.len();
                    points.push(CommonSubdivisionPoint {
                        on_base: SurfacePoint::Edge { halfedge: cb, t: s },
                        on_intrinsic: SurfacePoint::Edge { halfedge: he, t: rp.along[k] },
                    });
                    list.push((s, id));
                    id
                }
            };
            chain.push(id);
        }
        chain.push(head);

        for k in 0..chain.len() - 1 {
            let f = if k == 0 {
                match seq.first() {
                    Some(&h0) => bconn.half_edges[h0].face.ok_or("crossing a border edge")?,
                    None => trace::common_face(bconn, loc_tail, loc_head)
                        .ok_or("chord endpoints share no base face")?,
                }
            } else {
                let tw = bconn.half_edges[seq[k - 1]].twin;
                bconn.half_edges[tw].face.ok_or("crossing leaves the surface")?
            };
            chords.entry(f).or_default().push((chain[k], chain[k + 1], he));
        }
    }

    // Assemble and cut each base face.
    let mut faces_out: Vec<Vec<usize>> = Vec::new();
    let mut base_face_out: Vec<usize> = Vec::new();
    let mut intrinsic_face_out: Vec<usize> = Vec::new();
    let mut areas_out: Vec<f64> = Vec::new();

    for bf in bconn.live_faces() {
        let layout = base.face_layout(bf);
        let hes = bconn.face_half_edges(bf);
        let vs = bconn.face_vertices(bf);

        let mut local: Vec<(usize, Vector2)> = Vec::new();
        let mut index: HashMap<usize, usize> = HashMap::new();
        let mut add_node = |local: &mut Vec<(usize, Vector2)>,
                            index: &mut HashMap<usize, usize>,
                            global: usize,
                            pos: Vector2| {
            *index.entry(global).or_insert_with(|| {
                local.push((global, pos));
                local.len() - 1
            })
        };

        for i in 0..3 {
            add_node(&mut local, &mut index, vs[i], layout[i]);
        }

        // Boundary sub-segments along each side.
        let mut segments: Vec<(usize, usize, Option<(usize, bool)>)> = Vec::new();
        for j in 0..3 {
            let hj = hes[j];
            let cb = bconn.canonical(hj);
            let mut list: Vec<(f64, usize)> = vec![(0.0, vs[j]), (1.0, vs[(j + 1) % 3])];
            if let Some(nodes) = edge_nodes.get(&cb) {
                for &(s, id) in nodes {
                    let s_local = if hj == cb { s } else { 1.0 - s };
                    list.push((s_local, id));
                }
            }
            list.sort_by(|a, b| a.0.total_cmp(&b.0));
            list.dedup_by_key(|x| x.1);
            for w in 0..list.len() - 1 {
                let (sa, ga) = list[w];
                let (sb, gb) = list[w + 1];
                let pa = layout[j] + (layout[(j + 1) % 3] - layout[j]) * sa;
                let pb = layout[j] + (layout[(j + 1) % 3] - layout[j]) * sb;
                let la = add_node(&mut local, &mut index, ga, pa);
                let lb = add_node(&mut local, &mut index, gb, pb);
                segments.push((la, lb, None));
            }
        }

        if let Some(ids) = interior_nodes.get(&bf) {
            for &v in ids {
                let SurfacePoint::Face { bary, .. } = tri.locations[v] else {
                    return Err("interior node without face coordinates");
                };
                let pos = triangle::from_barycentric(&bary, &layout);
                add_node(&mut local, &mut index, v, pos);
            }
        }

        if let Some(list) = chords.get(&bf) {
            for &(a, b, he) in list {
                let la = *index.get(&a).ok_or("chord endpoint missing from face")?;
                let lb = *index.get(&b).ok_or("chord endpoint missing from face")?;
                segments.push((la, lb, Some((he, true))));
            }
        }

        // Dart walk: faces of the arrangement, interior ones CCW.
        let n_darts = 2 * segments.len();
        let dart_from = |d: usize| {
            let (a, b, _) = segments[d / 2];
            if d % 2 == 0 { a } else { b }
        };
        let dart_to = |d: usize| {
            let (a, b, _) = segments[d / 2];
            if d % 2 == 0 { b } else { a }
        };

        let mut out_darts: Vec<Vec<usize>> = vec![Vec::new(); local.len()];
        for d in 0..n_darts {
            out_darts[dart_from(d)].push(d);
        }
        for (n, darts) in out_darts.iter_mut().enumerate() {
            let p = local[n].1;
            darts.sort_by(|&x, &y| {
                let dx = local[dart_to(x)].1 - p;
                let dy = local[dart_to(y)].1 - p;
                dx.y.atan2(dx.x).total_cmp(&dy.y.atan2(dy.x))
            });
        }

        let next_dart = |d: usize| -> usize {
            let r = d ^ 1;
            let at = dart_from(r);
            let ring = &out_darts[at];
            let pos = ring.iter().position(|&x| x == r).expect("dart registered at its node");
            ring[(pos + ring.len() - 1) % ring.len()]
        };

        let mut visited = vec![false; n_darts];
        for d0 in 0..n_darts {
            if visited[d0] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut d = d0;
            loop {
                visited[d] = true;
                cycle.push(d);
                d = next_dart(d);
                if d == d0 {
                    break;
                }
                if cycle.len() > n_darts {
                    return Err("face walk failed to close");
                }
            }

            let poly_pts: Vec<Vector2> = cycle.iter().map(|&d| local[dart_from(d)].1).collect();
            let area = triangle::polygon_area(&poly_pts);
            if area <= 0.0 {
                continue; // the outer cycle
            }

            let mut intr_face = None;
            for &d in &cycle {
                if let (_, _, Some((he, fwd))) = segments[d / 2] {
                    let he_dir = if (d % 2 == 0) == fwd {
                        he
                    } else {
                        tri.conn.half_edges[he].twin
                    };
                    intr_face = tri.conn.half_edges[he_dir].face;
                    if intr_face.is_some() {
                        break;
                    }
                }
            }
            let intr_face = match intr_face {
                Some(f) => f,
                None => {
                    // Chord-free face: the whole base face sits inside one
                    // intrinsic face; look it up by the wedge holding the
                    // midline of the corner angle at the first corner.
                    let mid =
                        base.direction_of_halfedge(hes[0]) + 0.5 * base.corner_angle[hes[0]];
                    tri.face_containing_direction(vs[0], mid)?
                }
            };

            faces_out.push(cycle.iter().map(|&d| local[dart_from(d)].0).collect());
            base_face_out.push(bf);
            intrinsic_face_out.push(intr_face);
            areas_out.push(area);
        }
    }

    Ok(CommonSubdivision {
        points,
        faces: faces_out,
        base_face: base_face_out,
        intrinsic_face: intrinsic_face_out,
        areas: areas_out,
    })
}
