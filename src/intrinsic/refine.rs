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

//! Intrinsic Delaunay refinement: insert circumcenters of poor-quality
//! triangles (worst first) and restore the Delaunay property locally after
//! each insertion. Circumcenter walks that run off the surface split the
//! boundary edge they hit at its midpoint instead.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::{PI, TAU};

use crate::geometry::triangle;
use crate::intrinsic::trace;
use crate::intrinsic::tri::IntrinsicTriangulation;
use crate::mesh::SurfacePoint;

#[derive(Debug, Clone, Copy)]
pub struct RefineOptions {
    /// Faces with a smaller corner angle get refined. Corners at cone
    /// vertices whose total angle is below the bound are irreducibly small
    /// and exempt.
    pub min_angle_degrees: f64,
    /// Faces with a larger intrinsic circumradius get refined.
    pub max_circumradius: f64,
    /// Hard cap on vertex insertions; `None` leaves only the internal
    /// runaway guard.
    pub max_insertions: Option<usize>,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            min_angle_degrees: 25.0,
            max_circumradius: f64::INFINITY,
            max_insertions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RefineReport {
    pub insertions: usize,
    pub flips: usize,
    /// True when refinement stopped because it hit the insertion cap.
    pub hit_insertion_cap: bool,
    /// True when refinement stopped at the internal runaway guard. The
    /// triangulation is still valid, just not fully refined.
    pub hit_safety_limit: bool,
}

/// Max-heap entry: worst face (largest circumradius) first.
#[derive(Debug, Clone, Copy)]
struct BadFace {
    priority: f64,
    face: usize,
}

impl PartialEq for BadFace {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for BadFace {}
impl PartialOrd for BadFace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for BadFace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.face.cmp(&other.face))
    }
}

impl<'a> IntrinsicTriangulation<'a> {
    /// A vertex where the surface is metrically flat, so small angles
    /// around it can actually be improved by refinement. Inserted vertices
    /// are always flat; base vertices are checked against their cone angle.
    pub fn vertex_is_flat(&self, v: usize) -> bool {
        if v >= self.base.n_vertices() {
            return true;
        }
        let target = if self.base.is_boundary_vertex(v) { PI } else { TAU };
        (self.vertex_angle_sum[v] - target).abs() < 1e-5
    }

    /// A corner at `v` can only reach `threshold` if the total angle at
    /// `v` does; corners at sharper cones are irreducibly small and not
    /// worth refining against.
    fn vertex_supports_angle(&self, v: usize, threshold: f64) -> bool {
        if v >= self.base.n_vertices() {
            return true;
        }
        self.vertex_angle_sum[v] >= threshold
    }

    fn face_circumradius(&self, f: usize) -> f64 {
        let [l0, l1, l2] = self.face_lengths(f);
        triangle::circumradius_from_lengths(l0, l1, l2)
    }

    fn needs_refinement(&self, f: usize, opts: &RefineOptions) -> bool {
        if self.conn.faces[f].removed {
            return false;
        }
        if self.face_circumradius(f) > opts.max_circumradius {
            return true;
        }
        let threshold = opts.min_angle_degrees.to_radians();
        // A corner above pi - 2*threshold forces an under-threshold corner
        // elsewhere in the face; splitting it helps even when the small
        // corners sit at exempt cones (the needle case).
        let obtuse_cap = PI - 2.0 * threshold;
        self.conn.face_half_edges(f).into_iter().any(|h| {
            if !self.vertex_supports_angle(self.conn.tail(h), threshold) {
                return false;
            }
            let a = self.corner_angle(h);
            a < threshold || a > obtuse_cap
        })
    }

    /// Delaunay refinement. Starts from the intrinsic Delaunay
    /// triangulation, then repeatedly inserts the circumcenter of the worst
    /// remaining face and re-establishes the Delaunay property around it.
    pub fn delaunay_refine(&mut self, opts: &RefineOptions) -> Result<RefineReport, &'static str> {
        let mut report = RefineReport { flips: self.flip_to_delaunay()?, ..Default::default() };

        let mut heap = BinaryHeap::new();
        for f in self.conn.live_faces() {
            if self.needs_refinement(f, opts) {
                heap.push(BadFace { priority: self.face_circumradius(f), face: f });
            }
        }

        let cap = opts.max_insertions.unwrap_or(usize::MAX);
        let runaway = 50 * self.base.n_faces() + 1000;

        while let Some(BadFace { face: f, .. }) = heap.pop() {
            if !self.needs_refinement(f, opts) {
                continue; // stale entry
            }
            if report.insertions >= cap {
                report.hit_insertion_cap = true;
                break;
            }
            if report.insertions >= runaway {
                report.hit_safety_limit = true;
                break;
            }

            let Some(w) = self.insert_circumcenter(f)? else {
                continue; // unresolvable face; leave it
            };
            report.insertions += 1;

            // Local Delaunay repair seeded at the new vertex's star.
            let mut seeds = Vec::new();
            for &h in self.conn.outgoing_halfedges(w).iter() {
                seeds.push(h);
                if self.conn.half_edges[h].face.is_some() {
                    seeds.push(self.conn.half_edges[h].next);
                }
            }
            let (flips, mut touched) = self.flip_region(seeds)?;
            report.flips += flips;

            for &h in self.conn.outgoing_halfedges(w).iter() {
                if let Some(f) = self.conn.half_edges[h].face {
                    touched.push(f);
                }
            }
            for f in touched {
                if self.needs_refinement(f, opts) {
                    heap.push(BadFace { priority: self.face_circumradius(f), face: f });
                }
            }
        }
        Ok(report)
    }

    /// Insert the intrinsic circumcenter of face `f`, walking from the
    /// barycenter toward it across intrinsic faces. Returns the inserted
    /// vertex, or `None` when the target cannot be realized (it lands on an
    /// existing vertex).
    fn insert_circumcenter(&mut self, f: usize) -> Result<Option<usize>, &'static str> {
        let layout = self.face_layout(f);
        let cc = triangle::circumcenter(&layout);
        let bc = (layout[0] + layout[1] + layout[2]) / 3.0;
        let offset = cc - bc;
        let dist = offset.norm();

        let target = if dist < 1e-14 {
            SurfacePoint::Face { face: f, bary: [1.0 / 3.0; 3] }
        } else {
            let tr = trace::trace_in_face(
                &self.conn,
                &self.edge_length,
                f,
                bc,
                offset / dist,
                dist,
            );
            if tr.stopped_at_boundary {
                // Chew-style fallback: split the boundary edge we ran into
                // at its midpoint.
                let SurfacePoint::Edge { halfedge, .. } = tr.end else {
                    return Err("boundary stop without a boundary edge");
                };
                let w = self.split_boundary_edge(halfedge, 0.5)?;
                return Ok(Some(w));
            }
            tr.end
        };

        match target {
            SurfacePoint::Vertex(_) => Ok(None),
            other => {
                let (tf, bary) = other.in_some_face(&self.conn);
                // Nudge strictly inside so the star split stays valid.
                let mut b = bary;
                for x in b.iter_mut() {
                    *x = x.max(1e-6);
                }
                let sum: f64 = b.iter().sum();
                for x in b.iter_mut() {
                    *x /= sum;
                }
                match self.insert_vertex(tf, b) {
                    Ok(w) => Ok(Some(w)),
                    Err(_) => Ok(None),
                }
            }
        }
    }
}
