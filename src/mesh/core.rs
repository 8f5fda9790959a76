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

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::mesh::{face::Face, half_edge::HalfEdge, vertex::Vertex};

/// Result of splitting a face by an interior point: three new faces fan
/// around the new vertex.
#[derive(Debug, Clone)]
pub struct FaceSplit {
    pub vertex: usize,
    /// New faces `(v_i, v_{i+1}, w)`, indexed like the original corners.
    pub faces: [usize; 3],
    /// Half-edges from each original corner to the new vertex.
    pub spokes: [usize; 3],
    /// The original boundary cycle of the split face (still live).
    pub link: [usize; 3],
}

/// Result of splitting a boundary edge at an interior point of the edge.
#[derive(Debug, Clone)]
pub struct EdgeSplit {
    pub vertex: usize,
    pub faces: [usize; 2],
    /// Interior half-edge from the original tail to the new vertex.
    pub he_tail_to_new: usize,
    /// Interior half-edge from the new vertex to the original head.
    pub he_new_to_head: usize,
    /// The new cross edge, oriented from the new vertex to the opposite
    /// corner of the split triangle.
    pub cross: usize,
}

/// Index-arena half-edge connectivity shared by the base surface and the
/// intrinsic triangulation. Elements are addressed by stable indices;
/// removal only tombstones.
///
/// `edge_map` is a construction-time index from directed vertex pairs to
/// half-edges. It is *not* maintained through flips and splits: an evolving
/// intrinsic triangulation is a multigraph (parallel edges and self-edges
/// are legal), which a vertex-pair key cannot represent.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    pub edge_map: HashMap<(usize, usize), usize>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self) -> usize {
        self.vertices.push(Vertex::new());
        self.vertices.len() - 1
    }

    /// Adds a triangle face given three vertex indices in CCW order.
    /// Border half-edges carry `face = None`. Errors on a non-manifold
    /// edge (both directions already bound to faces).
    pub fn add_triangle(&mut self, v0: usize, v1: usize, v2: usize) -> Result<usize, &'static str> {
        if v0 == v1 || v1 == v2 || v2 == v0 {
            return Err("degenerate triangle");
        }
        let edge_vertices = [(v0, v1), (v1, v2), (v2, v0)];

        // A directed edge belongs to at most one face; a second face over
        // the same direction means inconsistent orientation or a
        // non-manifold edge. Refuse before touching any arena state.
        for &(from, to) in &edge_vertices {
            if let Some(&he_idx) = self.edge_map.get(&(from, to)) {
                if self.half_edges[he_idx].face.is_some() {
                    return Err("non-manifold edge: directed edge already bound to a face");
                }
            }
        }

        let face_idx = self.faces.len();
        self.faces.push(Face::new(0));

        let mut edge_indices = [usize::MAX; 3];
        for (i, &(from, to)) in edge_vertices.iter().enumerate() {
            if let Some(&he_idx) = self.edge_map.get(&(from, to)) {
                self.half_edges[he_idx].face = Some(face_idx);
                edge_indices[i] = he_idx;
            } else {
                // Brand-new interior half-edge plus its border twin.
                let he_idx = self.half_edges.len();
                let mut he = HalfEdge::new(to);
                he.face = Some(face_idx);
                self.half_edges.push(he);
                self.edge_map.insert((from, to), he_idx);
                edge_indices[i] = he_idx;

                if let Some(&rev_idx) = self.edge_map.get(&(to, from)) {
                    self.half_edges[he_idx].twin = rev_idx;
                    self.half_edges[rev_idx].twin = he_idx;
                } else {
                    let border_idx = self.half_edges.len();
                    let mut bhe = HalfEdge::new(from);
                    bhe.twin = he_idx;
                    bhe.next = border_idx; // temporary self-loop
                    bhe.prev = border_idx;
                    self.half_edges.push(bhe);
                    self.edge_map.insert((to, from), border_idx);
                    self.half_edges[he_idx].twin = border_idx;
                }
            }
        }

        let [e0, e1, e2] = edge_indices;
        self.half_edges[e0].next = e1;
        self.half_edges[e0].prev = e2;
        self.half_edges[e1].next = e2;
        self.half_edges[e1].prev = e0;
        self.half_edges[e2].next = e0;
        self.half_edges[e2].prev = e1;

        self.vertices[v0].half_edge.get_or_insert(e0);
        self.vertices[v1].half_edge.get_or_insert(e1);
        self.vertices[v2].half_edge.get_or_insert(e2);

        self.faces[face_idx].half_edge = e0;
        Ok(face_idx)
    }

    /// Wire `next`/`prev` along every border loop. Call once after the last
    /// `add_triangle` of an initial construction.
    pub fn build_boundary_loops(&mut self) {
        let m = self.half_edges.len();
        let mut borders = Vec::new();
        for i in 0..m {
            let e = &self.half_edges[i];
            if !e.removed && e.face.is_none() {
                borders.push(i);
            }
        }

        // For each border b = u->v, the next border spoke is found by
        // rotating CCW around v through interior wedges.
        let mut next_of = vec![usize::MAX; m];
        for &b in &borders {
            let t0 = self.half_edges[b].twin;
            let mut t = t0; // interior v->u
            let mut steps = 0usize;
            let b_next = loop {
                let prev_t = self.half_edges[t].prev;
                let cand = self.half_edges[prev_t].twin;
                if self.half_edges[cand].face.is_none() {
                    break cand;
                }
                t = cand;
                steps += 1;
                if steps > m {
                    break b; // degenerate; keep a self-loop
                }
            };
            next_of[b] = b_next;
        }

        for &b in &borders {
            let nb = next_of[b];
            self.half_edges[b].next = nb;
        }
        for &b in &borders {
            let nb = self.half_edges[b].next;
            self.half_edges[nb].prev = b;
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_live_faces(&self) -> usize {
        self.faces.iter().filter(|f| !f.removed).count()
    }

    pub fn live_faces(&self) -> Vec<usize> {
        (0..self.faces.len()).filter(|&f| !self.faces[f].removed).collect()
    }

    /// Canonical half-edge per undirected edge: the smaller index of each
    /// live twin pair.
    pub fn canonical_edges(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for h in 0..self.half_edges.len() {
            let e = &self.half_edges[h];
            if !e.removed && e.twin != usize::MAX && h < e.twin {
                out.push(h);
            }
        }
        out
    }

    pub fn canonical(&self, he: usize) -> usize {
        he.min(self.half_edges[he].twin)
    }

    /// The three half-edges of face `f`, starting at its representative.
    pub fn face_half_edges(&self, f: usize) -> [usize; 3] {
        let h0 = self.faces[f].half_edge;
        let h1 = self.half_edges[h0].next;
        let h2 = self.half_edges[h1].next;
        [h0, h1, h2]
    }

    /// The three corners of face `f`; corner `i` is the tail of the face's
    /// `i`-th half-edge.
    pub fn face_vertices(&self, f: usize) -> [usize; 3] {
        let [h0, h1, h2] = self.face_half_edges(f);
        [self.half_edges[h2].vertex, self.half_edges[h0].vertex, self.half_edges[h1].vertex]
    }

    pub fn tail(&self, he: usize) -> usize {
        self.half_edges[self.half_edges[he].twin].vertex
    }

    pub fn head(&self, he: usize) -> usize {
        self.half_edges[he].vertex
    }

    /// True if either side of the edge is a border.
    pub fn is_boundary_edge(&self, he: usize) -> bool {
        let t = self.half_edges[he].twin;
        self.half_edges[he].face.is_none() || self.half_edges[t].face.is_none()
    }

    /// The half-edge of face `f` whose tail is `v`.
    pub fn face_halfedge_from(&self, f: usize, v: usize) -> Option<usize> {
        let hes = self.face_half_edges(f);
        hes.into_iter().find(|&h| self.tail(h) == v)
    }

    /// Outgoing half-edges at `v` in CCW order. For boundary vertices the
    /// fan starts at the CW-most interior half-edge and ends with the
    /// outgoing border half-edge.
    pub fn outgoing_halfedges(&self, v: usize) -> SmallVec<[usize; 8]> {
        let mut out = SmallVec::new();
        let Some(rep) = self.vertices[v].half_edge else {
            return out;
        };

        // Rotate CW to find the fan start (the half-edge whose CW neighbor
        // would leave the surface).
        let mut start = rep;
        let mut guard = 0usize;
        loop {
            let t = self.half_edges[start].twin;
            if self.half_edges[t].face.is_none() {
                break; // boundary fan start
            }
            let cand = self.half_edges[t].next;
            if cand == rep {
                start = rep; // interior vertex: closed fan
                break;
            }
            start = cand;
            guard += 1;
            if guard > self.half_edges.len() {
                break;
            }
        }

        let mut h = start;
        let mut guard = 0usize;
        loop {
            out.push(h);
            if self.half_edges[h].face.is_none() {
                break; // outgoing border half-edge closes a boundary fan
            }
            let nxt = self.half_edges[self.half_edges[h].prev].twin;
            if nxt == start {
                break;
            }
            h = nxt;
            guard += 1;
            if guard > self.half_edges.len() {
                break;
            }
        }
        out
    }

    /// Flip an interior edge given one of its half-edges. The edge `u-v`
    /// becomes `c-d` where `c`, `d` are the corners opposite the edge. The
    /// two half-edge indices keep identifying the (new) diagonal.
    pub fn flip_edge(&mut self, h: usize) -> Result<(), &'static str> {
        let t = self.half_edges[h].twin;
        if self.half_edges[h].removed {
            return Err("cannot flip a removed edge");
        }
        let Some(f0) = self.half_edges[h].face else {
            return Err("cannot flip a boundary edge");
        };
        let Some(f1) = self.half_edges[t].face else {
            return Err("cannot flip a boundary edge");
        };
        if f0 == f1 {
            return Err("cannot flip an edge with the same face on both sides");
        }

        let hb = self.half_edges[h].next; // v -> c
        let hc = self.half_edges[h].prev; // c -> u
        let he2 = self.half_edges[t].next; // u -> d
        let hf = self.half_edges[t].prev; // d -> v

        let u = self.half_edges[hc].vertex;
        let v = self.half_edges[h].vertex;
        let c = self.half_edges[hb].vertex;
        let d = self.half_edges[he2].vertex;

        // Reassign the diagonal: h becomes c->d, t becomes d->c.
        self.half_edges[h].vertex = d;
        self.half_edges[t].vertex = c;

        // Face f0 becomes (v, c, d) with cycle [hb, h, hf].
        self.half_edges[hb].next = h;
        self.half_edges[h].next = hf;
        self.half_edges[hf].next = hb;
        self.half_edges[hb].prev = hf;
        self.half_edges[h].prev = hb;
        self.half_edges[hf].prev = h;
        self.half_edges[hb].face = Some(f0);
        self.half_edges[h].face = Some(f0);
        self.half_edges[hf].face = Some(f0);
        self.faces[f0].half_edge = hb;

        // Face f1 becomes (u, d, c) with cycle [he2, t, hc].
        self.half_edges[he2].next = t;
        self.half_edges[t].next = hc;
        self.half_edges[hc].next = he2;
        self.half_edges[he2].prev = hc;
        self.half_edges[t].prev = he2;
        self.half_edges[hc].prev = t;
        self.half_edges[he2].face = Some(f1);
        self.half_edges[t].face = Some(f1);
        self.half_edges[hc].face = Some(f1);
        self.faces[f1].half_edge = he2;

        // The old representatives of u and v may have been the flipped
        // diagonal; repoint all four corners at surviving spokes.
        self.vertices[u].half_edge = Some(he2);
        self.vertices[v].half_edge = Some(hb);
        self.vertices[c].half_edge = Some(h);
        self.vertices[d].half_edge = Some(hf);

        Ok(())
    }

    /// Split face `f` with a new vertex in its interior, producing a fan of
    /// three faces `(v_i, v_{i+1}, w)`.
    pub fn split_face(&mut self, f: usize) -> Result<FaceSplit, &'static str> {
        if self.faces[f].removed {
            return Err("cannot split a removed face");
        }
        let link = self.face_half_edges(f);
        let corners = self.face_vertices(f);

        let w = self.add_vertex();
        let base_he = self.half_edges.len();
        let base_f = self.faces.len();

        // For each i: a_i = v_{i+1} -> w, b_i = w -> v_i.
        for i in 0..3 {
            let nf = base_f + i;
            let a_i = base_he + 2 * i;
            let b_i = base_he + 2 * i + 1;
            let mut a = HalfEdge::new(w);
            a.face = Some(nf);
            self.half_edges.push(a);
            let mut b = HalfEdge::new(corners[i]);
            b.face = Some(nf);
            self.half_edges.push(b);

            let h_i = link[i];
            self.half_edges[h_i].face = Some(nf);
            self.half_edges[h_i].next = a_i;
            self.half_edges[h_i].prev = b_i;
            self.half_edges[a_i].next = b_i;
            self.half_edges[a_i].prev = h_i;
            self.half_edges[b_i].next = h_i;
            self.half_edges[b_i].prev = a_i;
            self.faces.push(Face::new(h_i));
        }

        // a_i reverses b_{i+1}: (v_{i+1} -> w) versus (w -> v_{i+1}).
        for i in 0..3 {
            let a_i = base_he + 2 * i;
            let b_n = base_he + 2 * ((i + 1) % 3) + 1;
            self.half_edges[a_i].twin = b_n;
            self.half_edges[b_n].twin = a_i;
        }

        self.faces[f].removed = true;
        self.vertices[w].half_edge = Some(base_he + 1); // w -> v_0

        // Spoke from corner v_i to w is a_{i+2}.
        let spokes = [base_he + 2 * 2, base_he, base_he + 2];
        Ok(FaceSplit { vertex: w, faces: [base_f, base_f + 1, base_f + 2], spokes, link })
    }

    /// Split a boundary edge. `h` must be the interior half-edge of the
    /// edge (its twin is a border). The incident triangle `(x, y, z)` with
    /// `h: x->y` becomes `(x, w, z)` and `(w, y, z)`.
    pub fn split_boundary_edge(&mut self, h: usize) -> Result<EdgeSplit, &'static str> {
        let b = self.half_edges[h].twin;
        let Some(f) = self.half_edges[h].face else {
            return Err("expected the interior half-edge of the boundary edge");
        };
        if self.half_edges[b].face.is_some() {
            return Err("not a boundary edge");
        }

        let hn = self.half_edges[h].next; // y -> z
        let hp = self.half_edges[h].prev; // z -> x
        let y = self.half_edges[h].vertex;
        let z = self.half_edges[hn].vertex;

        let w = self.add_vertex();
        let n0 = self.half_edges.len(); // w -> z
        let n1 = n0 + 1; // z -> w
        let n2 = n0 + 2; // w -> y
        let n3 = n0 + 3; // y -> w (border)
        self.half_edges.push(HalfEdge::new(z));
        self.half_edges.push(HalfEdge::new(w));
        self.half_edges.push(HalfEdge::new(y));
        self.half_edges.push(HalfEdge::new(w));

        let fa = self.faces.len();
        let fb = fa + 1;

        // Face A = (x, w, z): cycle [h (x->w), n0, hp].
        self.half_edges[h].vertex = w;
        self.half_edges[h].face = Some(fa);
        self.half_edges[n0].face = Some(fa);
        self.half_edges[hp].face = Some(fa);
        self.half_edges[h].next = n0;
        self.half_edges[n0].next = hp;
        self.half_edges[hp].next = h;
        self.half_edges[h].prev = hp;
        self.half_edges[n0].prev = h;
        self.half_edges[hp].prev = n0;
        self.faces.push(Face::new(h));

        // Face B = (w, y, z): cycle [n2, hn, n1].
        self.half_edges[n2].face = Some(fb);
        self.half_edges[hn].face = Some(fb);
        self.half_edges[n1].face = Some(fb);
        self.half_edges[n2].next = hn;
        self.half_edges[hn].next = n1;
        self.half_edges[n1].next = n2;
        self.half_edges[n2].prev = n1;
        self.half_edges[hn].prev = n2;
        self.half_edges[n1].prev = hn;
        self.faces.push(Face::new(n2));

        self.half_edges[n0].twin = n1;
        self.half_edges[n1].twin = n0;
        self.half_edges[n2].twin = n3;
        self.half_edges[n3].twin = n2;

        // Splice the new border half-edge y->w into the boundary loop, and
        // shorten the old border to w->x.
        let prev_b = self.half_edges[b].prev;
        self.half_edges[n3].prev = prev_b;
        self.half_edges[prev_b].next = n3;
        self.half_edges[n3].next = b;
        self.half_edges[b].prev = n3;

        self.faces[f].removed = true;
        self.vertices[w].half_edge = Some(n0);
        self.vertices[y].half_edge = Some(hn);

        Ok(EdgeSplit { vertex: w, faces: [fa, fb], he_tail_to_new: h, he_new_to_head: n2, cross: n0 })
    }
}
