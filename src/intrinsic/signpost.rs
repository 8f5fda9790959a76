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

//! Signpost backend state: each intrinsic half-edge stores the tangent
//! angle of its launch direction at its tail. Original base vertices use
//! raw fan angles (CCW from the vertex's reference half-edge); inserted
//! vertices use plain angles in the canonical frame of the base face that
//! contains them.

use crate::intrinsic::trace;
use crate::mesh::{BaseSurface, Connectivity};

#[derive(Debug, Clone, Default)]
pub struct SignpostData {
    /// Tangent angle at the tail of each intrinsic half-edge. Zero for
    /// border half-edges, which are never traced.
    pub direction: Vec<f64>,
}

impl SignpostData {
    /// Initial signposts for a triangulation that still coincides with the
    /// base surface.
    pub fn init(base: &BaseSurface) -> Self {
        let m = base.conn.half_edges.len();
        let mut direction = vec![0.0; m];
        for (he, slot) in direction.iter_mut().enumerate() {
            if base.conn.half_edges[he].face.is_some() {
                *slot = base.direction_of_halfedge(he);
            }
        }
        Self { direction }
    }

    /// Re-aim the two half-edges of a freshly flipped diagonal. Must run
    /// after connectivity and lengths are updated; reads the signpost of
    /// each diagonal half-edge's CW fan neighbor and adds the (new) wedge
    /// angle between them.
    pub fn after_flip(
        &mut self,
        conn: &Connectivity,
        lengths: &[f64],
        angle_sums: &[f64],
        h: usize,
    ) {
        let t = conn.half_edges[h].twin;
        for &(he, cw) in &[(h, conn.half_edges[t].next), (t, conn.half_edges[h].next)] {
            let v = conn.tail(he);
            let a = self.direction[cw] + trace::corner_angle(conn, lengths, cw);
            self.direction[he] = a % angle_sums[v];
        }
    }
}
