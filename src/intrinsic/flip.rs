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

//! Greedy edge flipping to the intrinsic Delaunay triangulation. The
//! classic result: flipping any non-Delaunay edge strictly decreases a
//! global energy, so the queue always terminates on a valid metric.

use std::collections::VecDeque;

use crate::intrinsic::tri::IntrinsicTriangulation;

impl<'a> IntrinsicTriangulation<'a> {
    /// Flip edges until every edge satisfies the intrinsic Delaunay
    /// condition. Returns the number of flips performed.
    pub fn flip_to_delaunay(&mut self) -> Result<usize, &'static str> {
        let seeds = self.conn.canonical_edges();
        let (flips, _) = self.flip_region(seeds)?;
        Ok(flips)
    }

    /// Flip-to-Delaunay restricted to a seed set, propagating outward to
    /// neighbors of every flipped edge. Returns the flip count and the
    /// faces adjacent to any flipped edge.
    pub(crate) fn flip_region(
        &mut self,
        seeds: Vec<usize>,
    ) -> Result<(usize, Vec<usize>), &'static str> {
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut in_queue = vec![false; self.conn.half_edges.len()];
        for h in seeds {
            let c = self.conn.canonical(h);
            if !in_queue[c] {
                in_queue[c] = true;
                queue.push_back(c);
            }
        }

        let mut flips = 0usize;
        let mut touched = Vec::new();
        let budget = 100 * self.conn.half_edges.len() + 1000;
        let mut steps = 0usize;
        while let Some(h) = queue.pop_front() {
            in_queue[h] = false;
            steps += 1;
            if steps > budget {
                return Err("flip budget exhausted; the metric may be degenerate");
            }
            if self.conn.half_edges[h].removed || self.is_edge_delaunay(h) {
                continue;
            }
            if !self.try_flip_edge(h)? {
                continue;
            }
            flips += 1;

            let t = self.conn.half_edges[h].twin;
            if let Some(f) = self.conn.half_edges[h].face {
                touched.push(f);
            }
            if let Some(f) = self.conn.half_edges[t].face {
                touched.push(f);
            }
            let sides = [
                self.conn.half_edges[h].next,
                self.conn.half_edges[h].prev,
                self.conn.half_edges[t].next,
                self.conn.half_edges[t].prev,
            ];
            for s in sides {
                let c = self.conn.canonical(s);
                if !in_queue[c] {
                    in_queue[c] = true;
                    queue.push_back(c);
                }
            }
        }
        Ok((flips, touched))
    }
}
