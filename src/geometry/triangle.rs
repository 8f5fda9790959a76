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

//! Triangle computations driven purely by edge lengths. The intrinsic
//! triangulation never sees 3D coordinates, so every angle, area, and
//! circumcenter here is derived from the metric alone.

use crate::geometry::vector2::Vector2;

/// Interior angle opposite side `a` in a triangle with sides `a`, `b`, `c`
/// (law of cosines, clamped against roundoff on near-degenerate triangles).
pub fn angle_opposite(a: f64, b: f64, c: f64) -> f64 {
    let q = (b * b + c * c - a * a) / (2.0 * b * c);
    q.clamp(-1.0, 1.0).acos()
}

/// Cotangent of the interior angle opposite side `a`, computed without
/// trigonometric functions: cot = (b^2 + c^2 - a^2) / (4 * area).
pub fn cot_angle_opposite(a: f64, b: f64, c: f64) -> f64 {
    let area = area_from_lengths(a, b, c);
    if area <= 0.0 {
        return 0.0;
    }
    (b * b + c * c - a * a) / (4.0 * area)
}

/// Triangle area from side lengths, using Kahan's numerically stable
/// reordering of Heron's formula.
pub fn area_from_lengths(a: f64, b: f64, c: f64) -> f64 {
    // Sort so that a >= b >= c.
    let mut s = [a, b, c];
    s.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    let (a, b, c) = (s[0], s[1], s[2]);
    let t = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    if t <= 0.0 {
        return 0.0;
    }
    0.25 * t.sqrt()
}

/// Circumradius from side lengths; infinity for degenerate triangles.
pub fn circumradius_from_lengths(a: f64, b: f64, c: f64) -> f64 {
    let area = area_from_lengths(a, b, c);
    if area <= 0.0 {
        return f64::INFINITY;
    }
    (a * b * c) / (4.0 * area)
}

/// Smallest interior angle from side lengths.
pub fn min_angle_from_lengths(a: f64, b: f64, c: f64) -> f64 {
    // The smallest angle is opposite the shortest side.
    let m = a.min(b).min(c);
    if m == a {
        angle_opposite(a, b, c)
    } else if m == b {
        angle_opposite(b, c, a)
    } else {
        angle_opposite(c, a, b)
    }
}

/// Lay a triangle out in the plane from its side lengths: vertex 0 at the
/// origin, vertex 1 on the positive x-axis, vertex 2 in the upper half plane.
/// `l01`, `l12`, `l20` are the lengths of sides (0,1), (1,2), (2,0).
pub fn layout_from_lengths(l01: f64, l12: f64, l20: f64) -> [Vector2; 3] {
    let p0 = Vector2::zero();
    let p1 = Vector2::new(l01, 0.0);
    // Angle at vertex 0 is opposite side (1,2).
    let theta = angle_opposite(l12, l01, l20);
    let p2 = Vector2::new(l20 * theta.cos(), l20 * theta.sin());
    [p0, p1, p2]
}

/// Circumcenter of a planar triangle.
pub fn circumcenter(p: &[Vector2; 3]) -> Vector2 {
    let d0 = p[1] - p[0];
    let d1 = p[2] - p[0];
    let denom = 2.0 * d0.cross(&d1);
    if denom.abs() < f64::MIN_POSITIVE {
        // Degenerate; fall back to the centroid.
        return (p[0] + p[1] + p[2]) / 3.0;
    }
    let n0 = d0.norm2();
    let n1 = d1.norm2();
    let ux = (d1.y * n0 - d0.y * n1) / denom;
    let uy = (d0.x * n1 - d1.x * n0) / denom;
    p[0] + Vector2::new(ux, uy)
}

/// Barycentric coordinates of `q` with respect to triangle `p`.
pub fn barycentric(q: &Vector2, p: &[Vector2; 3]) -> [f64; 3] {
    let total = (p[1] - p[0]).cross(&(p[2] - p[0]));
    if total.abs() < f64::MIN_POSITIVE {
        return [1.0 / 3.0; 3];
    }
    let w0 = (p[1] - *q).cross(&(p[2] - *q)) / total;
    let w1 = (p[2] - *q).cross(&(p[0] - *q)) / total;
    let w2 = 1.0 - w0 - w1;
    [w0, w1, w2]
}

/// Point at barycentric coordinates `w` in triangle `p`.
pub fn from_barycentric(w: &[f64; 3], p: &[Vector2; 3]) -> Vector2 {
    p[0] * w[0] + p[1] * w[1] + p[2] * w[2]
}

/// Signed area of a simple polygon (shoelace).
pub fn polygon_area(points: &[Vector2]) -> f64 {
    let n = points.len();
    let mut twice = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += points[i].cross(&points[j]);
    }
    0.5 * twice
}
