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

//! Exact rational fallbacks for sign decisions that floating point cannot
//! settle. Inputs are converted to `rug::Rational` losslessly, so the signs
//! returned here are exact for the given `f64` lengths.

use std::cmp::Ordering;

use rug::Rational;

fn rat(x: f64) -> Rational {
    Rational::from_f64(x).unwrap_or_else(|| Rational::new())
}

/// Exact sign of `cos(alpha) + cos(beta)` for the two angles opposite a
/// shared edge of length `a`, where one triangle has remaining sides
/// `(b, c)` and the other `(d, e)`.
///
/// With the law of cosines, `cos(alpha) = (b^2 + c^2 - a^2) / (2 b c)` and
/// similarly for `beta`; clearing the (positive) denominators leaves
/// `(b^2 + c^2 - a^2) d e + (d^2 + e^2 - a^2) b c`, whose sign equals the
/// sign of the sum. `Ordering::Less` means the edge violates the Delaunay
/// condition and should flip.
pub fn delaunay_cos_sum_sign(a: f64, b: f64, c: f64, d: f64, e: f64) -> Ordering {
    let (a, b, c, d, e) = (rat(a), rat(b), rat(c), rat(d), rat(e));
    let a2 = Rational::from(&a * &a);
    let lhs = (Rational::from(&b * &b) + Rational::from(&c * &c) - &a2)
        * Rational::from(&d * &e);
    let rhs = (Rational::from(&d * &d) + Rational::from(&e * &e) - &a2)
        * Rational::from(&b * &c);
    let sum = lhs + rhs;
    sum.cmp0()
}
