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

//! Intrinsic triangulations over a fixed base surface.
//!
//! A base surface is a manifold triangle mesh with vertex positions. An
//! [`IntrinsicTriangulation`] is a second triangulation of the same surface,
//! described only by its connectivity and intrinsic edge lengths, whose
//! vertices live at [`SurfacePoint`]s of the base. Edges can be flipped to
//! the intrinsic Delaunay configuration, new vertices inserted by Delaunay
//! refinement, intrinsic edges traced out as geodesic paths over the base
//! faces, and the common subdivision of the two triangulations extracted to
//! move piecewise-linear data between them.

pub mod geometry;
pub mod intrinsic;
pub mod io;
pub mod matrix;
pub mod mesh;
pub mod numeric;

pub use intrinsic::{Backend, CommonSubdivision, IntrinsicTriangulation, RefineOptions};
pub use mesh::{BaseSurface, Connectivity, SurfacePoint};
