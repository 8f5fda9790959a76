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

//! Plain-text matrix dumps. Dense files carry a `rows cols` header followed
//! by one whitespace-separated row per line; sparse files carry a
//! `rows cols nnz` header followed by `row col value` triplets.

use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{
    geometry::vector3::Vector3,
    matrix::sparse::{DenseMatrix, SparseMatrix},
};

/// Write fixed-width rows (face index or length arrays, for instance).
pub fn write_dense_rows<T: Display, const N: usize, P: AsRef<Path>>(
    rows: &[[T; N]],
    path: P,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{} {}", rows.len(), N)?;
    for row in rows {
        for (k, v) in row.iter().enumerate() {
            if k > 0 {
                write!(out, " ")?;
            }
            write!(out, "{v}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Write a dense matrix with a `rows cols` header, one row per line.
pub fn write_dense_matrix<P: AsRef<Path>>(m: &DenseMatrix<f64>, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{} {}", m.n_rows, m.n_cols)?;
    for r in 0..m.n_rows {
        for (k, v) in m.row(r).iter().enumerate() {
            if k > 0 {
                write!(out, " ")?;
            }
            write!(out, "{v}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Write 3D positions as a dense matrix with one point per row.
pub fn write_positions<P: AsRef<Path>>(positions: &[Vector3], path: P) -> io::Result<()> {
    let rows: Vec<[f64; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();
    write_dense_rows(&rows, path)
}

/// Write a sparse matrix as triplets with 0-based indices.
pub fn write_sparse_matrix<P: AsRef<Path>>(m: &SparseMatrix, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{} {} {}", m.n_rows, m.n_cols, m.nnz())?;
    for (r, c, v) in m.to_triplets() {
        writeln!(out, "{r} {c} {v}")?;
    }
    out.flush()
}
