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

use num_traits::Float;

/// Row-major compressed sparse matrix over `f64`.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    pub row_ptr: Vec<usize>,
    pub col_idx: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseMatrix {
    /// Build from (row, col, value) triplets; duplicate entries sum.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self, &'static str> {
        for &(r, c, _) in triplets {
            if r >= n_rows || c >= n_cols {
                return Err("triplet index out of bounds");
            }
        }
        let mut sorted: Vec<(usize, usize, f64)> = triplets.to_vec();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut merged: Vec<(usize, usize, f64)> = Vec::with_capacity(sorted.len());
        for (r, c, v) in sorted {
            match merged.last_mut() {
                Some(last) if last.0 == r && last.1 == c => last.2 += v,
                _ => merged.push((r, c, v)),
            }
        }

        let mut row_ptr = vec![0usize; n_rows + 1];
        for &(r, _, _) in &merged {
            row_ptr[r + 1] += 1;
        }
        for r in 0..n_rows {
            row_ptr[r + 1] += row_ptr[r];
        }
        let col_idx = merged.iter().map(|&(_, c, _)| c).collect();
        let values = merged.iter().map(|&(_, _, v)| v).collect();
        Ok(Self { n_rows, n_cols, row_ptr, col_idx, values })
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entries of row `r` as (col, value) pairs.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    pub fn to_triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut out = Vec::with_capacity(self.nnz());
        for r in 0..self.n_rows {
            for (c, v) in self.row(r) {
                out.push((r, c, v));
            }
        }
        out
    }

    pub fn transpose(&self) -> SparseMatrix {
        let triplets: Vec<(usize, usize, f64)> =
            self.to_triplets().into_iter().map(|(r, c, v)| (c, r, v)).collect();
        SparseMatrix::from_triplets(self.n_cols, self.n_rows, &triplets)
            .expect("transposed indices stay in bounds")
    }

    /// Sparse-sparse product `self * other`.
    pub fn multiply(&self, other: &SparseMatrix) -> Result<SparseMatrix, &'static str> {
        if self.n_cols != other.n_rows {
            return Err("matrix dimensions do not match");
        }
        let mut triplets = Vec::new();
        let mut acc: Vec<f64> = vec![0.0; other.n_cols];
        let mut marked: Vec<usize> = Vec::new();
        for r in 0..self.n_rows {
            for (k, v) in self.row(r) {
                for (c, w) in other.row(k) {
                    if acc[c] == 0.0 {
                        marked.push(c);
                    }
                    acc[c] += v * w;
                }
            }
            for &c in &marked {
                triplets.push((r, c, acc[c]));
                acc[c] = 0.0;
            }
            marked.clear();
        }
        SparseMatrix::from_triplets(self.n_rows, other.n_cols, &triplets)
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, &'static str> {
        if x.len() != self.n_cols {
            return Err("vector length does not match matrix columns");
        }
        let mut y = vec![0.0; self.n_rows];
        for (r, slot) in y.iter_mut().enumerate() {
            *slot = self.row(r).map(|(c, v)| v * x[c]).sum();
        }
        Ok(y)
    }

    /// Square diagonal matrix from its entries.
    pub fn diagonal(entries: &[f64]) -> SparseMatrix {
        let triplets: Vec<(usize, usize, f64)> =
            entries.iter().enumerate().map(|(i, &v)| (i, i, v)).collect();
        SparseMatrix::from_triplets(entries.len(), entries.len(), &triplets)
            .expect("diagonal indices stay in bounds")
    }
}

/// Small dense row-major matrix, generic over the float type.
#[derive(Debug, Clone)]
pub struct DenseMatrix<T: Float> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub data: Vec<T>,
}

impl<T: Float> DenseMatrix<T> {
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self { n_rows, n_cols, data: vec![T::zero(); n_rows * n_cols] }
    }

    pub fn get(&self, r: usize, c: usize) -> T {
        self.data[r * self.n_cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: T) {
        self.data[r * self.n_cols + c] = v;
    }

    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.n_cols..(r + 1) * self.n_cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplets_sum_and_order() {
        let m = SparseMatrix::from_triplets(
            2,
            3,
            &[(1, 2, 4.0), (0, 0, 1.0), (1, 2, -1.0), (0, 2, 2.0)],
        )
        .unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.to_triplets(), vec![(0, 0, 1.0), (0, 2, 2.0), (1, 2, 3.0)]);
    }

    #[test]
    fn transpose_multiply_roundtrip() {
        let a = SparseMatrix::from_triplets(2, 2, &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 3.0)])
            .unwrap();
        let at = a.transpose();
        let g = at.multiply(&a).unwrap();
        // A^T A = [[4, 2], [2, 10]]
        assert_eq!(g.to_triplets(), vec![(0, 0, 4.0), (0, 1, 2.0), (1, 0, 2.0), (1, 1, 10.0)]);
    }

    #[test]
    fn mul_vec_matches_rows() {
        let a = SparseMatrix::from_triplets(2, 2, &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 3.0)])
            .unwrap();
        let y = a.mul_vec(&[1.0, 2.0]).unwrap();
        assert_eq!(y, vec![4.0, 6.0]);
    }
}
