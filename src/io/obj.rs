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

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    geometry::vector3::Vector3,
    intrinsic::subdivision::CommonSubdivision,
    mesh::BaseSurface,
};

pub fn write_obj<P: AsRef<Path>>(base: &BaseSurface, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    // 1) write vertices
    for p in &base.positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }

    // 2) write faces (1-based indices)
    for f in 0..base.conn.faces.len() {
        if base.conn.faces[f].removed {
            continue; // skip removed faces
        }
        let vs = base.conn.face_vertices(f);
        // OBJ is 1-based
        writeln!(out, "f {} {} {}", vs[0] + 1, vs[1] + 1, vs[2] + 1)?;
    }

    out.flush()
}

/// Write the common subdivision as a polygon mesh, with subdivision points
/// sampled on the base surface.
pub fn write_subdivision_obj<P: AsRef<Path>>(
    cs: &CommonSubdivision,
    base: &BaseSurface,
    path: P,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    for p in cs.sample_vertex_positions(base) {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for poly in &cs.faces {
        write!(out, "f")?;
        for &v in poly {
            write!(out, " {}", v + 1)?;
        }
        writeln!(out)?;
    }

    out.flush()
}

/// Read a surface from a Wavefront OBJ file.
/// Only supports `v x y z` and `f ...` lines; ignores others. Polygon faces
/// are fan-triangulated and `a/b/c` index forms keep their position index.
pub fn read_obj<P: AsRef<Path>>(path: P) -> io::Result<BaseSurface> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut positions: Vec<Vector3> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for line in reader.lines() {
        let l = line?;
        let mut parts = l.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coord = |p: Option<&str>| -> io::Result<f64> {
                    p.and_then(|s| s.parse().ok())
                        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad v line"))
                };
                let x = coord(parts.next())?;
                let y = coord(parts.next())?;
                let z = coord(parts.next())?;
                positions.push(Vector3::new(x, y, z));
            }
            Some("f") => {
                // 1-based OBJ indices; take the position index before any '/'
                let mut corners = Vec::new();
                for token in parts {
                    let head = token.split('/').next().unwrap_or(token);
                    let i: usize = head.parse().map_err(|_| {
                        io::Error::new(io::ErrorKind::InvalidData, "bad f line")
                    })?;
                    corners.push(i - 1);
                }
                if corners.len() < 3 {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "face too small"));
                }
                for k in 1..corners.len() - 1 {
                    faces.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {
                // ignore comments, normals, etc.
            }
        }
    }

    BaseSurface::from_face_list(positions, &faces)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
