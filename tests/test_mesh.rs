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

use intri::mesh::Connectivity;

/// Two triangles glued along (0, 1), with vertex 2 above and 3 below.
fn quad() -> Connectivity {
    let mut conn = Connectivity::new();
    for _ in 0..4 {
        conn.add_vertex();
    }
    conn.add_triangle(0, 1, 2).unwrap();
    conn.add_triangle(1, 0, 3).unwrap();
    conn.build_boundary_loops();
    conn
}

fn tetrahedron() -> Connectivity {
    let mut conn = Connectivity::new();
    for _ in 0..4 {
        conn.add_vertex();
    }
    for [a, b, c] in [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]] {
        conn.add_triangle(a, b, c).unwrap();
    }
    conn.build_boundary_loops();
    conn
}

#[test]
fn test_add_triangle_cycles() {
    let mut conn = Connectivity::new();
    for _ in 0..3 {
        conn.add_vertex();
    }
    let f = conn.add_triangle(0, 1, 2).unwrap();
    conn.build_boundary_loops();

    let [h0, h1, h2] = conn.face_half_edges(f);
    assert_eq!(conn.half_edges[h0].next, h1);
    assert_eq!(conn.half_edges[h1].next, h2);
    assert_eq!(conn.half_edges[h2].next, h0);
    assert_eq!(conn.half_edges[h0].prev, h2);
    assert_eq!(conn.face_vertices(f), [0, 1, 2]);

    // one border loop of length 3
    let b = conn.half_edges[h0].twin;
    assert!(conn.half_edges[b].face.is_none());
    let mut n = 0;
    let mut cur = b;
    loop {
        cur = conn.half_edges[cur].next;
        n += 1;
        if cur == b {
            break;
        }
    }
    assert_eq!(n, 3);
}

#[test]
fn test_non_manifold_edge_rejected() {
    let mut conn = Connectivity::new();
    for _ in 0..4 {
        conn.add_vertex();
    }
    let f = conn.add_triangle(0, 1, 2).unwrap();
    // same directed edge (0,1) again: inconsistent orientation
    assert!(conn.add_triangle(0, 1, 3).is_err());
    // opposite direction but a third face over edge {1,2}
    conn.add_triangle(2, 1, 3).unwrap();
    assert!(conn.add_triangle(1, 2, 3).is_err());

    // the rejected faces leave no trace and the arena stays consistent
    conn.build_boundary_loops();
    assert_eq!(conn.n_live_faces(), 2);
    assert_eq!(conn.face_vertices(f), [0, 1, 2]);
    for h in 0..conn.half_edges.len() {
        assert_eq!(conn.head(h), conn.tail(conn.half_edges[h].next));
    }
}

#[test]
fn test_boundary_loop_of_quad() {
    let conn = quad();
    assert_eq!(conn.n_live_faces(), 2);
    assert_eq!(conn.half_edges.len(), 10); // 6 interior + 4 border

    let b = (0..conn.half_edges.len())
        .find(|&h| conn.half_edges[h].face.is_none())
        .unwrap();
    let mut cycle = vec![b];
    let mut cur = conn.half_edges[b].next;
    while cur != b {
        cycle.push(cur);
        cur = conn.half_edges[cur].next;
    }
    assert_eq!(cycle.len(), 4);
    for &h in &cycle {
        assert!(conn.half_edges[h].face.is_none());
        // border next follows the boundary head to tail
        assert_eq!(conn.head(h), conn.tail(conn.half_edges[h].next));
    }
}

#[test]
fn test_flip_edge_rewires_quad() {
    let mut conn = quad();
    let h = conn
        .canonical_edges()
        .into_iter()
        .find(|&h| !conn.is_boundary_edge(h))
        .unwrap();
    assert_eq!((conn.tail(h).min(conn.head(h)), conn.tail(h).max(conn.head(h))), (0, 1));

    conn.flip_edge(h).unwrap();

    let ends = [conn.tail(h), conn.head(h)];
    assert!(ends.contains(&2) && ends.contains(&3));
    assert_eq!(conn.n_live_faces(), 2);
    for f in conn.live_faces() {
        let vs = conn.face_vertices(f);
        assert!(vs.contains(&2) && vs.contains(&3));
    }
    // every vertex still has a valid outgoing half-edge
    for v in 0..4 {
        let out = conn.outgoing_halfedges(v);
        assert!(!out.is_empty());
        for &g in out.iter() {
            assert_eq!(conn.tail(g), v);
        }
    }
}

#[test]
fn test_split_face_into_three() {
    let mut conn = tetrahedron();
    let split = conn.split_face(0).unwrap();

    assert_eq!(split.vertex, 4);
    assert_eq!(conn.n_vertices(), 5);
    assert_eq!(conn.n_live_faces(), 6);
    assert!(conn.faces[0].removed);

    for (i, &f) in split.faces.iter().enumerate() {
        let vs = conn.face_vertices(f);
        assert!(vs.contains(&split.vertex));
        // side i of the original link survives in face i
        let g = split.link[i];
        assert_eq!(conn.half_edges[g].face, Some(f));
    }
    assert_eq!(conn.outgoing_halfedges(4).len(), 3);
}

#[test]
fn test_split_boundary_edge_grows_loop() {
    let mut conn = quad();
    // interior half-edge of a boundary edge
    let h = (0..conn.half_edges.len())
        .find(|&h| conn.half_edges[h].face.is_some() && conn.is_boundary_edge(h))
        .unwrap();
    let tail = conn.tail(h);
    let head = conn.head(h);

    let split = conn.split_boundary_edge(h).unwrap();
    assert_eq!(split.vertex, 4);
    assert_eq!(conn.n_live_faces(), 3);
    assert_eq!(conn.tail(split.he_tail_to_new), tail);
    assert_eq!(conn.head(split.he_tail_to_new), split.vertex);
    assert_eq!(conn.tail(split.he_new_to_head), split.vertex);
    assert_eq!(conn.head(split.he_new_to_head), head);

    // boundary loop gained one vertex
    let b = (0..conn.half_edges.len())
        .find(|&h| conn.half_edges[h].face.is_none() && !conn.half_edges[h].removed)
        .unwrap();
    let mut n = 1;
    let mut cur = conn.half_edges[b].next;
    while cur != b {
        n += 1;
        cur = conn.half_edges[cur].next;
    }
    assert_eq!(n, 5);
}
