#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use mesh_ntb::IndexedMesh;

pub fn assert_vec_eq(actual: [f32; 3], expected: [f32; 3], epsilon: f32) {
    for c in 0..3 {
        assert_abs_diff_eq!(actual[c], expected[c], epsilon = epsilon);
    }
}

pub fn normalize([x, y, z]: [f32; 3]) -> [f32; 3] {
    let length = (x * x + y * y + z * z).sqrt();
    [x / length, y / length, z / length]
}

pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cube spanning `-1..=1` with 4 vertices per side (24 in total), so every
/// corner position is shared by 3 vertices with different face normals.
/// Each side's texture coordinates run along its `(u, v)` axes.
pub fn cube() -> IndexedMesh {
    // (normal, u, v) with cross(u, v) == normal
    let sides: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1., 0., 0.], [0., 1., 0.], [0., 0., 1.]),
        ([-1., 0., 0.], [0., 0., 1.], [0., 1., 0.]),
        ([0., 1., 0.], [0., 0., 1.], [1., 0., 0.]),
        ([0., -1., 0.], [1., 0., 0.], [0., 0., 1.]),
        ([0., 0., 1.], [1., 0., 0.], [0., 1., 0.]),
        ([0., 0., -1.], [0., 1., 0.], [1., 0., 0.]),
    ];

    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();
    for (normal, u, v) in sides {
        let first = positions.len() as u32;
        for (su, sv) in [(-1., -1.), (1., -1.), (1., 1.), (-1., 1.)] {
            positions.push([0, 1, 2].map(|c| normal[c] + su * u[c] + sv * v[c]));
            uvs.push([(su + 1.) / 2., (sv + 1.) / 2., 0.]);
        }
        indices.extend([0, 1, 2, 0, 2, 3].map(|i| first + i));
    }

    IndexedMesh::new(positions, uvs, indices).unwrap()
}

/// `n` by `n` quads on the plane `z = 0.5 x + 0.25 y` over `0..=1`, with
/// shared vertices and texture coordinates following `x` and `y`.
pub fn tilted_plane(n: u32) -> IndexedMesh {
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f32 / n as f32, j as f32 / n as f32);
            positions.push([x, y, 0.5 * x + 0.25 * y]);
            uvs.push([x, y, 0.]);
        }
    }

    let mut indices = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let corner = j * (n + 1) + i;
            let [a, b, c, d] = [corner, corner + 1, corner + n + 2, corner + n + 1];
            indices.extend([a, b, c, a, c, d]);
        }
    }

    IndexedMesh::new(positions, uvs, indices).unwrap()
}

pub const TILTED_PLANE_NORMAL: [f32; 3] = [-0.5, -0.25, 1.];
