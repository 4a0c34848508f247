//! Tangent generation scenarios.

mod common;

use common::{assert_vec_eq, cube, dot, tilted_plane};
use mesh_ntb::{
    IndexedMesh, NormalsConfig, ProcessError, TangentsConfig, TangentsMode, generate_normals,
    generate_tangents,
};

fn unit_triangle(uvs: [[f32; 3]; 3]) -> IndexedMesh {
    IndexedMesh::new(
        vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]],
        uvs.to_vec(),
        vec![0, 1, 2],
    )
    .unwrap()
}

#[test]
fn unit_triangle_frame() {
    let mesh = unit_triangle([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]);
    let normals = generate_normals(&mesh, &NormalsConfig::default()).unwrap();
    assert_eq!(normals, vec![[0., 0., 1.]; 3]);

    let mesh = mesh.with_normals(normals.clone()).unwrap();
    for config in [TangentsConfig::default(), TangentsConfig::accumulate()] {
        let tangents = generate_tangents(&mesh, &config).unwrap();
        for v in 0..3 {
            assert_vec_eq(tangents.tangents()[v], [1., 0., 0.], 1e-6);
            assert_vec_eq(tangents.bitangents()[v], [0., 1., 0.], 1e-6);
        }
        assert_eq!(tangents.encoded(&normals).unwrap(), vec![[1., 0., 0., 1.]; 3]);
    }
}

#[test]
fn mirrored_uvs_flip_handedness() {
    let mesh = unit_triangle([[0., 0., 0.], [1., 0., 0.], [0., -1., 0.]])
        .with_normals(vec![[0., 0., 1.]; 3])
        .unwrap();
    let tangents = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();

    for v in 0..3 {
        assert_vec_eq(tangents.tangents()[v], [1., 0., 0.], 1e-6);
        assert_vec_eq(tangents.bitangents()[v], [0., -1., 0.], 1e-6);
    }
    let encoded = tangents.encoded(mesh.normals().unwrap()).unwrap();
    assert!(encoded.iter().all(|t| t[3] == -1.));
}

#[test]
fn coincident_uvs_fall_back_to_canonical_basis() {
    let mut mesh = unit_triangle([[0.3, 0.7, 0.]; 3]);
    mesh.generate_normals(&NormalsConfig::default()).unwrap();
    mesh.generate_tangents(&TangentsConfig::default()).unwrap();

    for &tangent in mesh.tangents().unwrap() {
        assert!(tangent.iter().all(|c| c.is_finite()));
        assert_vec_eq(tangent, [0., 1., 0.], 1e-6);
    }
}

#[test]
fn generation_is_deterministic() {
    let mut mesh = cube();
    mesh.generate_normals(&NormalsConfig::default()).unwrap();

    let first = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();
    let second = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();

    let bits = |values: &[[f32; 3]]| {
        values
            .iter()
            .flat_map(|v| v.map(f32::to_bits))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(first.tangents()), bits(second.tangents()));
    assert_eq!(bits(first.bitangents()), bits(second.bitangents()));
}

#[test]
fn cube_sides_follow_their_uv_axes() {
    let mut mesh = cube();
    mesh.generate_normals(&NormalsConfig::default().with_max_smoothing_degrees(1.))
        .unwrap();
    let tangents = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();

    let normals = mesh.normals().unwrap();
    let encoded = tangents.encoded(normals).unwrap();
    for side in 0..6 {
        let first = side * 4;
        // u runs from the first to the second corner, v from the second to the
        // third
        let p = &mesh.positions()[first..first + 3];
        let u = [0, 1, 2].map(|c| (p[1][c] - p[0][c]) / 2.);
        let v = [0, 1, 2].map(|c| (p[2][c] - p[1][c]) / 2.);

        for vertex in first..first + 4 {
            assert_vec_eq(tangents.tangents()[vertex], u, 1e-6);
            assert_vec_eq(tangents.bitangents()[vertex], v, 1e-6);
            assert_eq!(encoded[vertex][3], 1.);
        }
    }
}

#[test]
fn accumulate_agrees_with_smooth_on_a_plane() {
    let mut mesh = tilted_plane(6);
    mesh.generate_normals(&NormalsConfig::default()).unwrap();

    let smooth = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();
    let accumulated = generate_tangents(&mesh, &TangentsConfig::accumulate()).unwrap();

    let normal = mesh.normals().unwrap()[0];
    for (a, b) in smooth.tangents().iter().zip(accumulated.tangents()) {
        // the accumulated tangent is not projected, but the plane's faces all
        // lie in the tangent plane already
        assert_vec_eq(*a, *b, 1e-5);
        assert!(dot(*a, normal).abs() < 1e-5);
    }
}

#[test]
fn smoothing_angle_is_respected() {
    // a quad whose second triangle has its texture coordinates rotated by 60
    // degrees, with the diagonal vertices duplicated
    let (s, c) = 60f32.to_radians().sin_cos();
    let positions = vec![
        [0., 0., 0.],
        [1., 0., 0.],
        [1., 1., 0.],
        [0., 0., 0.],
        [0., 1., 0.],
        [1., 1., 0.],
    ];
    let uvs = vec![
        [0., 0., 0.],
        [1., 0., 0.],
        [1., 1., 0.],
        [0., 0., 0.],
        [-s, c, 0.],
        [c - s, s + c, 0.],
    ];
    let mesh = IndexedMesh::new(positions, uvs, vec![0, 1, 2, 3, 5, 4])
        .unwrap()
        .with_normals(vec![[0., 0., 1.]; 6])
        .unwrap();

    let narrow = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();
    assert_ne!(narrow.tangents()[0], narrow.tangents()[3]);

    let wide = generate_tangents(
        &mesh,
        &TangentsConfig::default().with_max_smoothing_degrees(90.),
    )
    .unwrap();
    assert_eq!(wide.tangents()[0], wide.tangents()[3]);
    assert_eq!(wide.tangents()[2], wide.tangents()[5]);
}

#[test]
fn missing_normals_are_reported() {
    let mut mesh = cube();
    assert_eq!(
        mesh.generate_tangents(&TangentsConfig::default()),
        Err(ProcessError::MissingNormals)
    );
    assert_eq!(mesh.tangents(), None);

    mesh.generate_ntb().unwrap();
    assert_eq!(mesh.tangents().map(<[_]>::len), Some(24));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_accumulation_agrees_with_smooth() {
    let mut mesh = tilted_plane(64);
    mesh.generate_normals(&NormalsConfig::default()).unwrap();

    let config = TangentsConfig::default().with_mode(TangentsMode::Accumulate);
    let accumulated = generate_tangents(&mesh, &config).unwrap();
    let smooth = generate_tangents(&mesh, &TangentsConfig::default()).unwrap();
    for (a, b) in accumulated.tangents().iter().zip(smooth.tangents()) {
        assert_vec_eq(*a, *b, 1e-5);
    }
}

#[test]
fn accumulate_mode_leaves_unreferenced_vertices_zero() {
    let mesh = IndexedMesh::new(
        vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [4., 4., 4.]],
        vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0.; 3]],
        vec![0, 1, 2],
    )
    .unwrap()
    .with_normals(vec![[0., 0., 1.]; 4])
    .unwrap();

    for mode in [TangentsMode::Smooth, TangentsMode::Accumulate] {
        let tangents =
            generate_tangents(&mesh, &TangentsConfig::default().with_mode(mode)).unwrap();
        assert_eq!(tangents.tangents()[3], [0.; 3]);
        assert_vec_eq(tangents.tangents()[0], [1., 0., 0.], 1e-6);
    }
}
