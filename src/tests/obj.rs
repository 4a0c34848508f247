use alloc::vec::Vec;

use wavefront_obj::obj::{ObjSet, Object, Primitive, parse};

use crate::{
    IndexedMesh, NormalsConfig, SpatialSort, TangentsConfig,
    math::{Vec3, fabsf},
};

/// Unwelds an OBJ object: every triangle corner becomes its own vertex,
/// carrying the position, texture coordinate and normal of that corner.
fn unwelded_mesh(object: &Object) -> IndexedMesh {
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    let mut normals = Vec::new();

    for shape in object.geometry.iter().flat_map(|g| g.shapes.iter()) {
        let Primitive::Triangle(a, b, c) = shape.primitive else {
            continue;
        };

        for (v, t, n) in [a, b, c] {
            let vertex = object.vertices[v];
            positions.push([vertex.x as f32, vertex.y as f32, vertex.z as f32]);

            let tvertex = object.tex_vertices[t.unwrap()];
            uvs.push([tvertex.u as f32, tvertex.v as f32, 0.]);

            let normal = object.normals[n.unwrap()];
            normals.push([normal.x as f32, normal.y as f32, normal.z as f32]);
        }
    }

    let indices = (0..positions.len() as u32).collect();
    IndexedMesh::new(positions, uvs, indices)
        .unwrap()
        .with_normals(normals)
        .unwrap()
}

fn cube() -> IndexedMesh {
    let file = include_str!("../../data/cube.obj");
    let ObjSet { objects, .. } = parse(file).expect("must be able to parse sample data");
    unwelded_mesh(&objects[0])
}

/// Groups vertex indices by exact position.
fn corners(mesh: &IndexedMesh) -> Vec<Vec<u32>> {
    let sort = SpatialSort::new(mesh.positions());
    let mut corners: Vec<Vec<u32>> = Vec::new();
    let mut found = Vec::new();
    for &position in mesh.positions() {
        sort.find_identical_positions(position, &mut found);
        found.sort_unstable();
        if !corners.contains(&found) {
            corners.push(found.clone());
        }
    }
    corners
}

#[test]
fn cube_corners_keep_hard_edges() {
    let mut mesh = cube();
    let expected = mesh.normals().unwrap().to_vec();
    mesh.generate_normals(&NormalsConfig::default().with_max_smoothing_degrees(1.0))
        .unwrap();
    let normals = mesh.normals().unwrap();

    let corners = corners(&mesh);
    assert_eq!(corners.len(), 8);

    for corner in corners {
        let mut distinct: Vec<[f32; 3]> = Vec::new();
        for &v in &corner {
            let normal = normals[v as usize];
            // generated normals match the authored per-face normals
            for c in 0..3 {
                assert!(fabsf(normal[c] - expected[v as usize][c]) < 1e-6);
            }
            if !distinct.contains(&normal) {
                distinct.push(normal);
            }
        }
        assert_eq!(distinct.len(), 3, "{corner:?}");
    }
}

#[test]
fn cube_corners_merge_when_unlimited() {
    let mut mesh = cube();
    mesh.generate_normals(&NormalsConfig::default().with_max_smoothing_degrees(180.0))
        .unwrap();
    let normals = mesh.normals().unwrap();

    for corner in corners(&mesh) {
        let first = normals[corner[0] as usize];
        assert!(corner.iter().all(|&v| normals[v as usize] == first));

        // points away from the cube's center, along the corner's diagonal
        let position = Vec3::from(mesh.positions()[corner[0] as usize]);
        assert!(Vec3::from(first).dot(position) > 1.0);
    }
}

#[test]
fn cube_tangents_are_orthonormal() {
    let mut mesh = cube();
    mesh.generate_tangents(&TangentsConfig::default()).unwrap();

    let normals = mesh.normals().unwrap();
    let tangents = mesh.tangents().unwrap();
    let bitangents = mesh.bitangents().unwrap();
    assert_eq!(tangents.len(), 36);

    for ((&n, &t), &b) in normals.iter().zip(tangents).zip(bitangents) {
        let (n, t, b) = (Vec3::from(n), Vec3::from(t), Vec3::from(b));
        assert!(fabsf(t.dot(t) - 1.) < 1e-5);
        assert!(fabsf(b.dot(b) - 1.) < 1e-5);
        assert!(fabsf(t.dot(n)) < 1e-5);
        assert!(fabsf(b.dot(n)) < 1e-5);
        assert!(fabsf(t.dot(b)) < 1e-5);
    }

    // both triangles of a quad share one frame
    let faces = mesh.faces().collect::<Vec<_>>();
    for face in faces.chunks(2) {
        let [v0, ..] = face[0].vertices();
        let [_, _, v5] = face[1].vertices();
        assert_eq!(tangents[v0], tangents[v5]);
    }
}
