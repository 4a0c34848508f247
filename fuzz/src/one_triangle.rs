#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mesh_ntb::NormalsConfig;
use mesh_ntb_fuzz::{Geometry, Vertex};

#[derive(Debug)]
struct OneTriangle(Geometry);

impl Arbitrary<'_> for OneTriangle {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let vertices = vec![
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
        ];
        let faces = vec![[0, 1, 2]];
        let mut value = Geometry { vertices, faces };

        value.validate()?;

        Ok(Self(value))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        let (min, max) = Vertex::size_hint(depth);
        (3 * min, max.map(|max| 3 * max))
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fuzz_target!(|value: OneTriangle| {
    let OneTriangle(value) = value;
    value.check_all_modes();

    let [p0, p1, p2] = [0, 1, 2].map(|v| value.vertices[v].position);
    let face_normal = cross(sub(p1, p0), sub(p2, p0));
    let length_squared = dot(face_normal, face_normal);

    // every vertex of a well-formed triangle gets the face normal, whatever
    // the mode
    if (1e-30..1e30).contains(&length_squared) {
        let length = length_squared.sqrt();
        for config in [
            NormalsConfig::default(),
            NormalsConfig::default().with_max_smoothing_degrees(180.),
            NormalsConfig::accumulate(),
        ] {
            let normals = mesh_ntb::generate_normals(&value, &config).unwrap();
            for normal in normals {
                assert!((dot(normal, normal) - 1.).abs() < 1e-4, "{normal:?}");
                assert!(dot(normal, face_normal) / length > 0.9999, "{normal:?}");
            }
        }
    }
});
