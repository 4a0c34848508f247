use arbitrary::{Arbitrary, Unstructured};
use mesh_ntb::{NormalsConfig, TangentsConfig, TangentsMode, Tangents};

/// Largest coordinate magnitude accepted from the fuzzer.
/// Beyond this, squared lengths overflow and every output is legitimately
/// undefined.
pub const MAX_COORDINATE: f32 = 1e4;

#[derive(Debug, Clone, Copy, PartialEq, Arbitrary)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    fn components(&self) -> impl Iterator<Item = f32> {
        self.position
            .into_iter()
            .chain(self.normal)
            .chain(self.tex_coord)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[u32; 3]>,
}

/// Returns `true` for values the processes are expected to handle.
pub fn is_reasonable(value: f32) -> bool {
    value.is_finite() && value.abs() <= MAX_COORDINATE
}

impl Geometry {
    pub fn validate(&mut self) -> Result<(), arbitrary::Error> {
        let Self { vertices, faces } = self;

        // Known failure: no vertices to index
        if vertices.is_empty() {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        for face in faces.iter_mut() {
            for vertex in face.iter_mut() {
                *vertex %= vertices.len() as u32;
            }
        }

        // Known failure: overflowing or non-finite values
        if !vertices
            .iter()
            .flat_map(Vertex::components)
            .all(is_reasonable)
        {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        Ok(())
    }

    /// Runs every process in every mode and checks the output shapes.
    pub fn check_all_modes(&self) {
        for config in [
            NormalsConfig::default(),
            NormalsConfig::default().with_max_smoothing_degrees(180.),
            NormalsConfig::accumulate(),
        ] {
            let normals = mesh_ntb::generate_normals(self, &config).unwrap();
            assert_eq!(normals.len(), self.vertices.len());
        }

        for mode in [TangentsMode::Smooth, TangentsMode::Accumulate] {
            let tangents = self.tangents(&TangentsConfig::default().with_mode(mode));
            assert_eq!(tangents.len(), self.vertices.len());
            assert_eq!(tangents.bitangents().len(), self.vertices.len());
        }
    }

    pub fn tangents(&self, config: &TangentsConfig) -> Tangents {
        let tangents = mesh_ntb::generate_tangents(self, config).unwrap();

        let normals = self.vertices.iter().map(|v| v.normal).collect::<Vec<_>>();
        let encoded = tangents.encoded(&normals).unwrap();
        assert!(encoded.iter().all(|t| t[3] == 1. || t[3] == -1.));

        tangents
    }
}

impl Arbitrary<'_> for Geometry {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let mut value = Self {
            vertices: Vec::<Vertex>::arbitrary(u)?,
            faces: Vec::<[u32; 3]>::arbitrary(u)?,
        };

        value.validate()?;

        Ok(value)
    }
}

impl mesh_ntb::Geometry for Geometry {
    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_faces(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, face: usize) -> [u32; 3] {
        self.faces[face]
    }

    fn position(&self, vertex: usize) -> [f32; 3] {
        self.vertices[vertex].position
    }

    fn normal(&self, vertex: usize) -> [f32; 3] {
        self.vertices[vertex].normal
    }

    fn tex_coord(&self, vertex: usize) -> [f32; 2] {
        self.vertices[vertex].tex_coord
    }
}
