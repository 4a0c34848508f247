use alloc::vec::Vec;

use crate::{
    Face, Geometry, NormalsConfig, ProcessError, SpatialSort, StdOps, TangentsConfig,
    error::ProcessResult,
    geometry,
    helper::{BoundingBox, position_epsilon},
};

/// Indexed triangle mesh with owned vertex attributes.
///
/// Texture coordinates are stored with three components; only `u` and `v` are
/// read.
/// Normals, tangents and bitangents are optional and can be generated in
/// place.
///
/// Deserialized meshes go through the same checks as [`IndexedMesh::new`].
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawIndexedMesh")
)]
pub struct IndexedMesh {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    tangents: Option<Vec<[f32; 3]>>,
    bitangents: Option<Vec<[f32; 3]>>,
    indices: Vec<u32>,
}

impl IndexedMesh {
    /// Creates a mesh from its positions, texture coordinates and triangle
    /// index buffer.
    ///
    /// # Errors
    ///
    /// Fails if the index buffer does not describe whole triangles, if `uvs`
    /// and `positions` differ in length, or if an index is out of range.
    pub fn new(
        positions: Vec<[f32; 3]>,
        uvs: Vec<[f32; 3]>,
        indices: Vec<u32>,
    ) -> ProcessResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(ProcessError::IncompleteFace {
                index_count: indices.len(),
            });
        }
        check_length("uvs", positions.len(), uvs.len())?;

        let mesh = Self {
            positions,
            uvs,
            normals: None,
            tangents: None,
            bitangents: None,
            indices,
        };
        geometry::validate::<_, StdOps>(&mesh)?;

        Ok(mesh)
    }

    /// Attaches existing vertex normals.
    ///
    /// # Errors
    ///
    /// Fails if `normals` and the positions differ in length.
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> ProcessResult<Self> {
        check_length("normals", self.positions.len(), normals.len())?;
        self.normals = Some(normals);
        Ok(self)
    }

    /// Attaches existing tangents and bitangents.
    ///
    /// # Errors
    ///
    /// Fails if either buffer and the positions differ in length.
    pub fn with_tangents(
        mut self,
        tangents: Vec<[f32; 3]>,
        bitangents: Vec<[f32; 3]>,
    ) -> ProcessResult<Self> {
        check_length("tangents", self.positions.len(), tangents.len())?;
        check_length("bitangents", self.positions.len(), bitangents.len())?;
        self.tangents = Some(tangents);
        self.bitangents = Some(bitangents);
        Ok(self)
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Vertex texture coordinates; the third component is unused.
    #[inline]
    pub fn uvs(&self) -> &[[f32; 3]] {
        &self.uvs
    }

    /// Triangle index buffer, three indices per face.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex normals, if the mesh has any.
    #[inline]
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    /// Vertex tangents, if the mesh has any.
    #[inline]
    pub fn tangents(&self) -> Option<&[[f32; 3]]> {
        self.tangents.as_deref()
    }

    /// Vertex bitangents, if the mesh has any.
    #[inline]
    pub fn bitangents(&self) -> Option<&[[f32; 3]]> {
        self.bitangents.as_deref()
    }

    /// Iterates over the triangles of the index buffer.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|face| Face([face[0], face[1], face[2]]))
    }

    /// Returns the bounding box of the finite positions, or [`None`] for a mesh
    /// without any.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().copied())
    }

    /// Returns the tolerance below which two positions of this mesh are treated
    /// as the same point.
    pub fn position_epsilon(&self) -> f32 {
        position_epsilon::<_, StdOps>(self)
    }

    /// Builds a [`SpatialSort`] over the positions.
    pub fn spatial_sort(&self) -> SpatialSort {
        SpatialSort::new(&self.positions)
    }

    /// Returns every vertex sharing the position of `vertex`, including
    /// `vertex` itself unless its position is not finite.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn coincident_vertices(&self, vertex: usize) -> Vec<u32> {
        let mut found = Vec::new();
        self.spatial_sort()
            .find_positions(self.positions[vertex], self.position_epsilon(), &mut found);
        found
    }

    /// Maps every vertex to a dense id shared by all vertices at the same
    /// position, and returns the table with the number of distinct ids.
    pub fn welding_table(&self) -> (Vec<u32>, u32) {
        self.spatial_sort()
            .generate_mapping_table(self.position_epsilon())
    }

    /// Replaces the vertex normals with generated ones.
    pub fn generate_normals(&mut self, config: &NormalsConfig) -> ProcessResult<()> {
        self.normals = Some(crate::generate_normals::<_, StdOps>(&*self, config)?);
        Ok(())
    }

    /// Replaces the tangents and bitangents with generated ones.
    ///
    /// # Errors
    ///
    /// Fails with [`ProcessError::MissingNormals`] if the mesh has no normals.
    pub fn generate_tangents(&mut self, config: &TangentsConfig) -> ProcessResult<()> {
        if self.normals.is_none() {
            return Err(ProcessError::MissingNormals);
        }

        let (tangents, bitangents) =
            crate::generate_tangents::<_, StdOps>(&*self, config)?.into_parts();
        self.tangents = Some(tangents);
        self.bitangents = Some(bitangents);
        Ok(())
    }

    /// Generates normals, tangents and bitangents with the fast accumulating
    /// modes.
    pub fn generate_ntb(&mut self) -> ProcessResult<()> {
        self.generate_normals(&NormalsConfig::accumulate())?;
        self.generate_tangents(&TangentsConfig::accumulate())
    }
}

/// Unchecked field layout of [`IndexedMesh`], validated on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawIndexedMesh {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    tangents: Option<Vec<[f32; 3]>>,
    bitangents: Option<Vec<[f32; 3]>>,
    indices: Vec<u32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawIndexedMesh> for IndexedMesh {
    type Error = ProcessError;

    fn try_from(raw: RawIndexedMesh) -> ProcessResult<Self> {
        let mut mesh = Self::new(raw.positions, raw.uvs, raw.indices)?;
        if let Some(normals) = raw.normals {
            mesh = mesh.with_normals(normals)?;
        }
        match (raw.tangents, raw.bitangents) {
            (Some(tangents), Some(bitangents)) => mesh.with_tangents(tangents, bitangents),
            (None, None) => Ok(mesh),
            (Some(_), None) => Err(ProcessError::AttributeLength {
                attribute: "bitangents",
                expected: mesh.positions.len(),
                actual: 0,
            }),
            (None, Some(_)) => Err(ProcessError::AttributeLength {
                attribute: "tangents",
                expected: mesh.positions.len(),
                actual: 0,
            }),
        }
    }
}

fn check_length(attribute: &'static str, expected: usize, actual: usize) -> ProcessResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ProcessError::AttributeLength {
            attribute,
            expected,
            actual,
        })
    }
}

impl Geometry for IndexedMesh {
    fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    fn num_faces(&self) -> usize {
        self.indices.len() / 3
    }

    fn face(&self, face: usize) -> [u32; 3] {
        [0, 1, 2].map(|corner| self.indices[face * 3 + corner])
    }

    fn position(&self, vertex: usize) -> [f32; 3] {
        self.positions[vertex]
    }

    /// Meshes without normals report zero vectors.
    fn normal(&self, vertex: usize) -> [f32; 3] {
        self.normals.as_ref().map_or([0.; 3], |normals| normals[vertex])
    }

    fn tex_coord(&self, vertex: usize) -> [f32; 2] {
        let [u, v, _] = self.uvs[vertex];
        [u, v]
    }
}
