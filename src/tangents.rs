//! Per-vertex tangent and bitangent generation.

#[cfg_attr(feature = "parallel", path = "tangents/accumulate_parallel.rs")]
mod accumulate;
mod face_tangent;

use alloc::{vec, vec::Vec};

use tracing::{debug, warn};

use self::{accumulate::accumulate, face_tangent::FaceTangent};
use crate::{
    Geometry, Ops, ProcessError, SpatialSort, TangentsConfig, TangentsMode,
    error::ProcessResult,
    geometry::{
        collect_positions, count_non_finite, count_zero, faces, normal_from_index,
        position_from_index, tex_coord_from_index,
    },
    helper::{BoundingBox, compute_position_epsilon},
    math::Vec3,
};

/// Generated per-vertex tangents and bitangents.
///
/// Both buffers have one entry per vertex.
/// A vertex referenced by no face is left as zero, and a vertex whose faces are
/// all degenerate may hold `NaN` components.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tangents {
    tangents: Vec<[f32; 3]>,
    bitangents: Vec<[f32; 3]>,
}

impl Tangents {
    /// Returns the normalized tangents as `[x, y, z]` arrays.
    #[inline]
    pub fn tangents(&self) -> &[[f32; 3]] {
        &self.tangents
    }

    /// Returns the normalized bitangents as `[x, y, z]` arrays.
    #[inline]
    pub fn bitangents(&self) -> &[[f32; 3]] {
        &self.bitangents
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    /// Returns `true` if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }

    /// Splits into the tangent and bitangent buffers.
    pub fn into_parts(self) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
        (self.tangents, self.bitangents)
    }

    /// Encodes each tangent as `[x, y, z, w]`, where `w` is the handedness of
    /// the tangent frame: `-1` if `dot(cross(n, t), b)` is negative, otherwise
    /// `1`.
    /// The bitangent can then be rebuilt as `cross(n, t) * w`.
    pub fn encoded(&self, normals: &[[f32; 3]]) -> ProcessResult<Vec<[f32; 4]>> {
        if normals.len() != self.len() {
            return Err(ProcessError::AttributeLength {
                attribute: "normals",
                expected: self.len(),
                actual: normals.len(),
            });
        }

        Ok(self
            .tangents
            .iter()
            .zip(&self.bitangents)
            .zip(normals)
            .map(|((&tangent, &bitangent), &normal)| {
                let [x, y, z] = tangent;
                let handedness = Vec3::from(normal)
                    .cross(tangent.into())
                    .dot(bitangent.into());
                let w = if handedness < 0. { -1. } else { 1. };
                [x, y, z, w]
            })
            .collect())
    }
}

pub(crate) fn generate<I: Geometry<O>, O: Ops>(geometry: &I, config: &TangentsConfig) -> Tangents {
    debug!(
        vertices = geometry.num_vertices(),
        faces = geometry.num_faces(),
        mode = ?config.mode,
        max_smoothing_angle = config.max_smoothing_angle,
        "generating vertex tangents"
    );

    let (tangents, bitangents) = match config.mode {
        TangentsMode::Smooth => smooth(geometry, config),
        TangentsMode::Accumulate => accumulate(geometry),
    };

    let non_finite = count_non_finite(&tangents);
    if non_finite > 0 {
        warn!(non_finite, "vertex tangents left undefined by degenerate geometry");
    }
    debug!(unreferenced = count_zero(&tangents), "generated vertex tangents");

    Tangents {
        tangents: tangents.into_iter().map(Into::into).collect(),
        bitangents: bitangents.into_iter().map(Into::into).collect(),
    }
}

/// Projects every face tangent into the normal plane of each of the face's
/// vertices.
/// Vertices shared between faces keep the result of the last face.
fn vertex_tangents<I: Geometry<O>, O: Ops>(geometry: &I) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut tangents = vec![Vec3::ZERO; geometry.num_vertices()];
    let mut bitangents = vec![Vec3::ZERO; geometry.num_vertices()];

    for vertices in faces(geometry) {
        let face = FaceTangent::from_corners(
            vertices.map(|v| position_from_index(geometry, v)),
            vertices.map(|v| tex_coord_from_index(geometry, v)),
        );

        for v in vertices {
            let (tangent, bitangent) = face.project::<O>(normal_from_index(geometry, v));
            tangents[v] = tangent;
            bitangents[v] = bitangent;
        }
    }

    (tangents, bitangents)
}

/// Averages the tangents of coincident vertices whose normals agree and whose
/// tangents and bitangents both lie within the smoothing angle of the first
/// vertex of the set.
///
/// Every vertex belongs to exactly one set, so all members of a set end up with
/// the same tangent and bitangent.
fn smooth<I: Geometry<O>, O: Ops>(geometry: &I, config: &TangentsConfig) -> (Vec<Vec3>, Vec<Vec3>) {
    let (mut tangents, mut bitangents) = vertex_tangents(geometry);
    let normals = (0..geometry.num_vertices())
        .map(|v| normal_from_index(geometry, v))
        .collect::<Vec<_>>();

    let positions = collect_positions(geometry);
    let sort = SpatialSort::new(&positions);
    let epsilon = BoundingBox::from_points(positions.iter().copied())
        .map_or(0., |bounds| compute_position_epsilon::<O>(&bounds));
    let cos_limit = O::cos(config.max_smoothing_angle);

    let mut visited = vec![false; positions.len()];
    let mut found = Vec::new();
    let mut accepted = Vec::new();
    let mut clusters = 0usize;

    for (seed, &position) in positions.iter().enumerate() {
        if visited[seed] {
            continue;
        }

        sort.find_positions(position, epsilon, &mut found);

        let (seed_normal, seed_tangent, seed_bitangent) =
            (normals[seed], tangents[seed], bitangents[seed]);
        accepted.clear();
        accepted.push(seed);
        // NaN dot products fail every test
        accepted.extend(found.iter().map(|&j| j as usize).filter(|&j| {
            j != seed
                && !visited[j]
                && normals[j].dot(seed_normal) >= TangentsConfig::NORMAL_DOT_THRESHOLD
                && tangents[j].dot(seed_tangent) >= cos_limit
                && bitangents[j].dot(seed_bitangent) >= cos_limit
        }));

        let (tangent, bitangent) = accepted.iter().fold(
            (Vec3::ZERO, Vec3::ZERO),
            |(tangent, bitangent), &j| (tangent + tangents[j], bitangent + bitangents[j]),
        );
        let (tangent, bitangent) = (
            tangent.normalized_or_zero::<O>(),
            bitangent.normalized_or_zero::<O>(),
        );

        for &j in &accepted {
            tangents[j] = tangent;
            bitangents[j] = bitangent;
            visited[j] = true;
        }
        clusters += 1;
    }

    debug!(clusters, "merged coincident vertex tangents");

    (tangents, bitangents)
}
