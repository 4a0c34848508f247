use alloc::{vec, vec::Vec};

use super::face_tangent::FaceTangent;
use crate::{
    Geometry, Ops,
    geometry::{faces, position_from_index, tex_coord_from_index},
    math::Vec3,
};

/// Sums every face tangent and bitangent into the face's vertices, then
/// normalizes each vertex once.
/// Vertices referenced by no face stay zero.
pub(super) fn accumulate<I: Geometry<O>, O: Ops>(geometry: &I) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut tangents = vec![Vec3::ZERO; geometry.num_vertices()];
    let mut bitangents = vec![Vec3::ZERO; geometry.num_vertices()];

    for vertices in faces(geometry) {
        let face = FaceTangent::from_corners(
            vertices.map(|v| position_from_index(geometry, v)),
            vertices.map(|v| tex_coord_from_index(geometry, v)),
        );

        for v in vertices {
            tangents[v] += face.tangent;
            bitangents[v] += face.bitangent;
        }
    }

    for v in tangents.iter_mut().chain(bitangents.iter_mut()) {
        *v = v.normalized_or_zero::<O>();
    }

    (tangents, bitangents)
}
