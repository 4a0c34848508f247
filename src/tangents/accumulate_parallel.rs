use alloc::{vec, vec::Vec};

use rayon::prelude::*;

use super::face_tangent::FaceTangent;
use crate::{
    Geometry, Ops,
    geometry::{faces, position_from_index, tex_coord_from_index},
    math::Vec3,
};

/// Sums every face tangent and bitangent into the face's vertices, then
/// normalizes each vertex once.
/// Vertices referenced by no face stay zero.
///
/// Faces are gathered up front so the geometry itself never crosses threads.
/// Each worker accumulates into its own buffers, which are summed pairwise at
/// the end.
pub(super) fn accumulate<I: Geometry<O>, O: Ops>(geometry: &I) -> (Vec<Vec3>, Vec<Vec3>) {
    let vertex_count = geometry.num_vertices();
    let face_tangents = faces(geometry)
        .map(|vertices| {
            let face = FaceTangent::from_corners(
                vertices.map(|v| position_from_index(geometry, v)),
                vertices.map(|v| tex_coord_from_index(geometry, v)),
            );
            (vertices, face)
        })
        .collect::<Vec<_>>();

    let empty = || (vec![Vec3::ZERO; vertex_count], vec![Vec3::ZERO; vertex_count]);

    let (mut tangents, mut bitangents) = face_tangents
        .par_iter()
        .fold(empty, |(mut tangents, mut bitangents), (vertices, face)| {
            for &v in vertices {
                tangents[v] += face.tangent;
                bitangents[v] += face.bitangent;
            }
            (tangents, bitangents)
        })
        .reduce(empty, |(mut tangents, mut bitangents), (other_t, other_b)| {
            for (sum, v) in tangents.iter_mut().zip(other_t) {
                *sum += v;
            }
            for (sum, v) in bitangents.iter_mut().zip(other_b) {
                *sum += v;
            }
            (tangents, bitangents)
        });

    tangents
        .par_iter_mut()
        .chain(bitangents.par_iter_mut())
        .for_each(|v| *v = v.normalized_or_zero::<O>());

    (tangents, bitangents)
}
