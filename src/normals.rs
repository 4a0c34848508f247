//! Per-vertex normal generation.

use alloc::{vec, vec::Vec};

use tracing::{debug, warn};

use crate::{
    Geometry, NormalsConfig, NormalsMode, Ops, SpatialSort,
    geometry::{collect_positions, count_non_finite, faces, position_from_index},
    helper::{BoundingBox, compute_position_epsilon},
    math::{Vec3, not_zero},
};

pub(crate) fn generate<I: Geometry<O>, O: Ops>(geometry: &I, config: &NormalsConfig) -> Vec<Vec3> {
    debug!(
        vertices = geometry.num_vertices(),
        faces = geometry.num_faces(),
        mode = ?config.mode,
        max_smoothing_angle = config.max_smoothing_angle,
        "generating vertex normals"
    );

    let normals = match config.mode {
        NormalsMode::Smooth => smooth(geometry, config),
        NormalsMode::Accumulate => accumulate(geometry),
    };

    let non_finite = count_non_finite(&normals);
    if non_finite > 0 {
        warn!(non_finite, "vertex normals left undefined by degenerate geometry");
    }

    normals
}

/// Writes the unit normal of every face to each of its three vertices.
/// Vertices shared between faces keep the normal of the last face.
/// Vertices referenced by no face are `NaN`.
fn face_normals<I: Geometry<O>, O: Ops>(geometry: &I) -> Vec<Vec3> {
    let mut normals = vec![Vec3::NAN; geometry.num_vertices()];

    for vertices in faces(geometry) {
        let [p0, p1, p2] = vertices.map(|v| position_from_index(geometry, v));
        let normal = (p1 - p0).cross(p2 - p0).normalized::<O>();
        for v in vertices {
            normals[v] = normal;
        }
    }

    normals
}

fn smooth<I: Geometry<O>, O: Ops>(geometry: &I, config: &NormalsConfig) -> Vec<Vec3> {
    let face_normals = face_normals(geometry);

    let positions = collect_positions(geometry);
    let sort = SpatialSort::new(&positions);
    let epsilon = BoundingBox::from_points(positions.iter().copied())
        .map_or(0., |bounds| compute_position_epsilon::<O>(&bounds));

    if config.is_unlimited() {
        smooth_unlimited::<O>(&sort, &positions, &face_normals, epsilon)
    } else {
        smooth_limited::<O>(
            &sort,
            &positions,
            &face_normals,
            epsilon,
            O::cos(config.max_smoothing_angle),
        )
    }
}

/// Partitions the vertices into sets sharing a position and gives every
/// member of a set the average of their face normals.
fn smooth_unlimited<O: Ops>(
    sort: &SpatialSort,
    positions: &[[f32; 3]],
    face_normals: &[Vec3],
    epsilon: f32,
) -> Vec<Vec3> {
    let mut normals = vec![Vec3::NAN; positions.len()];
    let mut visited = vec![false; positions.len()];
    let mut found = Vec::new();
    let mut clusters = 0usize;

    for (i, &position) in positions.iter().enumerate() {
        if visited[i] {
            continue;
        }

        sort.find_positions(position, epsilon, &mut found);
        if found.is_empty() {
            // non-finite positions never match, not even themselves
            found.push(i as u32);
        }

        let normal = found
            .iter()
            .map(|&j| face_normals[j as usize])
            .filter(|normal| !normal.x.is_nan())
            .fold(Vec3::ZERO, |sum, normal| sum + normal)
            .normalized::<O>();

        for &j in &found {
            normals[j as usize] = normal;
            visited[j as usize] = true;
        }
        clusters += 1;
    }

    debug!(clusters, "merged coincident vertex normals");

    normals
}

/// Averages, for every vertex, the face normals of coincident vertices within
/// the smoothing angle of its own face normal.
///
/// Each accepted normal is weighted by its angle to the vertex's own normal, so
/// normals nearly parallel to it contribute little.
/// When every weight vanishes (all accepted normals are parallel) the plain sum
/// is used instead.
fn smooth_limited<O: Ops>(
    sort: &SpatialSort,
    positions: &[[f32; 3]],
    face_normals: &[Vec3],
    epsilon: f32,
    cos_limit: f32,
) -> Vec<Vec3> {
    let mut found = Vec::new();

    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            sort.find_positions(position, epsilon, &mut found);
            if found.is_empty() {
                found.push(i as u32);
            }

            let own = face_normals[i];
            let mut weighted = Vec3::ZERO;
            let mut plain = Vec3::ZERO;
            for &j in &found {
                let other = face_normals[j as usize];
                if other.x.is_nan() {
                    continue;
                }

                let dot = other.dot(own);
                // a vector is not always exactly parallel to itself
                if j as usize == i || dot >= cos_limit {
                    weighted += other * O::acos(dot.clamp(-1., 1.));
                    plain += other;
                }
            }

            let sum = if not_zero(weighted.x) || not_zero(weighted.y) || not_zero(weighted.z) {
                weighted
            } else {
                plain
            };
            sum.normalized::<O>()
        })
        .collect()
}

/// Sums the unnormalized face normals, which are proportional to the face
/// area, into each face's vertices and normalizes once per vertex.
fn accumulate<I: Geometry<O>, O: Ops>(geometry: &I) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; geometry.num_vertices()];

    for vertices in faces(geometry) {
        let [p0, p1, p2] = vertices.map(|v| position_from_index(geometry, v));
        let normal = (p1 - p0).cross(p2 - p0);
        for v in vertices {
            sums[v] += normal;
        }
    }

    sums.into_iter().map(|sum| sum.normalized::<O>()).collect()
}
