//! Bounding boxes and the position tolerance derived from them.

use crate::{Geometry, Ops, math::Vec3};

/// Fraction of the bounding box diagonal below which two positions are treated
/// as the same point.
pub const POSITION_EPSILON_SCALE: f32 = 1e-4;

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Component-wise minimum corner.
    pub min: [f32; 3],
    /// Component-wise maximum corner.
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Computes the bounding box of `points`, or [`None`] if there are none.
    ///
    /// Points with a `NaN` or infinite component are ignored.
    pub fn from_points<P: IntoIterator<Item = [f32; 3]>>(points: P) -> Option<Self> {
        points
            .into_iter()
            .map(Vec3::from)
            .filter(|v| v.is_finite())
            .fold(None, |state, v| {
                let (min, max) = state.unwrap_or((v, v));
                Some((min.min(v), max.max(v)))
            })
            .map(|(min, max)| Self {
                min: min.into(),
                max: max.into(),
            })
    }

    /// Returns the length of the diagonal from `min` to `max`.
    pub fn diagonal_length<O: Ops>(&self) -> f32 {
        (Vec3::from(self.max) - Vec3::from(self.min)).length::<O>()
    }

    /// Returns the center of the box.
    pub fn center(&self) -> [f32; 3] {
        ((Vec3::from(self.max) + Vec3::from(self.min)) * 0.5).into()
    }
}

/// Computes the tolerance for "same position" comparisons, scaled to the
/// extent of the geometry: `|max - min| * 1e-4`.
///
/// A fixed absolute epsilon would be too coarse for tiny meshes and too fine
/// for huge ones.
pub fn compute_position_epsilon<O: Ops>(bounds: &BoundingBox) -> f32 {
    bounds.diagonal_length::<O>() * POSITION_EPSILON_SCALE
}

/// Computes the [position epsilon](compute_position_epsilon) over every vertex
/// position of `geometry`.
/// Returns `0` for geometry without vertices.
pub fn position_epsilon<I: Geometry<O>, O: Ops>(geometry: &I) -> f32 {
    BoundingBox::from_points((0..geometry.num_vertices()).map(|v| geometry.position(v)))
        .map_or(0., |bounds| compute_position_epsilon::<O>(&bounds))
}
