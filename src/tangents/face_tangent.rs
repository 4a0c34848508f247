use crate::{Ops, math::Vec3};

/// Tangent and bitangent of a single face, derived from the texture coordinate
/// gradients across it.
/// Neither vector is normalized.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(super) struct FaceTangent {
    /// Direction of increasing `u`.
    pub(super) tangent: Vec3,
    /// Direction of increasing `v`.
    pub(super) bitangent: Vec3,
}

impl FaceTangent {
    /// Solves the inverse of the 2x2 texture coordinate Jacobian of the face.
    ///
    /// A face whose texture coordinates have no area has no solution; the
    /// canonical basis `s = (0, 1)`, `t = (1, 0)` is substituted so the result
    /// is still a stable, finite direction.
    pub(super) fn from_corners(positions: [Vec3; 3], tex_coords: [(f32, f32); 3]) -> Self {
        let [p0, p1, p2] = positions;
        let [uv0, uv1, uv2] = tex_coords;

        let v = p1 - p0;
        let w = p2 - p0;

        let (mut sx, mut sy) = (uv1.0 - uv0.0, uv1.1 - uv0.1);
        let (mut tx, mut ty) = (uv2.0 - uv0.0, uv2.1 - uv0.1);
        let dir_correction = if tx * sy - ty * sx < 0. { -1. } else { 1. };

        if sx * ty == sy * tx {
            (sx, sy, tx, ty) = (0., 1., 1., 0.);
        }

        Self {
            tangent: (w * sy - v * ty) * dir_correction,
            bitangent: (w * -sx + v * tx) * dir_correction,
        }
    }

    /// Projects the face tangent and bitangent into the plane orthogonal to a
    /// vertex normal (Gram-Schmidt) and normalizes both.
    ///
    /// The bitangent is reduced against the projected tangent before that is
    /// normalized, so the pair is only exactly orthogonal when the projected
    /// tangent has unit length.
    ///
    /// If exactly one of the two degenerates, it is rebuilt from the normal and
    /// the other one.
    /// When both degenerate they are returned as they are.
    pub(super) fn project<O: Ops>(self, normal: Vec3) -> (Vec3, Vec3) {
        let tangent = self.tangent - normal * self.tangent.dot(normal);
        let bitangent = self.bitangent
            - normal * self.bitangent.dot(normal)
            - tangent * self.bitangent.dot(tangent);

        let tangent = tangent.normalized::<O>();
        let bitangent = bitangent.normalized::<O>();

        match (tangent.is_finite(), bitangent.is_finite()) {
            (false, true) => (normal.cross(bitangent).normalized::<O>(), bitangent),
            (true, false) => (tangent, normal.cross(tangent).normalized::<O>()),
            _ => (tangent, bitangent),
        }
    }
}
