use alloc::vec::Vec;

use crate::{
    Ops, ProcessError,
    error::ProcessResult,
    math::{Vec3, not_zero},
};

/// Provides an interface for reading vertex information from indexed triangle
/// geometry.
///
/// Results are returned from the processing functions rather than written back
/// through this trait, so an implementation only ever needs shared access.
///
/// Without the `std` feature, there is no default implementation for [`Ops`]
/// provided.
/// Instead, you must also provide a type implementing [`Ops`] using an alternative
/// math backend, such as [`libm`].
///
/// [`libm`]: https://docs.rs/libm
pub trait Geometry<
    #[cfg(not(feature = "std"))] O: Ops,
    #[cfg(feature = "std")] O: Ops = crate::StdOps,
>
{
    /// Returns the number of vertices in the vertex buffer.
    fn num_vertices(&self) -> usize;

    /// Returns the number of triangles described by the index buffer.
    fn num_faces(&self) -> usize;

    /// Returns the three vertex indices of triangle number `face`.
    /// `face` is a number in the range `0..num_faces()`.
    fn face(&self, face: usize) -> [u32; 3];

    /// Returns the position of vertex number `vertex`.
    fn position(&self, vertex: usize) -> [f32; 3];

    /// Returns the normal of vertex number `vertex`.
    /// Only read when generating tangents.
    fn normal(&self, vertex: usize) -> [f32; 3];

    /// Returns the texture coordinate of vertex number `vertex`.
    /// Only read when generating tangents.
    fn tex_coord(&self, vertex: usize) -> [f32; 2];
}

/// A triangle of the index buffer, viewed as its three vertex indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Face(pub [u32; 3]);

impl Face {
    /// Returns the vertex indices as `usize` values, ready for indexing.
    #[inline]
    pub const fn vertices(self) -> [usize; 3] {
        let [a, b, c] = self.0;
        [a as usize, b as usize, c as usize]
    }

    /// Returns `true` if two or more corners of the face share a vertex index.
    #[inline]
    pub const fn is_collapsed(self) -> bool {
        let [a, b, c] = self.0;
        a == b || b == c || a == c
    }
}

impl From<[u32; 3]> for Face {
    fn from(value: [u32; 3]) -> Self {
        Self(value)
    }
}

pub(crate) fn position_from_index<I: Geometry<O>, O: Ops>(geometry: &I, vertex: usize) -> Vec3 {
    geometry.position(vertex).into()
}

pub(crate) fn normal_from_index<I: Geometry<O>, O: Ops>(geometry: &I, vertex: usize) -> Vec3 {
    geometry.normal(vertex).into()
}

/// Returns the texture coordinate of `vertex` as a `(u, v)` pair.
pub(crate) fn tex_coord_from_index<I: Geometry<O>, O: Ops>(
    geometry: &I,
    vertex: usize,
) -> (f32, f32) {
    let [u, v] = geometry.tex_coord(vertex);
    (u, v)
}

/// Iterates over all faces as `usize` vertex indices.
pub(crate) fn faces<I: Geometry<O>, O: Ops>(
    geometry: &I,
) -> impl ExactSizeIterator<Item = [usize; 3]> + Clone + '_ {
    (0..geometry.num_faces()).map(|f| Face(geometry.face(f)).vertices())
}

/// Collects every vertex position.
pub(crate) fn collect_positions<I: Geometry<O>, O: Ops>(geometry: &I) -> Vec<[f32; 3]> {
    (0..geometry.num_vertices())
        .map(|v| geometry.position(v))
        .collect()
}

/// Rejects index buffers that reference vertices outside the vertex buffer.
pub(crate) fn validate<I: Geometry<O>, O: Ops>(geometry: &I) -> ProcessResult<()> {
    let vertex_count = geometry.num_vertices();

    (0..geometry.num_faces())
        .flat_map(|face| geometry.face(face).map(|index| (face, index)))
        .find(|&(_, index)| index as usize >= vertex_count)
        .map_or(Ok(()), |(face, index)| {
            Err(ProcessError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            })
        })
}

/// Counts vectors with a `NaN` or infinite component.
pub(crate) fn count_non_finite(values: &[Vec3]) -> usize {
    values.iter().filter(|v| !v.is_finite()).count()
}

/// Counts vectors which are exactly zero, i.e. never received a contribution.
pub(crate) fn count_zero(values: &[Vec3]) -> usize {
    values
        .iter()
        .filter(|v| !(not_zero(v.x) || not_zero(v.y) || not_zero(v.z)))
        .count()
}
