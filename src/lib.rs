//! Generates smoothed vertex normals, tangents and bitangents for indexed
//! triangle meshes, in entirely safe Rust.
//!
//! Vertices duplicated at UV seams or hard edges are found with [`SpatialSort`],
//! a proximity index that projects every position onto a fixed plane normal
//! and answers radius and "identical position" queries with a binary search
//! over the sorted plane distances.
//!
//! # Usage
//!
//! As a preliminary step for `no_std` users, you must provide an implementation
//! for [`Ops`].
//! When the `std` feature is enabled, one is provided and automatically selected
//! as the default.
//!
//! First, implement [`Geometry`] for your mesh.
//!
//! ```ignore
//! impl Geometry for MyMesh { /* ... */ }
//! ```
//!
//! Then call [`generate_normals`] and, once your mesh carries normals,
//! [`generate_tangents`].
//! Results are returned as new buffers with one entry per vertex; nothing is
//! written back through the [`Geometry`] trait.
//!
//! With the `std` feature, [`IndexedMesh`] provides an owned mesh which
//! implements [`Geometry`] and stores the generated attributes in place.
//!
//! ```
//! # use mesh_ntb::{IndexedMesh, NormalsConfig, TangentsConfig};
//! let mut mesh = IndexedMesh::new(
//!     vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]],
//!     vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]],
//!     vec![0, 1, 2],
//! )?;
//!
//! mesh.generate_normals(&NormalsConfig::default())?;
//! mesh.generate_tangents(&TangentsConfig::default())?;
//!
//! assert_eq!(mesh.normals().unwrap()[0], [0., 0., 1.]);
//! assert_eq!(mesh.tangents().unwrap()[0], [1., 0., 0.]);
//! # Ok::<(), mesh_ntb::ProcessError>(())
//! ```
//!
//! # Conventions
//!
//! Faces are wound counter-clockwise when seen from the front: the face normal
//! of `(p0, p1, p2)` is `normalize(cross(p1 - p0, p2 - p0))`.
//! Tangents follow increasing `u` and bitangents increasing `v`.
//!
//! Degenerate geometry is never an error.
//! A vertex whose faces are all degenerate keeps a `NaN` normal or tangent, and
//! a vertex referenced by no face is left undefined; both are reported through
//! a `tracing` warning.
//!
//! # Features
//!
//! ## `std` (default)
//!
//! Provides access to the standard library, allowing a default implementation
//! of [`Ops`] to be provided, and enables [`IndexedMesh`].
//! If you disable this feature, you will need to provide a type implementing
//! [`Ops`] as the `O` parameter in the [`Geometry`] trait.
//!
//! ```
//! # use mesh_ntb::{Geometry, Ops};
//! # struct MyOps;
//! # struct MyGeometry;
//! impl Ops for MyOps {
//!     fn sqrt(x: f32) -> f32 {
//!         unimplemented!()
//!     }
//!
//!     fn acos(x: f32) -> f32 {
//!         unimplemented!()
//!     }
//!
//!     fn cos(x: f32) -> f32 {
//!         unimplemented!()
//!     }
//! }
//!
//! # #[cfg(any())]
//! impl Geometry<MyOps> for MyGeometry { /* ... */ }
//! ```
//!
//! A common backend for implementing [`Ops`] is [`libm`]:
//!
//! ```
//! # use mesh_ntb::Ops;
//! # struct LibmOps;
//! impl Ops for LibmOps {
//!     fn sqrt(x: f32) -> f32 {
//!         libm::sqrtf(x)
//!     }
//!
//!     fn acos(x: f32) -> f32 {
//!         libm::acos(x as f64) as f32
//!     }
//!
//!     fn cos(x: f32) -> f32 {
//!         libm::cosf(x)
//!     }
//! }
//! ```
//!
//! ## `parallel`
//!
//! Runs [`TangentsMode::Accumulate`] across a [`rayon`] thread pool.
//! Summation order differs from the sequential path, so results may differ in
//! the last bits.
//!
//! ## `serde`
//!
//! Derives `Serialize` and `Deserialize` for the configuration and output
//! types.
//!
//! [`libm`]: https://docs.rs/libm
//! [`rayon`]: https://docs.rs/rayon

#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod config;
mod error;
mod geometry;
mod helper;
mod math;
#[cfg(feature = "std")]
mod mesh;
mod normals;
mod spatial_sort;
mod tangents;

#[cfg(all(test, feature = "std"))]
mod tests;

use alloc::vec::Vec;

#[cfg(feature = "std")]
mod std {
    extern crate std;

    /// Implements [`Ops`](crate::Ops) using the standard library.
    /// This is the recommended default when the `std` feature is enabled.
    pub struct StdOps;

    impl crate::Ops for StdOps {
        #[inline]
        fn sqrt(x: f32) -> f32 {
            x.sqrt()
        }

        #[inline]
        fn acos(x: f32) -> f32 {
            // f64 for the added precision near +-1, where angles between
            // almost parallel normals are measured
            (x as f64).acos() as f32
        }

        #[inline]
        fn cos(x: f32) -> f32 {
            x.cos()
        }
    }
}

pub use config::{
    NormalsConfig, NormalsMode, TangentsConfig, TangentsMode, UNLIMITED_SMOOTHING_ANGLE,
};
pub use error::{ProcessError, ProcessResult};
pub use geometry::{Face, Geometry};
pub use helper::{BoundingBox, POSITION_EPSILON_SCALE, compute_position_epsilon, position_epsilon};
pub use math::Ops;
#[cfg(feature = "std")]
pub use mesh::IndexedMesh;
pub use spatial_sort::SpatialSort;
#[cfg(feature = "std")]
pub use std::StdOps;
pub use tangents::Tangents;

/// Generates one normal per vertex of `geometry`.
///
/// # Errors
///
/// Fails with [`ProcessError::IndexOutOfRange`] if a face references a vertex
/// that does not exist.
pub fn generate_normals<I, O>(geometry: &I, config: &NormalsConfig) -> ProcessResult<Vec<[f32; 3]>>
where
    I: Geometry<O>,
    O: Ops,
{
    geometry::validate(geometry)?;

    Ok(normals::generate(geometry, config)
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Generates one tangent and bitangent per vertex of `geometry`, from its
/// texture coordinates and vertex normals.
///
/// # Errors
///
/// Fails with [`ProcessError::IndexOutOfRange`] if a face references a vertex
/// that does not exist.
pub fn generate_tangents<I, O>(geometry: &I, config: &TangentsConfig) -> ProcessResult<Tangents>
where
    I: Geometry<O>,
    O: Ops,
{
    geometry::validate(geometry)?;

    Ok(tangents::generate(geometry, config))
}
