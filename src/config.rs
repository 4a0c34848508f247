//! Configuration for the normal and tangent generation passes.
//!
//! Angles are stored in radians. The builder methods take degrees, as that is
//! how they are usually authored.

use core::f32::consts::PI;

/// Smoothing angles at or above this many radians (175°) disable the angular
/// test entirely and every set of coincident vertices shares one normal.
pub const UNLIMITED_SMOOTHING_ANGLE: f32 = 175.0 * PI / 180.0;

/// How per-vertex normals are produced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalsMode {
    /// Merges the face normals of coincident vertices, limited by
    /// [`NormalsConfig::max_smoothing_angle`].
    #[default]
    Smooth,
    /// Sums the area-weighted face normals of the faces referencing each vertex
    /// and normalizes once.
    /// Coincident vertices are not merged.
    Accumulate,
}

/// Parameters for [`generate_normals`](crate::generate_normals).
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalsConfig {
    /// Maximum angle in radians between two face normals for them to be
    /// averaged.
    pub max_smoothing_angle: f32,
    /// Smoothing strategy.
    pub mode: NormalsMode,
}

impl Default for NormalsConfig {
    fn default() -> Self {
        Self {
            max_smoothing_angle: 90.0 * PI / 180.0,
            mode: NormalsMode::Smooth,
        }
    }
}

impl NormalsConfig {
    /// Default configuration with the fast [`NormalsMode::Accumulate`] mode.
    pub fn accumulate() -> Self {
        Self::default().with_mode(NormalsMode::Accumulate)
    }

    /// Sets the maximum smoothing angle, in degrees.
    #[must_use]
    pub fn with_max_smoothing_degrees(mut self, degrees: f32) -> Self {
        self.max_smoothing_angle = degrees * PI / 180.0;
        self
    }

    /// Sets the smoothing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: NormalsMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns `true` when the angular test is skipped and coincident vertices
    /// are always merged.
    pub fn is_unlimited(&self) -> bool {
        self.max_smoothing_angle >= UNLIMITED_SMOOTHING_ANGLE
    }
}

/// How per-vertex tangents are produced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TangentsMode {
    /// Projects face tangents per vertex, then merges the tangents of
    /// coincident vertices with compatible normals, limited by
    /// [`TangentsConfig::max_smoothing_angle`].
    #[default]
    Smooth,
    /// Sums the face tangents of the faces referencing each vertex and
    /// normalizes once, without merging coincident vertices.
    /// Runs in parallel with the `parallel` feature.
    Accumulate,
}

/// Parameters for [`generate_tangents`](crate::generate_tangents).
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TangentsConfig {
    /// Maximum angle in radians between two tangents for them to be averaged.
    pub max_smoothing_angle: f32,
    /// Smoothing strategy.
    pub mode: TangentsMode,
}

impl Default for TangentsConfig {
    fn default() -> Self {
        Self {
            max_smoothing_angle: 45.0 * PI / 180.0,
            mode: TangentsMode::Smooth,
        }
    }
}

impl TangentsConfig {
    /// Minimum dot product between two vertex normals for their tangents to be
    /// merged.
    pub const NORMAL_DOT_THRESHOLD: f32 = 0.9999;

    /// Default configuration with the fast [`TangentsMode::Accumulate`] mode.
    pub fn accumulate() -> Self {
        Self::default().with_mode(TangentsMode::Accumulate)
    }

    /// Sets the maximum smoothing angle, in degrees.
    #[must_use]
    pub fn with_max_smoothing_degrees(mut self, degrees: f32) -> Self {
        self.max_smoothing_angle = degrees * PI / 180.0;
        self
    }

    /// Sets the smoothing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: TangentsMode) -> Self {
        self.mode = mode;
        self
    }
}
