//! Error types for mesh processing.

use thiserror::Error;

/// Error returned when a mesh cannot be processed.
///
/// Degenerate geometry (zero-area faces, coincident texture coordinates) is
/// never an error; those cases are substituted locally with fallback values.
/// Only structurally invalid input is rejected.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
// Reserving the right to introduce new error variants in the future.
#[non_exhaustive]
pub enum ProcessError {
    /// The index buffer does not describe whole triangles.
    #[error("index count {index_count} is not a multiple of 3")]
    IncompleteFace {
        /// Length of the offending index buffer.
        index_count: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Face containing the bad index.
        face: usize,
        /// The out of range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A per-vertex attribute has a different length than the position buffer.
    #[error("{attribute} has {actual} entries, expected {expected}")]
    AttributeLength {
        /// Name of the attribute, e.g. `"uvs"`.
        attribute: &'static str,
        /// Number of positions.
        expected: usize,
        /// Number of attribute entries supplied.
        actual: usize,
    },

    /// Tangents were requested for a mesh that carries no normals.
    #[error("tangent generation requires vertex normals")]
    MissingNormals,
}

/// Result type for processing operations.
pub type ProcessResult<T> = core::result::Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let err = ProcessError::IndexOutOfRange {
            face: 2,
            index: 17,
            vertex_count: 9,
        };
        let message = format!("{err}");
        assert!(message.contains("17"));
        assert!(message.contains('9'));

        let err = ProcessError::IncompleteFace { index_count: 7 };
        assert_eq!(format!("{err}"), "index count 7 is not a multiple of 3");
    }
}
