//! Error types for mesh loading.

use thiserror::Error;

/// Errors that can occur while reading or writing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer ends before the data it announces.
    #[error("truncated STL data: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header and face count.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// The mesh has more faces than binary STL can count.
    #[error("too many triangles for binary STL: {0}")]
    TooManyTriangles(usize),

    /// The file holds no triangles.
    #[error("mesh has no triangles")]
    Empty,
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
