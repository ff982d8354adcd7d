//! Error types for the I/O and configuration boundary.
//!
//! The distance computation itself is infallible: degenerate geometry and
//! empty inputs are handled in place and reported through the result record.
//! Errors only arise where the crate touches the outside world (mesh files,
//! JSON parameters, worker pool construction) or when a background worker
//! dies before delivering its result.
//!
//! # Error Codes
//!
//! Each error has a code in the format `MDIST-XXXX`:
//! - `MDIST-1xxx`: I/O errors (file reading, writing, parsing)
//! - `MDIST-2xxx`: Validation errors (indices, coordinates, parameters)
//! - `MDIST-3xxx`: Computation errors (worker pool, aborted workers)
//! - `MDIST-4xxx`: Format and configuration errors
//!
//! # Example
//!
//! ```
//! use mesh_distance::{ErrorCode, MeshError};
//!
//! let err = MeshError::invalid_params("worker_threads must be at least 1");
//! assert_eq!(err.code(), ErrorCode::InvalidParams);
//! println!("{}: {}", err.code(), err.recovery_suggestion());
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fallible mesh-distance operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// MDIST-1001: Failed to read file
    IoRead = 1001,
    /// MDIST-1003: Failed to parse mesh file
    ParseError = 1003,

    // Validation errors (2xxx)
    /// MDIST-2001: Face references invalid vertex index
    InvalidVertexIndex = 2001,
    /// MDIST-2002: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 2002,
    /// MDIST-2003: Mesh has no vertices or faces
    EmptyMesh = 2003,
    /// MDIST-2004: Parameter value out of range
    InvalidParams = 2004,

    // Computation errors (3xxx)
    /// MDIST-3001: Worker pool could not be created
    WorkerPool = 3001,
    /// MDIST-3002: Background computation ended without a result
    ComputationAborted = 3002,

    // Format errors (4xxx)
    /// MDIST-4001: Unsupported file format
    UnsupportedFormat = 4001,
    /// MDIST-4002: Malformed configuration
    ConfigParse = 4002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MDIST-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "MDIST-1001",
            ErrorCode::ParseError => "MDIST-1003",
            ErrorCode::InvalidVertexIndex => "MDIST-2001",
            ErrorCode::InvalidCoordinate => "MDIST-2002",
            ErrorCode::EmptyMesh => "MDIST-2003",
            ErrorCode::InvalidParams => "MDIST-2004",
            ErrorCode::WorkerPool => "MDIST-3001",
            ErrorCode::ComputationAborted => "MDIST-3002",
            ErrorCode::UnsupportedFormat => "MDIST-4001",
            ErrorCode::ConfigParse => "MDIST-4002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Re-export the file from the original software.
    ReexportFile { format: Option<String> },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
    /// Check the input for issues.
    CheckSourceMesh { checks: Vec<String> },
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// Start the computation again.
    Relaunch,
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::ReexportFile { format } => {
                if let Some(fmt) = format {
                    write!(
                        f,
                        "Try re-exporting the mesh as {} from the original software",
                        fmt
                    )
                } else {
                    write!(f, "Try re-exporting the mesh from the original software")
                }
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
            RecoverySuggestion::CheckSourceMesh { checks } => {
                write!(f, "Check the source mesh for: {}", checks.join(", "))
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::Relaunch => {
                write!(
                    f,
                    "The cache entry was released; start the computation again"
                )
            }
            RecoverySuggestion::None => {
                write!(f, "No automatic recovery available")
            }
        }
    }
}

/// Location information for errors.
#[derive(Debug, Clone)]
pub enum MeshLocation {
    /// Error at a specific vertex.
    Vertex { index: usize },
    /// Error at a specific face.
    Face { index: usize },
    /// Error in a file.
    File { path: PathBuf },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Vertex { index } => write!(f, "vertex {}", index),
            MeshLocation::Face { index } => write!(f, "face {}", index),
            MeshLocation::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Errors raised at the crate boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read {path}")]
    #[diagnostic(
        code(mesh_distance::io::read),
        help("Check that the file exists and is readable. Try: ls -la {}", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a mesh file.
    #[error("failed to parse mesh from {path}: {details}")]
    #[diagnostic(
        code(mesh_distance::parse::error),
        help("The file may be corrupted. Try re-exporting from the original software.")
    )]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(
        code(mesh_distance::format::unsupported),
        help("Supported formats: STL, OBJ")
    )]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices or faces).
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(mesh_distance::validation::empty),
        help("The mesh must have at least one vertex and one face.")
    )]
    EmptyMesh { details: String },

    /// Invalid vertex index in face data.
    #[error(
        "invalid vertex index: face {face_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh_distance::validation::vertex_index),
        help("Check the mesh export settings.")
    )]
    InvalidVertexIndex {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(mesh_distance::validation::coordinate),
        help("Check for numerical issues in the source data.")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// Parameter out of its valid range.
    #[error("invalid parameters: {details}")]
    #[diagnostic(code(mesh_distance::params::invalid))]
    InvalidParams { details: String },

    /// Configuration could not be parsed.
    #[error("failed to parse configuration: {details}")]
    #[diagnostic(
        code(mesh_distance::config::parse),
        help("Configuration is JSON with optional fields `metric` and `worker_threads`.")
    )]
    ConfigParse { details: String },

    /// The dedicated worker pool could not be built.
    #[error("failed to build worker pool: {details}")]
    #[diagnostic(code(mesh_distance::compute::worker_pool))]
    WorkerPool { details: String },

    /// A background computation ended without delivering a result.
    #[error("distance computation for {pair} ended without a result")]
    #[diagnostic(
        code(mesh_distance::compute::aborted),
        help("The worker panicked, usually inside a progress callback. Start the computation again.")
    )]
    ComputationAborted { pair: String },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoRead { .. } => ErrorCode::IoRead,
            MeshError::ParseError { .. } => ErrorCode::ParseError,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            MeshError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            MeshError::InvalidParams { .. } => ErrorCode::InvalidParams,
            MeshError::ConfigParse { .. } => ErrorCode::ConfigParse,
            MeshError::WorkerPool { .. } => ErrorCode::WorkerPool,
            MeshError::ComputationAborted { .. } => ErrorCode::ComputationAborted,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::IoRead { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["file exists".into(), "file permissions".into()],
            },
            MeshError::ParseError { .. } => RecoverySuggestion::ReexportFile {
                format: Some("binary STL or OBJ".into()),
            },
            MeshError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["STL".into(), "OBJ".into()],
            },
            MeshError::EmptyMesh { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["mesh has geometry".into(), "correct export settings".into()],
            },
            MeshError::InvalidVertexIndex { .. } | MeshError::InvalidCoordinate { .. } => {
                RecoverySuggestion::CheckSourceMesh {
                    checks: vec!["face indices".into(), "coordinate values".into()],
                }
            }
            MeshError::InvalidParams { .. } | MeshError::WorkerPool { .. } => {
                RecoverySuggestion::AdjustParameters {
                    parameters: vec![("worker_threads".into(), "omit or use >= 1".into())],
                }
            }
            MeshError::ConfigParse { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![("metric".into(), "\"vertex\" or \"edge_midpoint\"".into())],
            },
            MeshError::ComputationAborted { .. } => RecoverySuggestion::Relaunch,
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::InvalidVertexIndex { face_index, .. } => {
                Some(MeshLocation::Face { index: *face_index })
            }
            MeshError::InvalidCoordinate { vertex_index, .. } => Some(MeshLocation::Vertex {
                index: *vertex_index,
            }),
            MeshError::IoRead { path, .. }
            | MeshError::ParseError { path, .. } => {
                Some(MeshLocation::File { path: path.clone() })
            }
            _ => None,
        }
    }

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MeshError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidParams error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        MeshError::InvalidParams {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::IoRead.as_str(), "MDIST-1001");
        assert_eq!(ErrorCode::InvalidParams.as_str(), "MDIST-2004");
        assert_eq!(ErrorCode::ComputationAborted.as_str(), "MDIST-3002");
        assert_eq!(format!("{}", ErrorCode::ConfigParse), "MDIST-4002");
    }

    #[test]
    fn test_error_code_mapping() {
        let err = MeshError::parse_error("a.stl", "truncated");
        assert_eq!(err.code(), ErrorCode::ParseError);
        assert!(matches!(err.location(), Some(MeshLocation::File { .. })));

        let err = MeshError::ComputationAborted {
            pair: "(1, 2)".into(),
        };
        assert_eq!(err.code(), ErrorCode::ComputationAborted);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::Relaunch);
        assert!(err.location().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = MeshError::InvalidVertexIndex {
            face_index: 3,
            vertex_index: 10,
            vertex_count: 4,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("face 3"));
        assert!(msg.contains("vertex 10"));

        let err = MeshError::invalid_params("worker_threads must be at least 1");
        assert!(format!("{}", err).contains("worker_threads"));
    }

    #[test]
    fn test_recovery_display() {
        let suggestion = RecoverySuggestion::UseDifferentFormat {
            suggested: vec!["STL".into(), "OBJ".into()],
        };
        assert_eq!(
            suggestion.to_string(),
            "Try using a different format: STL, OBJ"
        );
    }
}
