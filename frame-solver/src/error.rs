//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Degenerate geometry: element from ({x1}, {z1}) to ({x2}, {z2}) has no positive length")]
    DegenerateGeometry { x1: f64, z1: f64, x2: f64, z2: f64 },

    #[error("Element {0} not found in system")]
    UnknownElement(usize),

    #[error("Node {0} not found in system")]
    UnknownNode(usize),

    #[error("Invalid direction {0}: expected 1 (x), 2 (z) or 3 (rotation)")]
    InvalidDirection(usize),

    #[error("Assembled system matrix is not symmetric - degree of freedom mapping is inconsistent")]
    AsymmetricAssembly,

    #[error("Reduced stiffness matrix is singular - structure is insufficiently supported")]
    SingularReducedSystem,

    #[error("Missing conditions: {0}")]
    MissingConditions(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = FrameError::UnknownElement(7);
        assert_eq!(err.to_string(), "Element 7 not found in system");

        let err = FrameError::DegenerateGeometry { x1: 1.0, z1: 2.0, x2: 1.0, z2: 2.0 };
        assert!(err.to_string().contains("(1, 2)"));
    }
}
