//! Error types for body construction and joint-state access.

/// Errors that can occur while building or querying a [`KinBody`](crate::KinBody).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    /// A referenced link was not found in the body.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// A referenced joint was not found in the body.
    #[error("missing joint: {0}")]
    MissingJoint(String),

    /// Two links were registered under the same name.
    #[error("duplicate link: {0}")]
    DuplicateLink(String),

    /// Two joints were registered under the same name.
    #[error("duplicate joint: {0}")]
    DuplicateJoint(String),

    /// A link is the child of more than one joint.
    #[error("link {link} has more than one parent joint ({first}, {second})")]
    MultipleParents {
        link: String,
        first: String,
        second: String,
    },

    /// Every link is the child of some joint.
    #[error("no root link found")]
    NoRootLink,

    /// More than one link has no parent joint.
    #[error("multiple root links: {first}, {second}")]
    MultipleRootLinks { first: String, second: String },

    /// A link cannot be reached by walking joints down from the root.
    #[error("link {0} is not connected to the root link")]
    UnreachableLink(String),

    /// A joint-value vector has the wrong length.
    #[error("DOF dimension mismatch: expected {expected}, got {got}")]
    DofMismatch { expected: usize, got: usize },

    /// A DOF index does not address the body's joint-value vector.
    #[error("DOF index {index} out of range for body with {dof} DOF")]
    DofIndexOutOfRange { index: usize, dof: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
