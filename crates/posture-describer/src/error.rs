//! Error types for posture description, configuration and commands.

use posture_body::BodyError;
use thiserror::Error;

/// Broad category of a [`PostureError`], for callers that only need to
/// know whether to fix their setup, fix their arguments, or initialize first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The kinematics chain could not be resolved or is not supported.
    Initialization,
    /// A caller-supplied value was rejected; state is unchanged.
    InvalidArgument,
    /// The operation needs an initialized describer.
    Precondition,
}

/// Errors raised while binding a chain or computing posture states.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostureError {
    #[error("body error: {0}")]
    Body(#[from] BodyError),

    #[error("no kinematic chain from {base} to {end_effector}")]
    ChainNotFound { base: String, end_effector: String },

    #[error("kinematic chain from {base} to {end_effector} has no actuated joints")]
    EmptyChain { base: String, end_effector: String },

    #[error("joint {0} has a zero-length axis")]
    DegenerateAxis(String),

    #[error("no posture formulation supports the chain {0}")]
    UnsupportedChain(String),

    #[error("posture describer is not initialized with a kinematics chain")]
    NotInitialized,

    #[error("joint value dimension mismatch: expected {expected}, got {got}")]
    DofMismatch { expected: usize, got: usize },

    #[error("invalid posture value threshold: {0} (must be finite and >= 0)")]
    InvalidThreshold(f64),
}

impl PostureError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Body(_)
            | Self::ChainNotFound { .. }
            | Self::EmptyChain { .. }
            | Self::DegenerateAxis(_)
            | Self::UnsupportedChain(_) => ErrorKind::Initialization,
            Self::DofMismatch { .. } | Self::InvalidThreshold(_) => ErrorKind::InvalidArgument,
            Self::NotInitialized => ErrorKind::Precondition,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors from the text command adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} expects an argument")]
    MissingArgument { command: String },

    #[error("{command} got an invalid argument: {value}")]
    InvalidArgument { command: String, value: String },

    #[error("{command} got an unexpected argument: {value}")]
    UnexpectedArgument { command: String, value: String },

    #[error(transparent)]
    Posture(#[from] PostureError),
}
