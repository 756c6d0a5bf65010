//! Discrete posture description for serial kinematic chains.
//!
//! Classifies a joint configuration of a chain (shoulder left/right, elbow
//! up/down, wrist flipped or not) into 16-bit posture state codes. Near a
//! singularity a posture value's sign cannot be trusted, so every branch
//! still consistent with the configuration is reported.
//!
//! # Architecture
//!
//! ```text
//! KinBody ──► KinematicChain ──► Formulation ──► posture values ──► states
//!              (resolve)          (derive)        (evaluate)        (classify)
//! ```
//!
//! [`PostureDescriber::init`] resolves the chain and binds its
//! [`Formulation`] once; every [`PostureDescriber::compute_posture_states`]
//! call reuses that binding.

pub mod chain;
pub mod command;
pub mod config;
pub mod describer;
pub mod error;
pub mod formulation;
pub mod relation;
pub mod state;

pub use chain::{ChainJoint, JointFrame, KinematicChain, LinkPair};
pub use command::{send_command, PostureCommand, PostureResponse};
pub use config::{ChainConfig, DescriberConfig};
pub use describer::{PostureDescriber, DEFAULT_POSTURE_VALUE_THRESHOLD};
pub use error::{CommandError, ConfigError, ErrorKind, PostureError};
pub use formulation::Formulation;
pub use relation::JointPairRelation;
pub use state::{compute_posture_states, PostureSign, PostureState};
