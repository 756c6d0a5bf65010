//! Kinematic body topology for posture description.
//!
//! Provides types for representing a robot's kinematic tree (links, joints,
//! static origins and axes), a validating builder, and the live joint-value
//! vector that posture queries read when no explicit configuration is given.

pub mod body;
pub mod error;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use body::{KinBody, KinBodyBuilder};
pub use error::BodyError;
pub use types::{JointData, JointType, LinkData, Origin};
