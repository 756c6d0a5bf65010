//! Shared test fixtures for the posture crates.
//!
//! Provides ready-made kinematic bodies covering each supported chain
//! formulation plus a few shapes that must be rejected.

pub mod bodies;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use bodies::{
    branched_torso, four_r_arm, rail_mounted_six_dof_arm, six_dof_arm, six_dof_prismatic_arm,
    two_link_arm,
};
