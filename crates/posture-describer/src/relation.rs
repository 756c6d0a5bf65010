//! Geometric relation between the axes of two neighbouring joints.
//!
//! Formulations are recognized by how consecutive joint axes relate:
//! parallel, perpendicular, and whether the two axis lines meet. For two
//! consecutive revolute joints the relation does not depend on the joint
//! values, so it is evaluated once at the zero configuration.

use crate::chain::JointFrame;

/// Tolerance for the unit-vector and distance tests below.
pub const RELATION_TOLERANCE: f64 = 1e-7;

/// How two joint axis lines relate in space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointPairRelation {
    /// Skew lines at a general angle.
    Unknown,
    /// Parallel, distinct lines.
    Parallel,
    /// Perpendicular directions, lines do not meet.
    Perpendicular,
    /// Lines meet at a general angle.
    Intersect,
    /// Same line.
    Overlap,
    /// Lines meet at a right angle.
    IntersectPerpendicular,
}

impl JointPairRelation {
    /// Classify the axis lines of `a` and `b`.
    ///
    /// Axis directions are expected to be unit length.
    pub fn between(a: &JointFrame, b: &JointFrame) -> Self {
        let offset = b.anchor - a.anchor;
        let normal = a.axis.cross(&b.axis);
        let sin_angle = normal.norm();

        if sin_angle <= RELATION_TOLERANCE {
            // Distance from b's anchor to a's line.
            return if offset.cross(&a.axis).norm() <= RELATION_TOLERANCE {
                Self::Overlap
            } else {
                Self::Parallel
            };
        }

        let perpendicular = a.axis.dot(&b.axis).abs() <= RELATION_TOLERANCE;
        let intersect = (offset.dot(&normal) / sin_angle).abs() <= RELATION_TOLERANCE;
        match (intersect, perpendicular) {
            (true, true) => Self::IntersectPerpendicular,
            (true, false) => Self::Intersect,
            (false, true) => Self::Perpendicular,
            (false, false) => Self::Unknown,
        }
    }

    pub const fn is_parallel(self) -> bool {
        matches!(self, Self::Parallel | Self::Overlap)
    }

    pub const fn is_perpendicular(self) -> bool {
        matches!(self, Self::Perpendicular | Self::IntersectPerpendicular)
    }

    pub const fn intersects(self) -> bool {
        matches!(
            self,
            Self::Intersect | Self::Overlap | Self::IntersectPerpendicular
        )
    }
}

/// Relations between each pair of consecutive frames; `frames.len() - 1` entries.
pub fn neighbouring_relations(frames: &[JointFrame]) -> Vec<JointPairRelation> {
    frames
        .windows(2)
        .map(|pair| JointPairRelation::between(&pair[0], &pair[1]))
        .collect()
}
