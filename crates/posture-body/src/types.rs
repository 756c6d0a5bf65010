//! Link and joint descriptions making up a kinematic body.
//!
//! These map closely to URDF concepts but carry only what the kinematic
//! tree needs: names, connectivity, static origins, axes and DOF indices.

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// Joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
}

impl JointType {
    /// Whether this joint type owns a degree of freedom.
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }

    /// Whether the joint rotates about its axis (revolute or continuous).
    pub const fn is_revolute(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous)
    }
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// A 3D pose specified as position + roll-pitch-yaw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Origin {
    /// Translation `[x, y, z]` in meters.
    pub xyz: [f64; 3],
    /// Rotation `[roll, pitch, yaw]` in radians.
    pub rpy: [f64; 3],
}

impl Origin {
    pub const fn new(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self { xyz, rpy }
    }

    /// Pure translation.
    pub const fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: [x, y, z],
            rpy: [0.0; 3],
        }
    }
}

// ---------------------------------------------------------------------------
// LinkData
// ---------------------------------------------------------------------------

/// A rigid link of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    /// Link name.
    pub name: String,
}

impl LinkData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// JointData
// ---------------------------------------------------------------------------

/// A joint connecting a parent link to a child link.
#[derive(Debug, Clone, PartialEq)]
pub struct JointData {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub joint_type: JointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Joint origin relative to the parent link frame.
    pub origin: Origin,
    /// Joint axis in the joint frame (default `[0, 0, 1]`).
    pub axis: [f64; 3],
    /// Index into the body's DOF vector. `None` for fixed joints; assigned
    /// by [`KinBodyBuilder::build`](crate::KinBodyBuilder::build).
    pub dof_index: Option<usize>,
}

impl JointData {
    /// Create a joint at the parent frame origin with a `+Z` axis.
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
            origin: Origin::default(),
            axis: [0.0, 0.0, 1.0],
            dof_index: None,
        }
    }

    pub fn revolute(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::new(name, JointType::Revolute, parent, child)
    }

    pub fn prismatic(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::new(name, JointType::Prismatic, parent, child)
    }

    pub fn fixed(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::new(name, JointType::Fixed, parent, child)
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: [f64; 3]) -> Self {
        self.axis = axis;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_type_is_actuated() {
        assert!(JointType::Revolute.is_actuated());
        assert!(JointType::Continuous.is_actuated());
        assert!(JointType::Prismatic.is_actuated());
        assert!(!JointType::Fixed.is_actuated());
    }

    #[test]
    fn joint_type_is_revolute() {
        assert!(JointType::Revolute.is_revolute());
        assert!(JointType::Continuous.is_revolute());
        assert!(!JointType::Prismatic.is_revolute());
        assert!(!JointType::Fixed.is_revolute());
    }

    #[test]
    fn origin_default_is_zero() {
        let o = Origin::default();
        assert!(o.xyz.iter().all(|v| v.abs() < f64::EPSILON));
        assert!(o.rpy.iter().all(|v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn joint_data_defaults() {
        let j = JointData::revolute("j1", "base", "link1");
        assert_eq!(j.joint_type, JointType::Revolute);
        assert_eq!(j.axis, [0.0, 0.0, 1.0]);
        assert_eq!(j.origin, Origin::default());
        assert!(j.dof_index.is_none());
    }

    #[test]
    fn joint_data_builder_methods() {
        let j = JointData::prismatic("slide", "base", "carriage")
            .with_origin(Origin::from_xyz(0.0, 0.0, 0.5))
            .with_axis([1.0, 0.0, 0.0]);
        assert_eq!(j.origin.xyz, [0.0, 0.0, 0.5]);
        assert_eq!(j.axis, [1.0, 0.0, 0.0]);
    }
}
