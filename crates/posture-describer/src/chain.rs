//! Kinematic chain resolved from a [`KinBody`] between two links.
//!
//! A [`KinematicChain`] is the ordered list of actuated joints from a base
//! link to an end-effector link. It stores the static transforms and joint
//! axes needed to place every joint in the base-link frame for a given
//! configuration.

use std::fmt;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, UnitVector3, Vector3};

use posture_body::{JointData, JointType, KinBody, Origin};

use crate::error::PostureError;

/// Axes shorter than this are treated as missing.
const MIN_AXIS_NORM: f64 = 1e-12;

// ---------------------------------------------------------------------------
// LinkPair
// ---------------------------------------------------------------------------

/// The two endpoints of a kinematics chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkPair {
    pub base_link: String,
    pub end_effector_link: String,
}

impl LinkPair {
    pub fn new(base_link: impl Into<String>, end_effector_link: impl Into<String>) -> Self {
        Self {
            base_link: base_link.into(),
            end_effector_link: end_effector_link.into(),
        }
    }
}

impl fmt::Display for LinkPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.base_link, self.end_effector_link)
    }
}

// ---------------------------------------------------------------------------
// ChainJoint / JointFrame
// ---------------------------------------------------------------------------

/// A single actuated joint in the chain.
#[derive(Debug, Clone)]
pub struct ChainJoint {
    /// Name of this joint in the body.
    pub name: String,
    pub joint_type: JointType,
    /// Static transform from the previous chain joint's child frame (or the
    /// base link) to this joint frame, including folded fixed joints.
    pub origin: Isometry3<f64>,
    /// Joint axis in the joint's local frame.
    pub axis: UnitVector3<f64>,
    /// Index into the body's full DOF vector.
    pub dof_index: usize,
}

/// A joint's line of action in the base-link frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFrame {
    /// A point on the joint axis.
    pub anchor: Vector3<f64>,
    /// Unit axis direction.
    pub axis: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// KinematicChain
// ---------------------------------------------------------------------------

/// An ordered kinematic chain from base link to end-effector link.
#[derive(Debug, Clone)]
pub struct KinematicChain {
    link_pair: LinkPair,
    joints: Vec<ChainJoint>,
}

impl KinematicChain {
    /// Resolve the chain between `link_pair`'s endpoints.
    ///
    /// Walks parent joints from the end-effector link up to the base link.
    /// Fixed joints on the way are folded into the next actuated joint's
    /// origin; fixed joints after the last actuated joint are dropped.
    ///
    /// # Errors
    ///
    /// - [`PostureError::Body`] if either link does not exist.
    /// - [`PostureError::ChainNotFound`] if the base link is not an ancestor
    ///   of the end-effector link.
    /// - [`PostureError::EmptyChain`] if no actuated joint lies between them.
    /// - [`PostureError::DegenerateAxis`] if an actuated joint has no axis.
    pub fn resolve(body: &KinBody, link_pair: &LinkPair) -> Result<Self, PostureError> {
        body.link(&link_pair.base_link)?;
        body.link(&link_pair.end_effector_link)?;

        let path = path_between(body, link_pair).ok_or_else(|| PostureError::ChainNotFound {
            base: link_pair.base_link.clone(),
            end_effector: link_pair.end_effector_link.clone(),
        })?;

        let mut joints = Vec::new();
        let mut accumulated_fixed = Isometry3::identity();

        for joint in path {
            let joint_origin = origin_to_isometry(&joint.origin);

            match joint.dof_index {
                Some(dof_index) if joint.joint_type.is_actuated() => {
                    let axis = Vector3::from(joint.axis);
                    let axis = UnitVector3::try_new(axis, MIN_AXIS_NORM)
                        .ok_or_else(|| PostureError::DegenerateAxis(joint.name.clone()))?;

                    joints.push(ChainJoint {
                        name: joint.name.clone(),
                        joint_type: joint.joint_type,
                        origin: accumulated_fixed * joint_origin,
                        axis,
                        dof_index,
                    });
                    accumulated_fixed = Isometry3::identity();
                }
                _ => accumulated_fixed *= joint_origin,
            }
        }

        if joints.is_empty() {
            return Err(PostureError::EmptyChain {
                base: link_pair.base_link.clone(),
                end_effector: link_pair.end_effector_link.clone(),
            });
        }

        Ok(Self {
            link_pair: link_pair.clone(),
            joints,
        })
    }

    pub fn link_pair(&self) -> &LinkPair {
        &self.link_pair
    }

    /// Number of actuated degrees of freedom.
    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    /// Joint names in chain order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn joints(&self) -> &[ChainJoint] {
        &self.joints
    }

    /// DOF indices into the owning body's joint-value vector, in chain order.
    pub fn dof_indices(&self) -> Vec<usize> {
        self.joints.iter().map(|j| j.dof_index).collect()
    }

    /// Whether every joint rotates (revolute or continuous).
    pub fn is_all_revolute(&self) -> bool {
        self.joints.iter().all(|j| j.joint_type.is_revolute())
    }

    /// Place every joint axis in the base-link frame for configuration `q`.
    ///
    /// Each frame is recorded before its own joint motion is applied, so a
    /// joint's value moves only the joints after it.
    pub fn joint_frames(&self, q: &[f64]) -> Result<Vec<JointFrame>, PostureError> {
        if q.len() != self.dof() {
            return Err(PostureError::DofMismatch {
                expected: self.dof(),
                got: q.len(),
            });
        }

        let mut transform = Isometry3::identity();
        let mut frames = Vec::with_capacity(self.dof());

        for (joint, &value) in self.joints.iter().zip(q) {
            transform *= joint.origin;
            frames.push(JointFrame {
                anchor: transform.translation.vector,
                axis: transform.rotation * joint.axis.into_inner(),
            });
            transform *= joint_transform(&joint.axis, joint.joint_type, value);
        }

        Ok(frames)
    }
}

/// Joints from `base_link` down to `end_effector_link`, in chain order.
///
/// The body is a tree, so the upward walk from the end effector is the only
/// candidate path; it fails when it reaches the root without meeting the
/// base link.
fn path_between<'a>(body: &'a KinBody, link_pair: &LinkPair) -> Option<Vec<&'a JointData>> {
    let mut path = Vec::new();
    let mut link = link_pair.end_effector_link.as_str();
    while link != link_pair.base_link {
        let joint = body.parent_joint(link)?;
        path.push(joint);
        link = joint.parent.as_str();
    }
    path.reverse();
    Some(path)
}

/// Convert an [`Origin`] (xyz + extrinsic roll-pitch-yaw) to an [`Isometry3`].
fn origin_to_isometry(origin: &Origin) -> Isometry3<f64> {
    let [x, y, z] = origin.xyz;
    let [roll, pitch, yaw] = origin.rpy;
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// Compute the transform for a single joint at a given position.
fn joint_transform(axis: &UnitVector3<f64>, joint_type: JointType, position: f64) -> Isometry3<f64> {
    match joint_type {
        JointType::Prismatic => Isometry3::from_parts(
            Translation3::from(axis.into_inner() * position),
            UnitQuaternion::identity(),
        ),
        JointType::Revolute | JointType::Continuous => Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(axis, position),
        ),
        JointType::Fixed => Isometry3::identity(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use posture_body::BodyError;
    use posture_test_utils::{branched_torso, rail_mounted_six_dof_arm, six_dof_arm};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn resolve_six_dof_arm() {
        let body = six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "tool0")).unwrap();
        assert_eq!(chain.dof(), 6);
        assert_eq!(
            chain.joint_names(),
            vec![
                "j1_base_yaw",
                "j2_shoulder_pitch",
                "j3_elbow_pitch",
                "j4_forearm_roll",
                "j5_wrist_pitch",
                "j6_wrist_roll",
            ]
        );
        assert_eq!(chain.dof_indices(), vec![0, 1, 2, 3, 4, 5]);
        assert!(chain.is_all_revolute());
    }

    #[test]
    fn resolve_sub_chain() {
        let body = six_dof_arm();
        let chain =
            KinematicChain::resolve(&body, &LinkPair::new("upper_arm", "wrist_link")).unwrap();
        assert_eq!(
            chain.joint_names(),
            vec!["j3_elbow_pitch", "j4_forearm_roll", "j5_wrist_pitch"]
        );
        assert_eq!(chain.dof_indices(), vec![2, 3, 4]);
    }

    #[test]
    fn resolve_rail_arm_skips_rail_dof() {
        let body = rail_mounted_six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "tool0")).unwrap();
        assert_eq!(chain.dof_indices(), vec![1, 2, 3, 4, 5, 6]);

        let full = KinematicChain::resolve(&body, &LinkPair::new("world", "tool0")).unwrap();
        assert_eq!(full.dof(), 7);
        assert!(!full.is_all_revolute());
    }

    #[test]
    fn resolve_across_branches_fails() {
        let body = branched_torso();
        let err = KinematicChain::resolve(&body, &LinkPair::new("left_hand", "right_hand"))
            .unwrap_err();
        assert_eq!(
            err,
            PostureError::ChainNotFound {
                base: "left_hand".into(),
                end_effector: "right_hand".into(),
            }
        );

        let err = KinematicChain::resolve(&body, &LinkPair::new("left_upper", "right_hand"))
            .unwrap_err();
        assert!(matches!(err, PostureError::ChainNotFound { .. }));
    }

    #[test]
    fn resolve_shared_trunk() {
        let body = branched_torso();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("pelvis", "right_hand")).unwrap();
        assert_eq!(
            chain.joint_names(),
            vec!["waist", "right_shoulder", "right_elbow"]
        );
        assert_eq!(chain.dof_indices(), vec![0, 3, 4]);
    }

    #[test]
    fn resolve_reversed_pair_fails() {
        let body = six_dof_arm();
        let err = KinematicChain::resolve(&body, &LinkPair::new("tool0", "base")).unwrap_err();
        assert!(matches!(err, PostureError::ChainNotFound { .. }));
    }

    #[test]
    fn resolve_missing_link_fails() {
        let body = six_dof_arm();
        let err = KinematicChain::resolve(&body, &LinkPair::new("base", "nonexistent")).unwrap_err();
        assert_eq!(
            err,
            PostureError::Body(BodyError::MissingLink("nonexistent".into()))
        );
    }

    #[test]
    fn resolve_without_actuated_joints_fails() {
        let body = six_dof_arm();
        let err = KinematicChain::resolve(&body, &LinkPair::new("base", "base")).unwrap_err();
        assert!(matches!(err, PostureError::EmptyChain { .. }));

        let err =
            KinematicChain::resolve(&body, &LinkPair::new("end_effector", "tool0")).unwrap_err();
        assert!(matches!(err, PostureError::EmptyChain { .. }));
    }

    #[test]
    fn resolve_rejects_zero_axis() {
        let body = KinBody::builder("broken")
            .link("base")
            .link("arm")
            .joint(JointData::revolute("j", "base", "arm").with_axis([0.0, 0.0, 0.0]))
            .build()
            .unwrap();
        let err = KinematicChain::resolve(&body, &LinkPair::new("base", "arm")).unwrap_err();
        assert_eq!(err, PostureError::DegenerateAxis("j".into()));
    }

    #[test]
    fn frames_at_zero_configuration() {
        let body = six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "tool0")).unwrap();
        let frames = chain.joint_frames(&[0.0; 6]).unwrap();

        let heights = [0.05, 0.25, 0.55, 0.65, 0.85, 0.91];
        for (frame, &z) in frames.iter().zip(&heights) {
            assert_relative_eq!(frame.anchor.x, 0.0, epsilon = 1e-12);
            assert_relative_eq!(frame.anchor.y, 0.0, epsilon = 1e-12);
            assert_relative_eq!(frame.anchor.z, z, epsilon = 1e-12);
        }
        assert_relative_eq!(frames[0].axis, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(frames[1].axis, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(frames[4].axis, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn frames_follow_shoulder_pitch() {
        let body = six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "tool0")).unwrap();
        let frames = chain
            .joint_frames(&[0.0, FRAC_PI_2, 0.0, 0.0, 0.0, 0.0])
            .unwrap();

        // The shoulder joint itself does not move; everything after it tips to +x.
        assert_relative_eq!(frames[1].anchor, Vector3::new(0.0, 0.0, 0.25), epsilon = 1e-12);
        assert_relative_eq!(frames[2].anchor, Vector3::new(0.3, 0.0, 0.25), epsilon = 1e-12);
        assert_relative_eq!(frames[3].axis, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn frames_fold_fixed_mount_and_prismatic_rail() {
        let body = rail_mounted_six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("world", "tool0")).unwrap();
        let mut q = [0.0; 7];
        q[0] = 0.5;
        let frames = chain.joint_frames(&q).unwrap();

        assert_relative_eq!(frames[0].anchor, Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(frames[0].axis, Vector3::x(), epsilon = 1e-12);
        // arm_mount (z 0.4) folded into j1's origin (z 0.05), shifted by the rail.
        assert_relative_eq!(frames[1].anchor, Vector3::new(0.5, 0.0, 0.45), epsilon = 1e-12);
    }

    #[test]
    fn frames_apply_origin_rotation() {
        let body = KinBody::builder("yawed")
            .link("base")
            .link("arm")
            .joint(
                JointData::revolute("j", "base", "arm")
                    .with_origin(Origin::new([0.0, 0.0, 0.1], [0.0, 0.0, FRAC_PI_2]))
                    .with_axis([1.0, 0.0, 0.0]),
            )
            .build()
            .unwrap();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "arm")).unwrap();
        let frames = chain.joint_frames(&[0.3]).unwrap();
        assert_relative_eq!(frames[0].axis, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn frames_reject_wrong_length() {
        let body = six_dof_arm();
        let chain = KinematicChain::resolve(&body, &LinkPair::new("base", "tool0")).unwrap();
        assert_eq!(
            chain.joint_frames(&[0.0; 5]).unwrap_err(),
            PostureError::DofMismatch {
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn origin_to_isometry_translation() {
        let iso = origin_to_isometry(&Origin::from_xyz(1.0, 2.0, 3.0));
        assert_relative_eq!(iso.translation.vector, Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(iso.rotation.angle(), 0.0);
    }

    #[test]
    fn link_pair_display() {
        assert_eq!(LinkPair::new("base", "tool0").to_string(), "base -> tool0");
    }
}
