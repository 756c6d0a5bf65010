//! Supported chain shapes and their posture-value functions.
//!
//! A formulation is recognized from the joint types and the relations
//! between neighbouring joint axes. Each one maps the chain's joint frames
//! to a fixed number of posture values whose signs tell the branches apart.

use std::fmt;

use crate::chain::{JointFrame, KinematicChain};
use crate::error::PostureError;
use crate::relation::{neighbouring_relations, JointPairRelation};
use crate::state::{compute_posture_states, PostureState};

/// A chain shape with a closed-form posture evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formulation {
    /// Six revolute joints: perpendicular base/shoulder axes, parallel
    /// shoulder/elbow axes, and a wrist whose last three axes meet at right
    /// angles.
    SixRGeneral,
    /// Four revolute joints: perpendicular base/shoulder axes followed by
    /// three parallel axes.
    FourRTypeA,
}

impl Formulation {
    pub const ALL: [Self; 2] = [Self::SixRGeneral, Self::FourRTypeA];

    /// Find the formulation matching `chain`, if any.
    pub fn derive(chain: &KinematicChain) -> Option<Self> {
        if !chain.is_all_revolute() {
            return None;
        }
        let frames = chain.joint_frames(&vec![0.0; chain.dof()]).ok()?;
        let relations = neighbouring_relations(&frames);
        Self::ALL.into_iter().find(|f| f.matches(&relations))
    }

    fn matches(self, relations: &[JointPairRelation]) -> bool {
        use JointPairRelation::IntersectPerpendicular;
        match self {
            Self::SixRGeneral => matches!(
                relations,
                [r01, r12, _, r34, r45]
                    if r01.is_perpendicular()
                        && r12.is_parallel()
                        && *r34 == IntersectPerpendicular
                        && *r45 == IntersectPerpendicular
            ),
            Self::FourRTypeA => matches!(
                relations,
                [r01, r12, r23]
                    if r01.is_perpendicular() && r12.is_parallel() && r23.is_parallel()
            ),
        }
    }

    /// Number of joints in a matching chain.
    pub const fn dof(self) -> usize {
        match self {
            Self::SixRGeneral => 6,
            Self::FourRTypeA => 4,
        }
    }

    /// Names of the posture values, most significant state bit first.
    pub const fn value_names(self) -> &'static [&'static str] {
        match self {
            Self::SixRGeneral => &["shoulder", "elbow", "wrist"],
            Self::FourRTypeA => &["shoulder", "elbow"],
        }
    }

    pub const fn value_count(self) -> usize {
        self.value_names().len()
    }

    /// Evaluate the raw posture values for `frames`.
    pub fn posture_values(self, frames: &[JointFrame]) -> Result<Vec<f64>, PostureError> {
        Ok(match self {
            Self::SixRGeneral => six_r_general(as_array(frames)?).to_vec(),
            Self::FourRTypeA => four_r_type_a(as_array(frames)?).to_vec(),
        })
    }

    /// Evaluate and classify in one step.
    pub fn posture_states(
        self,
        frames: &[JointFrame],
        tol: f64,
    ) -> Result<Vec<PostureState>, PostureError> {
        Ok(match self {
            Self::SixRGeneral => compute_posture_states(&six_r_general(as_array(frames)?), tol),
            Self::FourRTypeA => compute_posture_states(&four_r_type_a(as_array(frames)?), tol),
        })
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SixRGeneral => f.write_str("6R general"),
            Self::FourRTypeA => f.write_str("4R type A"),
        }
    }
}

fn as_array<const M: usize>(frames: &[JointFrame]) -> Result<&[JointFrame; M], PostureError> {
    frames.try_into().map_err(|_| PostureError::DofMismatch {
        expected: M,
        got: frames.len(),
    })
}

/// Shoulder: which side of the plane spanned by axes 0 and 1 the wrist
/// centre lies on. Elbow: bend direction of joint 2 about axis 1. Wrist:
/// orientation of the three wrist axes.
fn six_r_general(frames: &[JointFrame; 6]) -> [f64; 3] {
    let [j0, j1, j2, j3, j4, j5] = frames;
    [
        j0.axis.cross(&j1.axis).dot(&(j4.anchor - j0.anchor)),
        j1.axis
            .cross(&(j2.anchor - j1.anchor))
            .dot(&(j4.anchor - j2.anchor)),
        j3.axis.cross(&j4.axis).dot(&j5.axis),
    ]
}

/// Same shoulder and elbow terms as [`six_r_general`], with joint 3 as the
/// reference point.
fn four_r_type_a(frames: &[JointFrame; 4]) -> [f64; 2] {
    let [j0, j1, j2, j3] = frames;
    [
        j0.axis.cross(&j1.axis).dot(&(j3.anchor - j0.anchor)),
        j1.axis
            .cross(&(j2.anchor - j1.anchor))
            .dot(&(j3.anchor - j2.anchor)),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::LinkPair;
    use approx::assert_relative_eq;
    use posture_body::{JointData, KinBody, Origin};
    use posture_test_utils::{
        branched_torso, four_r_arm, six_dof_arm, six_dof_prismatic_arm, two_link_arm,
    };

    fn chain(body: &KinBody, base: &str, ee: &str) -> KinematicChain {
        KinematicChain::resolve(body, &LinkPair::new(base, ee)).unwrap()
    }

    #[test]
    fn derive_six_r_general() {
        let body = six_dof_arm();
        assert_eq!(
            Formulation::derive(&chain(&body, "base", "tool0")),
            Some(Formulation::SixRGeneral)
        );
    }

    #[test]
    fn derive_four_r_type_a() {
        let body = four_r_arm();
        assert_eq!(
            Formulation::derive(&chain(&body, "base", "tip")),
            Some(Formulation::FourRTypeA)
        );
    }

    #[test]
    fn derive_rejects_unsupported_shapes() {
        let body = two_link_arm();
        assert_eq!(Formulation::derive(&chain(&body, "base", "end_effector")), None);

        let body = six_dof_prismatic_arm();
        assert_eq!(Formulation::derive(&chain(&body, "base", "l6")), None);

        let body = six_dof_arm();
        assert_eq!(Formulation::derive(&chain(&body, "base", "elbow_link")), None);

        let body = branched_torso();
        assert_eq!(Formulation::derive(&chain(&body, "pelvis", "left_hand")), None);
    }

    #[test]
    fn derive_rejects_offset_wrist() {
        let z = [0.0, 0.0, 1.0];
        let y = [0.0, 1.0, 0.0];
        let joint = |name: &str, parent: &str, child: &str, xyz: [f64; 3], axis: [f64; 3]| {
            JointData::revolute(name, parent, child)
                .with_origin(Origin::new(xyz, [0.0; 3]))
                .with_axis(axis)
        };
        let body = KinBody::builder("offset_wrist")
            .link("base")
            .link("l1")
            .link("l2")
            .link("l3")
            .link("l4")
            .link("l5")
            .link("l6")
            .joint(joint("j1", "base", "l1", [0.0, 0.0, 0.05], z))
            .joint(joint("j2", "l1", "l2", [0.0, 0.0, 0.2], y))
            .joint(joint("j3", "l2", "l3", [0.0, 0.0, 0.3], y))
            .joint(joint("j4", "l3", "l4", [0.0, 0.0, 0.1], z))
            .joint(joint("j5", "l4", "l5", [0.1, 0.0, 0.2], y))
            .joint(joint("j6", "l5", "l6", [0.0, 0.0, 0.06], z))
            .build()
            .unwrap();
        assert_eq!(Formulation::derive(&chain(&body, "base", "l6")), None);
    }

    #[test]
    fn six_r_values_match_closed_form() {
        let body = six_dof_arm();
        let chain = chain(&body, "base", "tool0");
        let (q2, q3, q5) = (0.5, 0.5, 0.5);
        let frames = chain.joint_frames(&[0.0, q2, q3, 0.0, q5, 0.0]).unwrap();
        let values = Formulation::SixRGeneral.posture_values(&frames).unwrap();

        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], -0.3 * (q2.sin() + (q2 + q3).sin()), epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.09 * q3.sin(), epsilon = 1e-12);
        assert_relative_eq!(values[2], -q5.sin(), epsilon = 1e-12);
    }

    #[test]
    fn six_r_values_ignore_base_yaw() {
        let body = six_dof_arm();
        let chain = chain(&body, "base", "tool0");
        let q = [0.0, 0.4, -0.7, 0.3, 0.9, -1.1];
        let mut yawed = q;
        yawed[0] = 1.3;

        let f = Formulation::SixRGeneral;
        let a = f.posture_values(&chain.joint_frames(&q).unwrap()).unwrap();
        let b = f.posture_values(&chain.joint_frames(&yawed).unwrap()).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn four_r_values_match_closed_form() {
        let body = four_r_arm();
        let chain = chain(&body, "base", "tip");
        let (q2, q3) = (0.3, -0.8);
        let frames = chain.joint_frames(&[0.0, q2, q3, 0.2]).unwrap();
        let values = Formulation::FourRTypeA.posture_values(&frames).unwrap();

        assert_eq!(values.len(), 2);
        assert_relative_eq!(
            values[0],
            -(0.4 * q2.sin() + 0.3 * (q2 + q3).sin()),
            epsilon = 1e-12
        );
        assert_relative_eq!(values[1], 0.12 * q3.sin(), epsilon = 1e-12);
    }

    #[test]
    fn states_at_known_configurations() {
        let body = six_dof_arm();
        let chain = chain(&body, "base", "tool0");
        let f = Formulation::SixRGeneral;

        // shoulder < 0, elbow > 0, wrist < 0
        let frames = chain.joint_frames(&[0.0, 0.5, 0.5, 0.0, 0.5, 0.0]).unwrap();
        assert_eq!(f.posture_states(&frames, 1e-6).unwrap(), vec![0b101]);

        // shoulder < 0, elbow < 0, wrist > 0
        let frames = chain.joint_frames(&[0.0, 0.5, -0.5, 0.0, -0.5, 0.0]).unwrap();
        assert_eq!(f.posture_states(&frames, 1e-6).unwrap(), vec![0b110]);

        // Fully stretched upright arm: every value is singular.
        let frames = chain.joint_frames(&[0.0; 6]).unwrap();
        assert_eq!(
            f.posture_states(&frames, 1e-6).unwrap(),
            vec![0b000, 0b100, 0b010, 0b110, 0b001, 0b101, 0b011, 0b111]
        );
    }

    #[test]
    fn wrong_frame_count_is_rejected() {
        let body = four_r_arm();
        let frames = chain(&body, "base", "tip").joint_frames(&[0.0; 4]).unwrap();
        assert_eq!(
            Formulation::SixRGeneral.posture_values(&frames).unwrap_err(),
            PostureError::DofMismatch {
                expected: 6,
                got: 4
            }
        );
        assert!(Formulation::SixRGeneral.posture_states(&frames, 1e-6).is_err());
    }

    #[test]
    fn names_and_counts() {
        for f in Formulation::ALL {
            assert_eq!(f.value_count(), f.value_names().len());
            assert!(f.value_count() <= 16);
        }
        assert_eq!(Formulation::SixRGeneral.dof(), 6);
        assert_eq!(Formulation::FourRTypeA.value_names(), &["shoulder", "elbow"]);
        assert_eq!(Formulation::SixRGeneral.to_string(), "6R general");
    }
}
