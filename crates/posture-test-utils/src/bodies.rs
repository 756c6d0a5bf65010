//! Fixture bodies shared by the posture test suites.
//!
//! Geometry is chosen so posture values have simple closed forms at
//! hand-picked configurations; each fixture documents the layout.

use std::sync::Arc;

use posture_body::{JointData, KinBody, KinBodyBuilder, Origin};

const Z: [f64; 3] = [0.0, 0.0, 1.0];
const Y: [f64; 3] = [0.0, 1.0, 0.0];

fn revolute(name: &str, parent: &str, child: &str, z_offset: f64, axis: [f64; 3]) -> JointData {
    JointData::revolute(name, parent, child)
        .with_origin(Origin::from_xyz(0.0, 0.0, z_offset))
        .with_axis(axis)
}

fn add_six_dof_arm(builder: KinBodyBuilder, base: &str) -> KinBodyBuilder {
    builder
        .link("shoulder_link")
        .link("upper_arm")
        .link("elbow_link")
        .link("forearm")
        .link("wrist_link")
        .link("end_effector")
        .link("tool0")
        .joint(revolute("j1_base_yaw", base, "shoulder_link", 0.05, Z))
        .joint(revolute("j2_shoulder_pitch", "shoulder_link", "upper_arm", 0.2, Y))
        .joint(revolute("j3_elbow_pitch", "upper_arm", "elbow_link", 0.3, Y))
        .joint(revolute("j4_forearm_roll", "elbow_link", "forearm", 0.1, Z))
        .joint(revolute("j5_wrist_pitch", "forearm", "wrist_link", 0.2, Y))
        .joint(revolute("j6_wrist_roll", "wrist_link", "end_effector", 0.06, Z))
        .joint(
            JointData::fixed("tool_mount", "end_effector", "tool0")
                .with_origin(Origin::from_xyz(0.0, 0.0, 0.1)),
        )
}

/// Upright 6R arm with a spherical wrist.
///
/// Joint axes at the zero configuration, all anchors on the `z` axis:
/// `z@0.05, y@0.25, y@0.55, z@0.65, y@0.85, z@0.91`, then a fixed
/// `tool0` frame at `z = 1.01`. With `j1 = j4 = 0` the posture values are
/// `shoulder = -0.3 (sin q2 + sin(q2 + q3))`, `elbow = 0.09 sin q3` and
/// `wrist = -sin q5`.
pub fn six_dof_arm() -> Arc<KinBody> {
    let body = add_six_dof_arm(KinBody::builder("six_dof_arm").link("base"), "base")
        .build()
        .expect("six_dof_arm fixture is valid");
    Arc::new(body)
}

/// The [`six_dof_arm`] mounted on a prismatic rail.
///
/// The rail owns DOF 0, so the arm joints sit at DOF indices `1..=6`.
pub fn rail_mounted_six_dof_arm() -> Arc<KinBody> {
    let builder = KinBody::builder("rail_arm")
        .link("world")
        .link("carriage")
        .link("base")
        .joint(JointData::prismatic("rail", "world", "carriage").with_axis([1.0, 0.0, 0.0]))
        .joint(
            JointData::fixed("arm_mount", "carriage", "base")
                .with_origin(Origin::from_xyz(0.0, 0.0, 0.4)),
        );
    let body = add_six_dof_arm(builder, "base")
        .build()
        .expect("rail_arm fixture is valid");
    Arc::new(body)
}

/// Planar-elbow 4R arm: `z@0.1, y@0.3, y@0.7, y@1.0`, tip link at `1.1`.
///
/// With `j1 = 0` the posture values are
/// `shoulder = -(0.4 sin q2 + 0.3 sin(q2 + q3))` and `elbow = 0.12 sin q3`.
pub fn four_r_arm() -> Arc<KinBody> {
    let body = KinBody::builder("four_r_arm")
        .link("base")
        .link("link1")
        .link("link2")
        .link("link3")
        .link("link4")
        .link("tip")
        .joint(revolute("j1", "base", "link1", 0.1, Z))
        .joint(revolute("j2", "link1", "link2", 0.2, Y))
        .joint(revolute("j3", "link2", "link3", 0.4, Y))
        .joint(revolute("j4", "link3", "link4", 0.3, Y))
        .joint(
            JointData::fixed("tip_mount", "link4", "tip")
                .with_origin(Origin::from_xyz(0.0, 0.0, 0.1)),
        )
        .build()
        .expect("four_r_arm fixture is valid");
    Arc::new(body)
}

/// Two revolute joints about `z`; no posture formulation covers it.
pub fn two_link_arm() -> Arc<KinBody> {
    let body = KinBody::builder("two_link_arm")
        .link("base")
        .link("upper_arm")
        .link("forearm")
        .link("end_effector")
        .joint(revolute("shoulder", "base", "upper_arm", 0.05, Z))
        .joint(revolute("elbow", "upper_arm", "forearm", 0.3, Z))
        .joint(
            JointData::fixed("ee_fixed", "forearm", "end_effector")
                .with_origin(Origin::from_xyz(0.0, 0.0, 0.25)),
        )
        .build()
        .expect("two_link_arm fixture is valid");
    Arc::new(body)
}

/// Six joints with a prismatic third joint; right length, wrong joint types.
pub fn six_dof_prismatic_arm() -> Arc<KinBody> {
    let body = KinBody::builder("six_dof_prismatic_arm")
        .link("base")
        .link("l1")
        .link("l2")
        .link("l3")
        .link("l4")
        .link("l5")
        .link("l6")
        .joint(revolute("j1", "base", "l1", 0.05, Z))
        .joint(revolute("j2", "l1", "l2", 0.2, Y))
        .joint(
            JointData::prismatic("j3", "l2", "l3")
                .with_origin(Origin::from_xyz(0.0, 0.0, 0.3)),
        )
        .joint(revolute("j4", "l3", "l4", 0.1, Z))
        .joint(revolute("j5", "l4", "l5", 0.2, Y))
        .joint(revolute("j6", "l5", "l6", 0.06, Z))
        .build()
        .expect("six_dof_prismatic_arm fixture is valid");
    Arc::new(body)
}

/// Torso with a yaw joint and two 2-link arms branching off it.
///
/// Links: `pelvis -> torso -> {left_upper -> left_hand, right_upper -> right_hand}`.
pub fn branched_torso() -> Arc<KinBody> {
    let body = KinBody::builder("branched_torso")
        .link("pelvis")
        .link("torso")
        .link("left_upper")
        .link("left_hand")
        .link("right_upper")
        .link("right_hand")
        .joint(revolute("waist", "pelvis", "torso", 0.3, Z))
        .joint(revolute("left_shoulder", "torso", "left_upper", 0.2, Y))
        .joint(revolute("left_elbow", "left_upper", "left_hand", 0.25, Y))
        .joint(revolute("right_shoulder", "torso", "right_upper", 0.2, Y))
        .joint(revolute("right_elbow", "right_upper", "right_hand", 0.25, Y))
        .build()
        .expect("branched_torso fixture is valid");
    Arc::new(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
