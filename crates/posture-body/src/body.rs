//! The kinematic body: a tree of links and joints plus live joint values.

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::RwLock;

use crate::error::BodyError;
use crate::types::{JointData, LinkData};

// ---------------------------------------------------------------------------
// KinBody
// ---------------------------------------------------------------------------

/// A robot body: its link/joint tree and the current value of every DOF.
///
/// The topology is immutable once built. Joint values live behind a lock so
/// a body can be shared as `Arc<KinBody>` between the code that moves it and
/// the code that inspects it.
#[derive(Debug)]
pub struct KinBody {
    name: String,
    links: HashMap<String, LinkData>,
    joints: HashMap<String, JointData>,
    /// Child link name -> name of the joint that has it as child.
    parent_joints: HashMap<String, String>,
    /// Actuated joint names, indexed by DOF index.
    dof_joints: Vec<String>,
    root_link: String,
    dof_values: RwLock<Vec<f64>>,
}

impl KinBody {
    /// Start building a body.
    pub fn builder(name: impl Into<String>) -> KinBodyBuilder {
        KinBodyBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the root link (the one that is never a child).
    pub fn root_link(&self) -> &str {
        &self.root_link
    }

    /// Get a link by name.
    pub fn link(&self, name: &str) -> Result<&LinkData, BodyError> {
        self.links
            .get(name)
            .ok_or_else(|| BodyError::MissingLink(name.into()))
    }

    /// Get a joint by name.
    pub fn joint(&self, name: &str) -> Result<&JointData, BodyError> {
        self.joints
            .get(name)
            .ok_or_else(|| BodyError::MissingJoint(name.into()))
    }

    pub fn has_link(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    /// The joint whose child is `link`. `None` for the root link or an
    /// unknown link.
    pub fn parent_joint(&self, link: &str) -> Option<&JointData> {
        self.parent_joints
            .get(link)
            .and_then(|joint| self.joints.get(joint))
    }

    /// Joints whose parent is `link`, sorted by name.
    pub fn child_joints(&self, link: &str) -> Vec<&JointData> {
        let mut children: Vec<&JointData> =
            self.joints.values().filter(|j| j.parent == link).collect();
        children.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Number of degrees of freedom.
    pub fn dof(&self) -> usize {
        self.dof_joints.len()
    }

    /// The joint that owns DOF `index`.
    pub fn dof_joint(&self, index: usize) -> Option<&JointData> {
        self.dof_joints
            .get(index)
            .and_then(|name| self.joints.get(name))
    }

    /// Names of all joints, sorted alphabetically.
    pub fn joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Snapshot of the full joint-value vector.
    pub fn dof_values(&self) -> Vec<f64> {
        self.dof_values.read().clone()
    }

    /// Read the values at `indices`, in the order given, under one lock.
    pub fn dof_values_at(&self, indices: &[usize]) -> Result<Vec<f64>, BodyError> {
        let values = self.dof_values.read();
        indices
            .iter()
            .map(|&index| {
                values.get(index).copied().ok_or(BodyError::DofIndexOutOfRange {
                    index,
                    dof: values.len(),
                })
            })
            .collect()
    }

    /// Replace the full joint-value vector.
    pub fn set_dof_values(&self, values: &[f64]) -> Result<(), BodyError> {
        let mut current = self.dof_values.write();
        if values.len() != current.len() {
            return Err(BodyError::DofMismatch {
                expected: current.len(),
                got: values.len(),
            });
        }
        current.copy_from_slice(values);
        Ok(())
    }

    /// Set a single DOF value.
    pub fn set_dof_value(&self, index: usize, value: f64) -> Result<(), BodyError> {
        let mut current = self.dof_values.write();
        let dof = current.len();
        let slot = current
            .get_mut(index)
            .ok_or(BodyError::DofIndexOutOfRange { index, dof })?;
        *slot = value;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// KinBodyBuilder
// ---------------------------------------------------------------------------

/// Validating builder for [`KinBody`].
///
/// DOF indices are assigned to actuated joints in the order they are added.
#[derive(Debug, Clone)]
pub struct KinBodyBuilder {
    name: String,
    links: Vec<LinkData>,
    joints: Vec<JointData>,
}

impl KinBodyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    #[must_use]
    pub fn link(mut self, name: impl Into<String>) -> Self {
        self.links.push(LinkData::new(name));
        self
    }

    #[must_use]
    pub fn joint(mut self, joint: JointData) -> Self {
        self.joints.push(joint);
        self
    }

    /// Validate the tree and assign DOF indices.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, joints referencing unknown links, links with
    /// more than one parent, and trees without exactly one connected root.
    pub fn build(self) -> Result<KinBody, BodyError> {
        let mut links = HashMap::with_capacity(self.links.len());
        let mut link_order = Vec::with_capacity(self.links.len());
        for link in self.links {
            if links.contains_key(&link.name) {
                return Err(BodyError::DuplicateLink(link.name));
            }
            link_order.push(link.name.clone());
            links.insert(link.name.clone(), link);
        }

        let mut joints = HashMap::with_capacity(self.joints.len());
        let mut parent_joints: HashMap<String, String> = HashMap::new();
        let mut dof_joints = Vec::new();
        for mut joint in self.joints {
            if joints.contains_key(&joint.name) {
                return Err(BodyError::DuplicateJoint(joint.name));
            }
            for link in [&joint.parent, &joint.child] {
                if !links.contains_key(link) {
                    return Err(BodyError::MissingLink(link.clone()));
                }
            }
            if let Some(first) = parent_joints.get(&joint.child) {
                return Err(BodyError::MultipleParents {
                    link: joint.child.clone(),
                    first: first.clone(),
                    second: joint.name,
                });
            }
            parent_joints.insert(joint.child.clone(), joint.name.clone());

            joint.dof_index = if joint.joint_type.is_actuated() {
                dof_joints.push(joint.name.clone());
                Some(dof_joints.len() - 1)
            } else {
                None
            };
            joints.insert(joint.name.clone(), joint);
        }

        let mut roots = link_order
            .iter()
            .filter(|name| !parent_joints.contains_key(name.as_str()));
        let root_link = roots.next().ok_or(BodyError::NoRootLink)?.clone();
        if let Some(second) = roots.next() {
            return Err(BodyError::MultipleRootLinks {
                first: root_link,
                second: second.clone(),
            });
        }

        // A single root with one parent per other link can still hide a
        // detached cycle, so check every link is reachable from the root.
        let mut reached: HashSet<&str> = HashSet::with_capacity(links.len());
        let mut queue = VecDeque::from([root_link.as_str()]);
        while let Some(link) = queue.pop_front() {
            if reached.insert(link) {
                queue.extend(
                    joints
                        .values()
                        .filter(|j| j.parent == link)
                        .map(|j| j.child.as_str()),
                );
            }
        }
        if let Some(orphan) = link_order.iter().find(|l| !reached.contains(l.as_str())) {
            return Err(BodyError::UnreachableLink(orphan.clone()));
        }

        let dof = dof_joints.len();
        Ok(KinBody {
            name: self.name,
            links,
            joints,
            parent_joints,
            dof_joints,
            root_link,
            dof_values: RwLock::new(vec![0.0; dof]),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
