//! [`PostureDescriber`]: binds a kinematics chain of a body to its posture
//! formulation and classifies configurations into posture states.
//!
//! # Usage
//!
//! 1. Create a describer for a shared [`KinBody`].
//! 2. Call [`PostureDescriber::init`] with the base and end-effector links.
//! 3. Call [`PostureDescriber::compute_posture_states`] with explicit joint
//!    values, or `None` to read the body's current values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use posture_body::KinBody;
use tracing::{debug, trace, warn};

use crate::chain::{ChainJoint, JointFrame, KinematicChain, LinkPair};
use crate::config::DescriberConfig;
use crate::error::PostureError;
use crate::formulation::Formulation;
use crate::state::{PostureSign, PostureState};

/// Default half-width of the ambiguity band around zero.
pub const DEFAULT_POSTURE_VALUE_THRESHOLD: f64 = 1e-6;

/// Everything fixed by a successful [`PostureDescriber::init`].
#[derive(Debug)]
struct Binding {
    chain: KinematicChain,
    arm_indices: Vec<usize>,
    formulation: Formulation,
}

/// Describes the discrete posture of one kinematics chain of a body.
///
/// Classification only reads shared state, so a describer can be used from
/// several threads at once. The threshold is stored atomically and may be
/// changed through `&self` at any time; it applies from the next call on.
#[derive(Debug)]
pub struct PostureDescriber {
    body: Arc<KinBody>,
    /// `f64` bit pattern of the posture value threshold.
    threshold: AtomicU64,
    binding: Option<Binding>,
}

impl PostureDescriber {
    /// Create an uninitialized describer with the default threshold.
    pub fn new(body: Arc<KinBody>) -> Self {
        Self {
            body,
            threshold: AtomicU64::new(DEFAULT_POSTURE_VALUE_THRESHOLD.to_bits()),
            binding: None,
        }
    }

    /// Create an uninitialized describer with threshold `tol`.
    pub fn with_threshold(body: Arc<KinBody>, tol: f64) -> Result<Self, PostureError> {
        let describer = Self::new(body);
        describer.set_posture_value_threshold(tol)?;
        Ok(describer)
    }

    /// Create a describer from configuration, initializing the chain when
    /// the configuration names one.
    pub fn from_config(body: Arc<KinBody>, config: &DescriberConfig) -> Result<Self, PostureError> {
        let mut describer = Self::with_threshold(body, config.posture_value_threshold)?;
        if let Some(chain) = &config.kinematics_chain {
            describer.init(&chain.link_pair())?;
        }
        Ok(describer)
    }

    pub fn body(&self) -> &Arc<KinBody> {
        &self.body
    }

    /// Whether a posture formulation exists for the chain between
    /// `link_pair`'s endpoints. Does not touch this describer's binding.
    pub fn supports(&self, link_pair: &LinkPair) -> bool {
        KinematicChain::resolve(&self.body, link_pair)
            .ok()
            .and_then(|chain| Formulation::derive(&chain))
            .is_some()
    }

    /// Bind the chain between `link_pair`'s endpoints.
    ///
    /// On failure any previous binding is dropped and the describer is left
    /// uninitialized.
    pub fn init(&mut self, link_pair: &LinkPair) -> Result<(), PostureError> {
        self.binding = None;

        let chain = KinematicChain::resolve(&self.body, link_pair).map_err(|e| {
            warn!("posture describer: cannot resolve chain {link_pair}: {e}");
            e
        })?;
        let Some(formulation) = Formulation::derive(&chain) else {
            warn!(
                "posture describer: no formulation for chain {link_pair} ({} joints)",
                chain.dof()
            );
            return Err(PostureError::UnsupportedChain(link_pair.to_string()));
        };

        let arm_indices = chain.dof_indices();
        debug!(
            body = self.body.name(),
            chain = %link_pair,
            %formulation,
            ?arm_indices,
            "posture describer initialized"
        );
        self.binding = Some(Binding {
            chain,
            arm_indices,
            formulation,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.binding.is_some()
    }

    /// The bound base and end-effector links.
    pub fn kinematics_chain(&self) -> Option<&LinkPair> {
        self.binding.as_ref().map(|b| b.chain.link_pair())
    }

    pub fn chain(&self) -> Option<&KinematicChain> {
        self.binding.as_ref().map(|b| &b.chain)
    }

    /// Chain joints from base to end effector; empty when uninitialized.
    pub fn joints(&self) -> &[ChainJoint] {
        self.binding
            .as_ref()
            .map(|b| b.chain.joints())
            .unwrap_or_default()
    }

    /// DOF indices of the chain joints in the body; empty when uninitialized.
    pub fn arm_indices(&self) -> &[usize] {
        self.binding
            .as_ref()
            .map(|b| b.arm_indices.as_slice())
            .unwrap_or_default()
    }

    pub fn formulation(&self) -> Option<Formulation> {
        self.binding.as_ref().map(|b| b.formulation)
    }

    /// Current half-width of the ambiguity band.
    pub fn posture_value_threshold(&self) -> f64 {
        f64::from_bits(self.threshold.load(Ordering::Acquire))
    }

    /// Set the half-width of the ambiguity band.
    ///
    /// # Errors
    ///
    /// [`PostureError::InvalidThreshold`] for negative or non-finite values;
    /// the threshold is left unchanged.
    pub fn set_posture_value_threshold(&self, tol: f64) -> Result<(), PostureError> {
        if !tol.is_finite() || tol < 0.0 {
            warn!("posture describer: rejected posture value threshold {tol}");
            return Err(PostureError::InvalidThreshold(tol));
        }
        self.threshold.store(tol.to_bits(), Ordering::Release);
        Ok(())
    }

    /// Raw posture values for `joint_values` (or the body's current values).
    pub fn compute_posture_values(
        &self,
        joint_values: Option<&[f64]>,
    ) -> Result<Vec<f64>, PostureError> {
        let (binding, frames) = self.frames(joint_values)?;
        binding.formulation.posture_values(&frames)
    }

    /// Posture states for `joint_values` (or the body's current values).
    ///
    /// Returns one state per combination of branches left open by values
    /// inside the ambiguity band, in enumeration order.
    ///
    /// # Errors
    ///
    /// - [`PostureError::NotInitialized`] before a successful [`init`](Self::init).
    /// - [`PostureError::DofMismatch`] if `joint_values` does not have one
    ///   entry per chain joint.
    pub fn compute_posture_states(
        &self,
        joint_values: Option<&[f64]>,
    ) -> Result<Vec<PostureState>, PostureError> {
        let (binding, frames) = self.frames(joint_values)?;
        let tol = self.posture_value_threshold();
        if tracing::enabled!(tracing::Level::TRACE) {
            let values = binding.formulation.posture_values(&frames)?;
            trace!(?values, tol, "posture values");
        }
        binding.formulation.posture_states(&frames, tol)
    }

    /// Decode `state` into the sign of each named posture value.
    pub fn interpret(
        &self,
        state: PostureState,
    ) -> Result<Vec<(&'static str, PostureSign)>, PostureError> {
        let formulation = self.formulation().ok_or(PostureError::NotInitialized)?;
        let names = formulation.value_names();
        let count = names.len();
        Ok(names
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, PostureSign::from_bit(state, (count - 1 - i) as u32)))
            .collect())
    }

    fn frames(
        &self,
        joint_values: Option<&[f64]>,
    ) -> Result<(&Binding, Vec<JointFrame>), PostureError> {
        let binding = self.binding.as_ref().ok_or(PostureError::NotInitialized)?;
        let frames = match joint_values {
            Some(values) => binding.chain.joint_frames(values)?,
            None => {
                let values = self.body.dof_values_at(&binding.arm_indices)?;
                binding.chain.joint_frames(&values)?
            }
        };
        Ok((binding, frames))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
