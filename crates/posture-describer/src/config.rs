use serde::{Deserialize, Serialize};

use crate::chain::LinkPair;
use crate::describer::DEFAULT_POSTURE_VALUE_THRESHOLD;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_posture_value_threshold() -> f64 {
    DEFAULT_POSTURE_VALUE_THRESHOLD
}

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// Endpoints of the kinematics chain to describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub base_link: String,
    pub end_effector_link: String,
}

impl ChainConfig {
    pub fn link_pair(&self) -> LinkPair {
        LinkPair::new(self.base_link.clone(), self.end_effector_link.clone())
    }
}

// ---------------------------------------------------------------------------
// DescriberConfig
// ---------------------------------------------------------------------------

/// Posture describer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriberConfig {
    /// Half-width of the ambiguity band around zero (default: 1e-6).
    #[serde(default = "default_posture_value_threshold")]
    pub posture_value_threshold: f64,

    /// Chain to initialize on construction. `None` leaves the describer
    /// uninitialized.
    #[serde(default)]
    pub kinematics_chain: Option<ChainConfig>,
}

impl Default for DescriberConfig {
    fn default() -> Self {
        Self {
            posture_value_threshold: default_posture_value_threshold(),
            kinematics_chain: None,
        }
    }
}

impl DescriberConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.posture_value_threshold;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "posture_value_threshold".into(),
                message: format!("{tol} (must be finite and >= 0)"),
            });
        }
        if let Some(chain) = &self.kinematics_chain {
            for (field, name) in [
                ("kinematics_chain.base_link", &chain.base_link),
                ("kinematics_chain.end_effector_link", &chain.end_effector_link),
            ] {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: field.into(),
                        message: "link name must not be empty".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse and validate TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
