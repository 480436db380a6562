//! Anchor and solver configuration.
//!
//! An [`AnchorConfig`] is validated when it is built and is read-only
//! afterwards. [`SolverSettings`] controls the root finder and the residual
//! check applied to its answer.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::geometry::{Displacement, Member};

/// Rigging geometry, member stiffness and the applied load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnchorConfig {
    /// Members in a fixed order; every derived quantity follows this order.
    members: Vec<Member>,
    /// Stiffness coefficient in newtons per metre.
    stiffness: f64,
    /// External load along the Y axis in newtons.
    load: f64,
}

/// Unvalidated mirror of [`AnchorConfig`] used for deserialization.
#[derive(Deserialize)]
struct RawAnchorConfig {
    /// Members as written in the source document.
    members: Vec<Member>,
    /// Stiffness coefficient in newtons per metre.
    stiffness: f64,
    /// External load in newtons.
    load: f64,
}

impl AnchorConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when there are no members, when a member length is
    /// not strictly positive and finite, when an angle is not finite, when the
    /// stiffness is not strictly positive and finite, or when the load is not finite.
    ///
    /// # Examples
    /// ```
    /// use anchorx::{member, AnchorConfig};
    ///
    /// let config = AnchorConfig::new(vec![member(1.0, 0.0)], 800.0, 1_000.0)
    ///     .expect("valid configuration");
    /// assert_eq!(config.member_count(), 1);
    /// ```
    pub fn new(members: Vec<Member>, stiffness: f64, load: f64) -> Result<Self, ConfigurationError> {
        if members.is_empty() {
            return Err(ConfigurationError::NoMembers);
        }
        for (index, member) in members.iter().enumerate() {
            if !(member.length.is_finite() && member.length > 0.0) {
                return Err(ConfigurationError::NonPositiveLength {
                    member: index,
                    length: member.length,
                });
            }
            if !member.angle.is_finite() {
                return Err(ConfigurationError::NonFiniteAngle {
                    member: index,
                    angle: member.angle,
                });
            }
        }
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(ConfigurationError::NonPositiveStiffness(stiffness));
        }
        if !load.is_finite() {
            return Err(ConfigurationError::NonFiniteLoad(load));
        }
        Ok(Self {
            members,
            stiffness,
            load,
        })
    }

    /// Parse and validate a JSON document of the form
    /// `{"members": [{"length": .., "angle": ..}], "stiffness": .., "load": ..}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed JSON and the same
    /// validation errors as [`AnchorConfig::new`] otherwise.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigurationError> {
        let raw: RawAnchorConfig = serde_json::from_str(source)
            .map_err(|error| ConfigurationError::Parse(error.to_string()))?;
        Self::new(raw.members, raw.stiffness, raw.load)
    }

    /// Members in configuration order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Stiffness coefficient in newtons per metre.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// External load in newtons.
    #[must_use]
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Copy of this configuration with a different load.
    #[must_use]
    pub fn with_load(&self, load: f64) -> Self {
        Self {
            load,
            ..self.clone()
        }
    }
}

impl<'de> Deserialize<'de> for AnchorConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawAnchorConfig::deserialize(deserializer)?;
        Self::new(raw.members, raw.stiffness, raw.load).map_err(serde::de::Error::custom)
    }
}

/// Parameters for the root finder and the check applied to its answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Starting displacement. Kept off the origin, where every member is
    /// unstretched and the Jacobian can vanish.
    pub initial_guess: Displacement,

    /// Maximum Newton iterations.
    pub max_iterations: usize,

    /// Residual norm (N) at which the root finder stops.
    pub tolerance: f64,

    /// Largest residual norm (N) accepted when the answer is re-checked.
    pub verification_tolerance: f64,

    /// Relative step used for the finite-difference Jacobian.
    pub jacobian_step: f64,

    /// Smallest fraction of a Newton step the line search will try.
    pub min_step_scale: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            initial_guess: Displacement::new(0.0, 0.01),
            max_iterations: 100,
            tolerance: 1.0e-9,
            verification_tolerance: 1.0e-6,
            jacobian_step: 1.49e-8,
            min_step_scale: 1.0e-10,
        }
    }
}

impl SolverSettings {
    /// Settings with a different starting displacement.
    #[must_use]
    pub fn with_initial_guess(self, initial_guess: Displacement) -> Self {
        Self {
            initial_guess,
            ..self
        }
    }
}
