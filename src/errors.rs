//! Error types produced while configuring or solving anchors.

use thiserror::Error;

/// Error returned when an anchor configuration is not physically meaningful.
///
/// Configuration is validated once, when an [`AnchorConfig`](crate::AnchorConfig)
/// is built, so the solver never divides by a degenerate member length.
///
/// # Examples
///
/// ```
/// use anchorx::{member, AnchorConfig, ConfigurationError};
///
/// let error = AnchorConfig::new(vec![member(0.0, 0.0)], 800.0, 1_000.0)
///     .expect_err("zero length is rejected");
/// assert_eq!(
///     error,
///     ConfigurationError::NonPositiveLength { member: 0, length: 0.0 }
/// );
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Returned when the anchor has no members to carry the load.
    #[error("anchor has no members")]
    NoMembers,
    /// Returned when a member's rest length is zero, negative or not finite.
    #[error("member {member} has non-positive length (received {length} m)")]
    NonPositiveLength {
        /// Position of the offending member in the member list.
        member: usize,
        /// Rejected rest length in metres.
        length: f64,
    },
    /// Returned when a member's angle is NaN or infinite.
    #[error("member {member} has a non-finite angle (received {angle} rad)")]
    NonFiniteAngle {
        /// Position of the offending member in the member list.
        member: usize,
        /// Rejected angle in radians.
        angle: f64,
    },
    /// Returned when the stiffness coefficient is zero, negative or not finite.
    #[error("stiffness must be positive (received {0} N/m)")]
    NonPositiveStiffness(f64),
    /// Returned when the applied load is NaN or infinite.
    #[error("load must be finite (received {0} N)")]
    NonFiniteLoad(f64),
    /// Returned when a serialized configuration cannot be parsed.
    #[error("configuration could not be parsed: {0}")]
    Parse(String),
}

/// Error returned when the root finder cannot produce a verified equilibrium.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConvergenceError {
    /// Returned when the finite-difference Jacobian cannot be factorised.
    #[error("jacobian is singular at iteration {iteration}; try a different initial guess")]
    SingularJacobian {
        /// Iteration at which the factorisation failed.
        iteration: usize,
    },
    /// Returned when the residual evaluates to NaN or infinity.
    #[error("residual became non-finite at iteration {iteration}")]
    NonFiniteResidual {
        /// Iteration at which the non-finite value appeared.
        iteration: usize,
    },
    /// Returned when no step length reduces the residual.
    #[error("solver stalled at iteration {iteration} (residual: {residual:.3e})")]
    Stalled {
        /// Iteration at which the line search gave up.
        iteration: usize,
        /// Residual norm at the last accepted point.
        residual: f64,
    },
    /// Returned when the residual at the returned root exceeds the accepted tolerance.
    #[error(
        "solver did not converge after {iterations} iterations \
         (residual: {residual:.3e}, tolerance: {tolerance:.1e})"
    )]
    ResidualTooLarge {
        /// Norm of the re-evaluated residual in newtons.
        residual: f64,
        /// Largest accepted residual norm in newtons.
        tolerance: f64,
        /// Iterations spent by the root finder.
        iterations: usize,
    },
    /// Returned when the residual and the guess disagree in dimension.
    #[error("residual has {actual} components but the guess has {expected}")]
    DimensionMismatch {
        /// Dimension of the initial guess.
        expected: usize,
        /// Dimension of the residual vector.
        actual: usize,
    },
}

/// Error returned when an anchor analysis fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the anchor configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Returned when no verified equilibrium was found.
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}
