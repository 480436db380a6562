//! Multivariate root finding for square nonlinear systems.
//!
//! The anchor model only needs *some* solver that drives an ℝⁿ → ℝⁿ residual
//! to zero, so the solver sits behind the [`RootFinder`] trait. [`NewtonSolver`]
//! is the bundled implementation: Newton's method with a forward-difference
//! Jacobian, an LU solve for the step and a halving line search.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverSettings;
use crate::errors::ConvergenceError;

/// Best estimate returned by a [`RootFinder`].
#[derive(Clone, Debug, PartialEq)]
pub struct RootReport {
    /// Point at which the search stopped.
    pub root: DVector<f64>,
    /// Norm of the residual at `root`.
    pub residual_norm: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the solver's own stopping tolerance was met.
    pub converged: bool,
}

/// A solver for `residual(x) = 0`.
///
/// Implementations may return a report with `converged == false` when the
/// iteration budget runs out; callers are expected to check the residual.
pub trait RootFinder {
    /// Search for a root of `residual` starting at `guess`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvergenceError`] when the search breaks down before an
    /// estimate can be produced.
    fn find_root(
        &self,
        residual: &dyn Fn(&DVector<f64>) -> DVector<f64>,
        guess: DVector<f64>,
    ) -> Result<RootReport, ConvergenceError>;
}

/// Damped Newton iteration with a finite-difference Jacobian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSolver {
    /// Maximum number of Newton steps.
    pub max_iterations: usize,
    /// Residual norm at which the iteration stops.
    pub tolerance: f64,
    /// Relative perturbation used for each Jacobian column.
    pub jacobian_step: f64,
    /// Smallest step fraction the line search tries before giving up.
    pub min_step_scale: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self::from(&SolverSettings::default())
    }
}

impl From<&SolverSettings> for NewtonSolver {
    fn from(settings: &SolverSettings) -> Self {
        Self {
            max_iterations: settings.max_iterations,
            tolerance: settings.tolerance,
            jacobian_step: settings.jacobian_step,
            min_step_scale: settings.min_step_scale,
        }
    }
}

impl NewtonSolver {
    /// Forward-difference approximation of the Jacobian at `point`.
    fn jacobian(
        &self,
        residual: &dyn Fn(&DVector<f64>) -> DVector<f64>,
        point: &DVector<f64>,
        value: &DVector<f64>,
    ) -> DMatrix<f64> {
        let n = point.len();
        let mut jacobian = DMatrix::zeros(value.len(), n);
        for col in 0..n {
            let step = self.jacobian_step * point[col].abs().max(1.0);
            let mut shifted = point.clone();
            shifted[col] += step;
            let column = (residual(&shifted) - value) / step;
            jacobian.set_column(col, &column);
        }
        jacobian
    }
}

/// Evaluate `residual` and reject dimension changes or non-finite output.
fn evaluate(
    residual: &dyn Fn(&DVector<f64>) -> DVector<f64>,
    point: &DVector<f64>,
    iteration: usize,
) -> Result<DVector<f64>, ConvergenceError> {
    let value = residual(point);
    if value.len() != point.len() {
        return Err(ConvergenceError::DimensionMismatch {
            expected: point.len(),
            actual: value.len(),
        });
    }
    if value.iter().any(|component| !component.is_finite()) {
        return Err(ConvergenceError::NonFiniteResidual { iteration });
    }
    Ok(value)
}

impl RootFinder for NewtonSolver {
    fn find_root(
        &self,
        residual: &dyn Fn(&DVector<f64>) -> DVector<f64>,
        guess: DVector<f64>,
    ) -> Result<RootReport, ConvergenceError> {
        let mut point = guess;
        let mut value = evaluate(residual, &point, 0)?;
        let mut norm = value.norm();

        for iteration in 0..self.max_iterations {
            if norm <= self.tolerance {
                tracing::debug!(iteration, residual = norm, "newton converged");
                return Ok(RootReport {
                    root: point,
                    residual_norm: norm,
                    iterations: iteration,
                    converged: true,
                });
            }

            let jacobian = self.jacobian(residual, &point, &value);
            let step = jacobian
                .lu()
                .solve(&(-&value))
                .ok_or(ConvergenceError::SingularJacobian { iteration })?;

            // Halve the step until the residual norm decreases.
            let mut scale = 1.0;
            loop {
                let candidate = &point + &step * scale;
                let candidate_value = evaluate(residual, &candidate, iteration + 1)?;
                let candidate_norm = candidate_value.norm();
                if candidate_norm < norm {
                    point = candidate;
                    value = candidate_value;
                    norm = candidate_norm;
                    break;
                }
                scale *= 0.5;
                if scale < self.min_step_scale {
                    return Err(ConvergenceError::Stalled {
                        iteration,
                        residual: norm,
                    });
                }
            }
            tracing::debug!(iteration, residual = norm, scale, "newton step");
        }

        let converged = norm <= self.tolerance;
        if !converged {
            tracing::warn!(
                iterations = self.max_iterations,
                residual = norm,
                "newton iteration budget exhausted"
            );
        }
        Ok(RootReport {
            root: point,
            residual_norm: norm,
            iterations: self.max_iterations,
            converged,
        })
    }
}
