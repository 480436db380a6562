//! Core equilibrium model for a multi-member anchor.

use nalgebra::{DVector, Vector2};
use serde::Serialize;

use crate::config::{AnchorConfig, SolverSettings};
use crate::errors::{AnalysisError, ConvergenceError};
use crate::geometry::{Displacement, Member};
use crate::solver::{NewtonSolver, RootFinder};

/// Response of a single member at a given anchor displacement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemberState {
    /// Position of the member in the configuration.
    pub index: usize,
    /// Rest length in metres.
    pub length: f64,
    /// Initial angle in radians.
    pub angle: f64,
    /// Change in length in metres.
    pub elongation: f64,
    /// Angle after displacement in radians.
    pub new_angle: f64,
    /// Axial force in newtons; negative values are compressive.
    pub force: f64,
}

impl MemberState {
    /// Whether the member is shorter than its rest length.
    ///
    /// The force of a slack member is still reported (as a negative, pushing
    /// force) even though rope and webbing cannot carry compression.
    #[must_use]
    pub fn is_slack(&self) -> bool {
        self.elongation < 0.0
    }
}

/// Verified equilibrium of an anchor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Equilibrium {
    /// Displacement of the anchor point in metres.
    pub displacement: Displacement,
    /// Force imbalance `[x, y]` at the displacement in newtons.
    pub residual: [f64; 2],
    /// Norm of `residual`.
    pub residual_norm: f64,
    /// Iterations spent by the root finder.
    pub iterations: usize,
    /// Per-member response in configuration order.
    pub members: Vec<MemberState>,
    /// Applied load in newtons.
    pub load: f64,
    /// Stiffness coefficient in newtons per metre.
    pub stiffness: f64,
}

impl Equilibrium {
    /// Sum of member elongations in metres.
    #[must_use]
    pub fn total_elongation(&self) -> f64 {
        self.members.iter().map(|member| member.elongation).sum()
    }

    /// Members that ended up shorter than their rest length.
    pub fn slack_members(&self) -> impl Iterator<Item = &MemberState> {
        self.members.iter().filter(|member| member.is_slack())
    }
}

/// An anchor point shared by elastic members under a load along Y.
///
/// Every quantity is a pure function of a candidate [`Displacement`] and the
/// immutable [`AnchorConfig`]; outputs follow the member order of the
/// configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    /// Validated geometry, stiffness and load.
    config: AnchorConfig,
}

impl Anchor {
    /// Wrap a validated configuration.
    #[must_use]
    pub fn new(config: AnchorConfig) -> Self {
        Self { config }
    }

    /// Members in configuration order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        self.config.members()
    }

    /// Change in length of each member when the anchor moves by `displacement`.
    ///
    /// # Examples
    /// ```
    /// use anchorx::{displacement, member, Anchor, AnchorConfig};
    ///
    /// let config = AnchorConfig::new(vec![member(1.0, 0.0)], 800.0, 0.0).unwrap();
    /// let anchor = Anchor::new(config);
    /// let elongations = anchor.member_elongations(displacement(0.0, 0.1));
    /// assert!((elongations[0] - 0.1).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn member_elongations(&self, displacement: Displacement) -> Vec<f64> {
        self.members()
            .iter()
            .map(|member| member.elongation(displacement))
            .collect()
    }

    /// Axial force in each member for the given elongations.
    ///
    /// Uses `K * elongation / length`, so longer members are softer. Negative
    /// elongations produce negative forces. Returns `None` unless `elongations`
    /// has exactly one entry per member.
    #[must_use]
    pub fn member_forces(&self, elongations: &[f64]) -> Option<Vec<f64>> {
        if elongations.len() != self.config.member_count() {
            return None;
        }
        let stiffness = self.config.stiffness();
        Some(
            elongations
                .iter()
                .zip(self.members())
                .map(|(elongation, member)| stiffness * elongation / member.length)
                .collect(),
        )
    }

    /// Direction of each member after the anchor moves by `displacement`.
    #[must_use]
    pub fn member_angles(&self, displacement: Displacement) -> Vec<f64> {
        self.members()
            .iter()
            .map(|member| member.angle_after(displacement))
            .collect()
    }

    /// Net force imbalance `[x, y]` on the anchor point at `displacement`.
    ///
    /// The X component is `Σ F sin φ` and the Y component `Σ F cos φ - load`.
    /// Both vanish at equilibrium.
    #[must_use]
    pub fn equilibrium_residual(&self, displacement: Displacement) -> Vector2<f64> {
        let net = self
            .member_states(displacement)
            .iter()
            .map(|state| {
                let (sin, cos) = state.new_angle.sin_cos();
                Vector2::new(state.force * sin, state.force * cos)
            })
            .fold(Vector2::zeros(), |sum, component| sum + component);
        net - Vector2::new(0.0, self.config.load())
    }

    /// Full per-member response at `displacement`, populated in one pass.
    #[must_use]
    pub fn member_states(&self, displacement: Displacement) -> Vec<MemberState> {
        let stiffness = self.config.stiffness();
        self.members()
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let elongation = member.elongation(displacement);
                MemberState {
                    index,
                    length: member.length,
                    angle: member.angle,
                    elongation,
                    new_angle: member.angle_after(displacement),
                    force: stiffness * elongation / member.length,
                }
            })
            .collect()
    }

    /// Solve for the equilibrium displacement and verify it.
    ///
    /// The residual is re-evaluated at the displacement returned by `finder`;
    /// the answer is only accepted when its norm is within
    /// `settings.verification_tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Convergence`] when the root finder breaks down or
    /// its answer fails the residual check.
    pub fn solve<F: RootFinder + ?Sized>(
        &self,
        finder: &F,
        settings: &SolverSettings,
    ) -> Result<Equilibrium, AnalysisError> {
        let residual = |point: &DVector<f64>| -> DVector<f64> {
            let displacement = Displacement::new(point[0], point[1]);
            let value = self.equilibrium_residual(displacement);
            DVector::from_column_slice(value.as_slice())
        };
        let report = finder.find_root(&residual, settings.initial_guess.into())?;
        if report.root.len() != 2 {
            return Err(ConvergenceError::DimensionMismatch {
                expected: 2,
                actual: report.root.len(),
            }
            .into());
        }

        let displacement = Displacement::new(report.root[0], report.root[1]);
        let residual = self.equilibrium_residual(displacement);
        let residual_norm = residual.norm();
        if residual_norm.is_nan() || residual_norm > settings.verification_tolerance {
            return Err(ConvergenceError::ResidualTooLarge {
                residual: residual_norm,
                tolerance: settings.verification_tolerance,
                iterations: report.iterations,
            }
            .into());
        }

        let equilibrium = Equilibrium {
            displacement,
            residual: [residual.x, residual.y],
            residual_norm,
            iterations: report.iterations,
            members: self.member_states(displacement),
            load: self.config.load(),
            stiffness: self.config.stiffness(),
        };
        tracing::info!(
            x = displacement.x,
            y = displacement.y,
            residual = residual_norm,
            iterations = report.iterations,
            "anchor equilibrium found"
        );
        for member in equilibrium.slack_members() {
            tracing::warn!(
                member = member.index,
                force = member.force,
                "member is slack; its compressive force is included unclamped"
            );
        }
        Ok(equilibrium)
    }

    /// Solve with [`SolverSettings::default`] and the bundled [`NewtonSolver`].
    ///
    /// # Errors
    ///
    /// See [`Anchor::solve`].
    ///
    /// # Examples
    /// ```
    /// use anchorx::{member, Anchor, AnchorConfig};
    ///
    /// let config = AnchorConfig::new(vec![member(1.0, 0.0)], 800.0, 400.0)?;
    /// let equilibrium = Anchor::new(config).solve_default()?;
    /// assert!((equilibrium.displacement.y - 0.5).abs() < 1.0e-9);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn solve_default(&self) -> Result<Equilibrium, AnalysisError> {
        let settings = SolverSettings::default();
        self.solve(&NewtonSolver::from(&settings), &settings)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_4, FRAC_PI_6, PI};

    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{displacement, member};
    use crate::solver::RootReport;

    fn four_point_anchor(load: f64) -> Anchor {
        let members = vec![
            member(0.8, -FRAC_PI_4),
            member(0.1, 0.0),
            member(0.5, FRAC_PI_6),
            member(0.5, 3.0 * PI / 8.0),
        ];
        Anchor::new(AnchorConfig::new(members, 800.0, load).expect("valid config"))
    }

    /// Root finder that returns a fixed point without iterating.
    struct FixedPoint(DVector<f64>);

    impl RootFinder for FixedPoint {
        fn find_root(
            &self,
            _residual: &dyn Fn(&DVector<f64>) -> DVector<f64>,
            _guess: DVector<f64>,
        ) -> Result<RootReport, ConvergenceError> {
            Ok(RootReport {
                root: self.0.clone(),
                residual_norm: 0.0,
                iterations: 7,
                converged: true,
            })
        }
    }

    #[test]
    fn residual_vanishes_at_rest_without_load() {
        let anchor = four_point_anchor(0.0);
        let residual = anchor.equilibrium_residual(Displacement::default());
        assert_relative_eq!(residual.x, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(residual.y, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn residual_at_rest_is_the_applied_load() {
        let anchor = four_point_anchor(1_000.0);
        let residual = anchor.equilibrium_residual(Displacement::default());
        assert_relative_eq!(residual.x, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(residual.y, -1_000.0, epsilon = 1.0e-9);
    }

    #[test]
    fn forces_scale_with_stiffness_over_length() {
        let anchor = four_point_anchor(0.0);
        let forces = anchor
            .member_forces(&[0.08, 0.01, -0.05, 0.0])
            .expect("one elongation per member");
        assert_relative_eq!(forces[0], 80.0);
        assert_relative_eq!(forces[1], 80.0);
        assert_relative_eq!(forces[2], -80.0);
        assert_relative_eq!(forces[3], 0.0);
    }

    #[test]
    fn forces_require_aligned_elongations() {
        let anchor = four_point_anchor(0.0);
        assert_eq!(anchor.member_forces(&[0.1]), None);
        assert_eq!(anchor.member_forces(&[0.0; 5]), None);
    }

    #[test]
    fn member_states_match_individual_functions() {
        let anchor = four_point_anchor(1_000.0);
        let moved = displacement(-0.01, 0.1);
        let elongations = anchor.member_elongations(moved);
        let forces = anchor
            .member_forces(&elongations)
            .expect("elongations are aligned");
        let angles = anchor.member_angles(moved);
        let states = anchor.member_states(moved);

        assert_eq!(states.len(), 4);
        for (index, state) in states.iter().enumerate() {
            assert_eq!(state.index, index);
            assert_eq!(state.length, anchor.members()[index].length);
            assert_relative_eq!(state.elongation, elongations[index]);
            assert_relative_eq!(state.force, forces[index]);
            assert_relative_eq!(state.new_angle, angles[index]);
        }
    }

    #[test]
    fn residual_matches_sum_of_member_components() {
        let anchor = four_point_anchor(1_000.0);
        let moved = displacement(0.02, 0.05);
        let states = anchor.member_states(moved);
        let x: f64 = states.iter().map(|s| s.force * s.new_angle.sin()).sum();
        let y: f64 = states.iter().map(|s| s.force * s.new_angle.cos()).sum();
        let residual = anchor.equilibrium_residual(moved);
        assert_relative_eq!(residual.x, x, epsilon = 1.0e-9);
        assert_relative_eq!(residual.y, y - 1_000.0, epsilon = 1.0e-9);
    }

    #[test]
    fn solves_four_point_anchor() {
        let anchor = four_point_anchor(1_000.0);
        let equilibrium = anchor.solve_default().expect("equilibrium found");
        assert_relative_eq!(equilibrium.displacement.x, -0.012_129_489, epsilon = 1.0e-6);
        assert_relative_eq!(equilibrium.displacement.y, 0.098_429_265, epsilon = 1.0e-6);
        assert!(equilibrium.residual_norm < 1.0e-6);
        assert_relative_eq!(equilibrium.members[1].force, 790.397, epsilon = 1.0e-2);
        assert_eq!(equilibrium.slack_members().count(), 0);
    }

    #[test]
    fn unverified_root_is_rejected() {
        let anchor = four_point_anchor(1_000.0);
        let finder = FixedPoint(DVector::from_column_slice(&[0.0, 0.05]));
        let error = anchor
            .solve(&finder, &SolverSettings::default())
            .expect_err("residual check fails");
        match error {
            AnalysisError::Convergence(ConvergenceError::ResidualTooLarge {
                residual,
                tolerance,
                iterations,
            }) => {
                assert!(residual > tolerance);
                assert_eq!(iterations, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_sized_root_is_rejected() {
        let anchor = four_point_anchor(0.0);
        let finder = FixedPoint(DVector::zeros(3));
        let error = anchor
            .solve(&finder, &SolverSettings::default())
            .expect_err("three dimensional root");
        assert_eq!(
            error,
            AnalysisError::Convergence(ConvergenceError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn slack_members_are_reported_but_not_clamped() {
        // Two opposed vertical members: pulling down stretches one and slackens the other.
        let members = vec![member(1.0, 0.0), member(1.0, PI)];
        let anchor = Anchor::new(AnchorConfig::new(members, 800.0, 400.0).expect("valid"));
        let equilibrium = anchor.solve_default().expect("equilibrium found");
        let slack: Vec<_> = equilibrium.slack_members().map(|m| m.index).collect();
        assert_eq!(slack, vec![1]);
        assert!(equilibrium.members[1].force < 0.0);
        assert_relative_eq!(equilibrium.displacement.y, 0.25, epsilon = 1.0e-9);
    }
}
