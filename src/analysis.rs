use anchorx::{AnalysisError, Anchor, AnchorConfig, Equilibrium, NewtonSolver, SolverSettings};

/// Solve the anchor described by `config` and return the verified equilibrium.
///
/// The root finder starts from `settings.initial_guess`; its answer is
/// re-checked against the force balance before it is returned.
pub fn run_analysis(
    config: AnchorConfig,
    settings: &SolverSettings,
) -> Result<Equilibrium, AnalysisError> {
    let anchor = Anchor::new(config);
    let solver = NewtonSolver::from(settings);
    anchor.solve(&solver, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::equalised_four_point;
    use anchorx::ConvergenceError;
    use approx::assert_relative_eq;

    #[test]
    fn produces_balanced_member_forces() {
        let config = equalised_four_point().expect("valid setup");
        let equilibrium =
            run_analysis(config, &SolverSettings::default()).expect("analysis runs");

        // Recomputing the member components must reproduce the applied load.
        let x: f64 = equilibrium
            .members
            .iter()
            .map(|state| state.force * state.new_angle.sin())
            .sum();
        let y: f64 = equilibrium
            .members
            .iter()
            .map(|state| state.force * state.new_angle.cos())
            .sum();
        assert_relative_eq!(x, 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(y, 1_000.0, epsilon = 1.0e-6);
    }

    #[test]
    fn reports_exhausted_iteration_budget() {
        let config = equalised_four_point().expect("valid setup");
        let settings = SolverSettings {
            max_iterations: 1,
            ..SolverSettings::default()
        };
        let error = run_analysis(config, &settings).expect_err("one step is not enough");
        assert!(matches!(
            error,
            AnalysisError::Convergence(ConvergenceError::ResidualTooLarge { iterations: 1, .. })
        ));
    }
}
