use anchorx::{Anchor, AnchorConfig, NewtonSolver, SolverSettings};

const CONFIG: &str = r#"{
    "members": [
        {"length": 1.2, "angle": -0.6},
        {"length": 0.4, "angle": 0.1},
        {"length": 0.9, "angle": 0.7}
    ],
    "stiffness": 800.0,
    "load": 1200.0
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AnchorConfig::from_json_str(CONFIG)?;
    let settings: SolverSettings = serde_json::from_str(r#"{"max_iterations": 50}"#)?;

    let equilibrium = Anchor::new(config).solve(&NewtonSolver::from(&settings), &settings)?;
    println!("{}", serde_json::to_string_pretty(&equilibrium)?);

    Ok(())
}
