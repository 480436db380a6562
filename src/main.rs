mod analysis;
mod report;
mod scenario;

use analysis::run_analysis;
use anchorx::SolverSettings;
use report::render_report;
use scenario::equalised_four_point;
use std::error::Error;
use std::process::ExitCode;
use tracing::Level;

fn run() -> Result<String, Box<dyn Error>> {
    // The rigging geometry, rope stiffness and load are fixed literals.
    let config = equalised_four_point()?;

    // Start just below the rest position: at the origin every member is
    // unstretched and the force balance has no useful gradient.
    let settings = SolverSettings::default();

    // Solve for the master point displacement and verify the force balance.
    let equilibrium = run_analysis(config, &settings)?;

    Ok(render_report(&equilibrium))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
