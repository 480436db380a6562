use anchorx::{member, Anchor, AnchorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two slings of equal length spread 40 degrees either side of the load
    let spread = 40.0_f64.to_radians();
    let config = AnchorConfig::new(
        vec![member(0.6, -spread), member(0.6, spread)],
        800.0,
        500.0,
    )?;

    // Solve and verify the force balance
    let equilibrium = Anchor::new(config).solve_default()?;

    // Print the share of the load each sling carries
    for state in &equilibrium.members {
        println!(
            "Sling {}: {:.1} N ({:.0}% of load)",
            state.index,
            state.force,
            100.0 * state.force / equilibrium.load
        );
    }

    // All done
    Ok(())
}
