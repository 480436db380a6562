use anchorx::Equilibrium;
use std::fmt::Write;

/// Render a textual report of an anchor equilibrium.
///
/// Quantities are listed per member in configuration order so each line can
/// be matched to the rigging it describes.
#[must_use]
pub fn render_report(equilibrium: &Equilibrium) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Equalised anchor ({} members, load = {:.1} N, stiffness = {:.1} N/m)",
        equilibrium.members.len(),
        equilibrium.load,
        equilibrium.stiffness
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Master point displacement: x = {:+.6e} m, y = {:+.6e} m",
        equilibrium.displacement.x, equilibrium.displacement.y
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "{:>6}  {:>14}  {:>13}  {:>12}",
        "member", "elongation (m)", "angle (rad)", "force (N)"
    )
    .expect("writing to string cannot fail");
    for state in &equilibrium.members {
        writeln!(
            &mut output,
            "{:>6}  {:>+14.6e}  {:>+13.6}  {:>+12.3}",
            state.index, state.elongation, state.new_angle, state.force
        )
        .expect("writing to string cannot fail");
    }

    writeln!(
        &mut output,
        "Force balance residual: {:.3e} N after {} iterations",
        equilibrium.residual_norm, equilibrium.iterations
    )
    .expect("writing to string cannot fail");

    for state in equilibrium.slack_members() {
        writeln!(
            &mut output,
            "Caveat: member {} is slack; its {:+.3} N force is compressive and was not clamped",
            state.index, state.force
        )
        .expect("writing to string cannot fail");
    }

    output
}
