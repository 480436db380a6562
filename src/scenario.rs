use std::f64::consts::{FRAC_PI_4, FRAC_PI_6, PI};

use anchorx::{member, AnchorConfig, ConfigurationError};

/// Stiffness coefficient for dynamic climbing rope in newtons per metre.
pub const ROPE_STIFFNESS: f64 = 800.0;

/// Load hung from the anchor point in newtons.
pub const DESIGN_LOAD: f64 = 1_000.0;

/// Build the four-point equalised anchor used by the command line report.
///
/// Angles are measured from the load direction, so a member at zero runs
/// straight along the load and the others fan out to either side.
pub fn equalised_four_point() -> Result<AnchorConfig, ConfigurationError> {
    let members = vec![
        member(0.8, -FRAC_PI_4),
        member(0.1, 0.0),
        member(0.5, FRAC_PI_6),
        member(0.5, 3.0 * PI / 8.0),
    ];
    AnchorConfig::new(members, ROPE_STIFFNESS, DESIGN_LOAD)
}
