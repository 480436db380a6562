#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod anchor;
mod config;
mod errors;
mod geometry;
mod solver;

pub use anchor::{Anchor, Equilibrium, MemberState};
pub use config::{AnchorConfig, SolverSettings};
pub use errors::{AnalysisError, ConfigurationError, ConvergenceError};
pub use geometry::{displacement, member, Displacement, Member};
pub use solver::{NewtonSolver, RootFinder, RootReport};
