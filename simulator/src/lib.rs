// Library root

pub mod config;
pub mod generation;
pub mod grid;
pub mod pattern;
pub mod rule;
pub mod session;

// Primary API
pub use generation::{advance, Generations};
pub use grid::{Coord, Grid, IntoCell};
pub use rule::{conway, LifeLike, Rule, RuleKind};
pub use session::{RunOptions, RunOutcome, Session, StopHandle};
