//! Domain models for the triage engine.

mod canned;
mod input;
mod relief;
mod triage;

pub use canned::*;
pub use input::*;
pub use relief::*;
pub use triage::*;
