//! Display mode domain module.

mod model;

pub use model::{ColorScheme, ModePreference, ModeState};
