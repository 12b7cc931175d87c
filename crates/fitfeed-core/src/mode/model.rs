//! Display mode models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// User's display theme preference.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModePreference {
    /// Follow the operating system's scheme.
    #[default]
    System,
    Light,
    Dark,
}

/// Concrete color scheme after resolving [`ModePreference::System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ModePreference {
    /// Maps the preference onto a concrete scheme, deferring to `system`
    /// when the user has not pinned one.
    pub fn resolve(self, system: ColorScheme) -> ColorScheme {
        match self {
            ModePreference::System => system,
            ModePreference::Light => ColorScheme::Light,
            ModePreference::Dark => ColorScheme::Dark,
        }
    }
}

/// Persisted state of the mode store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeState {
    #[serde(default)]
    pub mode: ModePreference,
}
