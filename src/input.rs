//! Localization resource file inputs.

pub mod format;
pub mod strings;
