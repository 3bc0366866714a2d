//! bundle-l10n
//!
//! Localization registry for application bundles: discovers per-language
//! string tables, matches free-text UI content against the reference
//! language, and translates the matches into every supported language.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod input;
pub mod registry;
pub mod scanner;
pub mod suite;
pub mod types;

mod test_utils;

pub use dictionary::{
    ContentMatch,
    LanguageDictionary,
    MatchKind,
};
pub use error::{
    DictionaryParseError,
    InvalidBundleError,
    RegistryError,
    TranslationNotFoundError,
};
pub use registry::{
    ApplicationRegistry,
    TranslationReport,
};
pub use suite::ConfigurableSuite;
pub use types::Language;
