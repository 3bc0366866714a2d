//! Settings for the registry, the bundle scanner and the suite contract.
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Localization file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    LocalizationFilesConfig,
    MatchingConfig,
    RegistrySettings,
    SuiteConfig,
    ValidationError,
};
