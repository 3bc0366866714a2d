use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "localizationFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySettings {
    /// Language whose dictionary resolves free-text queries.
    pub reference_language: String,

    pub localization_files: LocalizationFilesConfig,
    pub matching: MatchingConfig,
    pub suite: SuiteConfig,
}

/// Which files inside a bundle are localization resources.
///
/// Patterns are matched against paths relative to the bundle root.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for LocalizationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.lproj/Localizable.strings".to_string()],
            exclude_patterns: Vec::new(),
        }
    }
}

/// Potential match policy. Exact matches are always enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingConfig {
    /// Treat `%@`-style specifiers in values as wildcards.
    pub format_specifiers: bool,
    pub case_insensitive: bool,
    /// Substring containment on keys and values.
    pub partial: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { format_specifiers: true, case_insensitive: true, partial: true }
    }
}

/// Settings a test harness applies to a suite before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    /// Global suite timeout in milliseconds.
    pub timeout_ms: u64,
    /// Run tests in declaration order.
    pub preserve_order: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self { timeout_ms: 60_000, preserve_order: true }
    }
}

impl RegistrySettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero suite timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.reference_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "referenceLanguage",
                "The reference language cannot be empty. Example: \"en\"",
            ));
        }

        if self.localization_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "localizationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/*.lproj/Localizable.strings\"]",
            ));
        }

        for (index, pattern) in self.localization_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("localizationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.localization_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("localizationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.suite.timeout_ms == 0 {
            errors.push(ValidationError::new(
                "suite.timeoutMs",
                "The timeout must be greater than zero. Example: 60000",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            reference_language: "en".to_string(),
            localization_files: LocalizationFilesConfig::default(),
            matching: MatchingConfig::default(),
            suite: SuiteConfig::default(),
        }
    }
}
