//! Error types for bundle scanning, dictionary loading and translation.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::MatcherError;
use crate::scanner::ScannerError;
use crate::types::Language;

/// The given path does not denote an application bundle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{}' isn't an application bundle: {reason}", path.display())]
pub struct InvalidBundleError {
    pub path: PathBuf,
    pub reason: String,
}

impl InvalidBundleError {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self { path: path.into(), reason: reason.into() }
    }
}

/// A localization resource file could not be turned into a dictionary.
#[derive(Error, Debug)]
pub enum DictionaryParseError {
    #[error("Failed to read localization file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax { line: usize, column: usize, message: String },

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Binary property lists are not supported; convert the file to text first")]
    BinaryPropertyList,

    #[error("Failed to parse JSON string table: {0}")]
    Json(#[from] serde_json::Error),
}

/// The dictionary has no entry for the requested key.
///
/// Expected for partially localized bundles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No translation for key '{key}' in {language}")]
pub struct TranslationNotFoundError {
    pub key: String,
    pub language: Language,
}

/// Errors raised by [`crate::registry::ApplicationRegistry`].
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidBundle(#[from] InvalidBundleError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error("Cannot load language translation for '{}': {source}", path.display())]
    ContentLoad {
        path: PathBuf,
        #[source]
        source: DictionaryParseError,
    },

    #[error("Content already present; dictionaries can only be loaded once")]
    AlreadyLoaded,

    #[error("Cannot find dictionary for {0}")]
    DictionaryNotFound(Language),

    #[error(transparent)]
    TranslationNotFound(#[from] TranslationNotFoundError),
}

impl From<ScannerError> for RegistryError {
    fn from(error: ScannerError) -> Self {
        match error {
            ScannerError::InvalidBundle(error) => Self::InvalidBundle(error),
            ScannerError::Matcher(error) => Self::Matcher(error),
        }
    }
}
