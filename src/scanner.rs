//! Discovery of localization resource files inside an application bundle.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::config::{
    FileMatcher,
    LocalizationFilesConfig,
    MatcherError,
};
use crate::error::InvalidBundleError;
use crate::types::Language;

/// Suffix of the per-language resource directories.
const LPROJ_SUFFIX: &str = ".lproj";

/// Extract the language identifier from a localization file path.
///
/// Uses the nearest ancestor directory named `<identifier>.lproj`.
///
/// # Examples
/// - `Demo.app/en.lproj/Localizable.strings` → `en`
/// - `Demo.app/zh-Hans.lproj/Localizable.strings` → `zh-Hans`
/// - `Demo.app/Localizable.strings` → `None`
#[must_use]
pub fn extract_language_name(file_path: &Path) -> Option<String> {
    file_path
        .parent()?
        .ancestors()
        .filter_map(Path::file_name)
        .find_map(|name| name.to_str()?.strip_suffix(LPROJ_SUFFIX).map(str::to_string))
        .filter(|identifier| !identifier.is_empty())
}

/// The language a localization file belongs to.
///
/// Files outside a `.lproj` directory use their file stem as identifier.
#[must_use]
pub fn language_for_file(file_path: &Path) -> Language {
    let identifier = extract_language_name(file_path)
        .or_else(|| file_path.file_stem().map(|stem| stem.to_string_lossy().to_string()))
        .unwrap_or_default();
    Language::new(identifier)
}

/// Checks that `path` can be treated as an application bundle.
fn validate_bundle(path: &Path) -> Result<(), InvalidBundleError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(InvalidBundleError::new(path, "not a directory")),
        Err(e) => Err(InvalidBundleError::new(path, e.to_string())),
    }
}

/// Walks a bundle directory and lists its localization files.
#[derive(Debug, Clone)]
pub struct BundleScanner {
    matcher: FileMatcher,
}

impl BundleScanner {
    /// Creates a scanner for the bundle at `bundle_root`.
    ///
    /// # Errors
    /// - [`ScannerError::InvalidBundle`] if the path is missing or not a directory
    /// - [`ScannerError::Matcher`] if a configured pattern is invalid
    pub fn new(
        bundle_root: &Path,
        config: &LocalizationFilesConfig,
    ) -> Result<Self, ScannerError> {
        validate_bundle(bundle_root)?;
        let matcher = FileMatcher::new(bundle_root.to_path_buf(), config)?;
        Ok(Self { matcher })
    }

    #[must_use]
    pub fn bundle_root(&self) -> &Path {
        self.matcher.bundle_root()
    }

    /// Lists the localization files of the bundle, sorted by path.
    ///
    /// # Errors
    /// [`InvalidBundleError`] if the bundle disappeared since construction.
    pub fn localization_files(&self) -> Result<Vec<PathBuf>, InvalidBundleError> {
        let bundle_root = self.bundle_root();
        validate_bundle(bundle_root)?;

        let mut found_files = Vec::new();
        for result in WalkBuilder::new(bundle_root)
            .hidden(false)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read bundle entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if self.matcher.is_localization_file(path) {
                found_files.push(path.to_path_buf());
            }
        }

        found_files.sort();
        tracing::debug!(
            bundle = %bundle_root.display(),
            files = found_files.len(),
            "Scanned bundle for localization files"
        );
        Ok(found_files)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error(transparent)]
    InvalidBundle(#[from] InvalidBundleError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),
}
