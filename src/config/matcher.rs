//! File pattern matcher for localization resources inside a bundle.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::LocalizationFilesConfig;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid localization include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches bundle files against configured glob patterns.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    bundle_root: PathBuf,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(
        bundle_root: PathBuf,
        config: &LocalizationFilesConfig,
    ) -> Result<Self, MatcherError> {
        let include_set = Self::build_glob_set(&config.include_patterns, |pattern, source| {
            MatcherError::InvalidIncludePattern { pattern, source }
        })?;

        let exclude_set = Self::build_glob_set(&config.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { bundle_root, include_set, exclude_set })
    }

    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn bundle_root(&self) -> &Path {
        &self.bundle_root
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be absolute and under the bundle root.
    #[must_use]
    pub fn is_localization_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.bundle_root).ok() else {
            return false;
        };

        self.is_localization_file_relative(relative_path)
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be relative to the bundle root.
    #[must_use]
    pub fn is_localization_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
