//! Dictionaries of one application bundle and cross-language queries.

mod report;

use std::path::Path;

pub use report::{
    LanguageFailure,
    LanguageTranslations,
    TranslationReport,
};

use crate::config::{
    MatchingConfig,
    RegistrySettings,
};
use crate::dictionary::{
    ContentMatch,
    LanguageDictionary,
    is_degenerate_query,
};
use crate::error::RegistryError;
use crate::scanner::{
    BundleScanner,
    language_for_file,
};
use crate::types::Language;

/// Owns the dictionaries loaded from an application bundle.
///
/// Construction only validates the bundle; dictionaries are read by
/// [`Self::load_all_content`], once per registry.
#[derive(Debug)]
pub struct ApplicationRegistry {
    /// Lists the bundle's localization files
    scanner: BundleScanner,

    /// Language that resolves free-text queries
    reference_language: Language,

    matching: MatchingConfig,

    /// Registration order; the first dictionary of a language answers lookups
    dictionaries: Vec<LanguageDictionary>,

    /// Set once [`Self::load_all_content`] succeeded
    content_loaded: bool,
}

impl ApplicationRegistry {
    /// Creates a registry with default settings.
    ///
    /// # Errors
    /// [`RegistryError::InvalidBundle`] if `bundle_path` is not an existing directory.
    pub fn new(
        reference_language: Language,
        bundle_path: impl AsRef<Path>,
    ) -> Result<Self, RegistryError> {
        Self::with_settings(reference_language, bundle_path, &RegistrySettings::default())
    }

    /// Creates a registry using the file patterns and matching policy of `settings`.
    ///
    /// `settings.reference_language` is ignored in favor of `reference_language`.
    ///
    /// # Errors
    /// - [`RegistryError::InvalidBundle`] if `bundle_path` is not an existing directory
    /// - [`RegistryError::Matcher`] if a file pattern is invalid
    pub fn with_settings(
        reference_language: Language,
        bundle_path: impl AsRef<Path>,
        settings: &RegistrySettings,
    ) -> Result<Self, RegistryError> {
        let bundle_path = bundle_path.as_ref();
        let scanner = BundleScanner::new(bundle_path, &settings.localization_files)?;

        tracing::debug!(
            bundle = %bundle_path.display(),
            reference_language = %reference_language,
            "Created application registry"
        );

        Ok(Self {
            scanner,
            reference_language,
            matching: settings.matching,
            dictionaries: Vec::new(),
            content_loaded: false,
        })
    }

    #[must_use]
    pub fn bundle_path(&self) -> &Path {
        self.scanner.bundle_root()
    }

    #[must_use]
    pub const fn reference_language(&self) -> &Language {
        &self.reference_language
    }

    #[must_use]
    pub const fn matching(&self) -> &MatchingConfig {
        &self.matching
    }

    /// Whether [`Self::load_all_content`] has succeeded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.content_loaded
    }

    /// Registered dictionaries in registration order.
    #[must_use]
    pub fn dictionaries(&self) -> &[LanguageDictionary] {
        &self.dictionaries
    }

    /// Languages the bundle localizes, in discovery order.
    ///
    /// Reads the bundle layout only; loaded dictionaries are not consulted.
    ///
    /// # Errors
    /// [`RegistryError::InvalidBundle`] if the bundle can no longer be read.
    pub fn supported_languages(&self) -> Result<Vec<Language>, RegistryError> {
        let mut languages: Vec<Language> = Vec::new();
        for file in self.scanner.localization_files()? {
            let language = language_for_file(&file);
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        Ok(languages)
    }

    /// Parses every localization file of the bundle into dictionaries.
    ///
    /// Files of the same language are merged; on conflicting keys the file
    /// found first wins. Nothing is registered unless every file parses.
    ///
    /// # Errors
    /// - [`RegistryError::AlreadyLoaded`] if content was loaded or dictionaries were added
    /// - [`RegistryError::ContentLoad`] naming the first file that failed to parse
    /// - [`RegistryError::InvalidBundle`] if the bundle can no longer be read
    pub fn load_all_content(&mut self) -> Result<(), RegistryError> {
        if self.content_loaded || !self.dictionaries.is_empty() {
            return Err(RegistryError::AlreadyLoaded);
        }

        let mut loaded: Vec<LanguageDictionary> = Vec::new();
        for file in self.scanner.localization_files()? {
            let dictionary = LanguageDictionary::create(&file)
                .map_err(|source| RegistryError::ContentLoad { path: file.clone(), source })?;

            match loaded.iter_mut().find(|existing| existing.language() == dictionary.language()) {
                Some(existing) => {
                    tracing::debug!(
                        file = %file.display(),
                        language = %dictionary.language(),
                        "Merging additional localization file"
                    );
                    existing.merge(dictionary);
                }
                None => loaded.push(dictionary),
            }
        }

        tracing::info!(
            bundle = %self.bundle_path().display(),
            languages = loaded.len(),
            "Loaded localization content"
        );

        self.dictionaries = loaded;
        self.content_loaded = true;
        Ok(())
    }

    /// The first registered dictionary for `language`.
    ///
    /// # Errors
    /// [`RegistryError::DictionaryNotFound`] if no dictionary is registered for it.
    pub fn get_dictionary(
        &self,
        language: &Language,
    ) -> Result<&LanguageDictionary, RegistryError> {
        self.dictionaries
            .iter()
            .find(|dictionary| dictionary.language() == language)
            .ok_or_else(|| RegistryError::DictionaryNotFound(language.clone()))
    }

    /// Resolves a match in the dictionary of `language`.
    ///
    /// # Errors
    /// - [`RegistryError::DictionaryNotFound`] if `language` has no dictionary
    /// - [`RegistryError::TranslationNotFound`] if that dictionary lacks the key
    pub fn translate(
        &self,
        content_match: &ContentMatch,
        language: &Language,
    ) -> Result<&str, RegistryError> {
        Ok(self.get_dictionary(language)?.translate(content_match)?)
    }

    /// Registers a dictionary after any existing ones.
    ///
    /// A second dictionary for the same language is kept but only answers
    /// lookups once the first is replaced.
    pub fn add_dictionary(&mut self, dictionary: LanguageDictionary) {
        tracing::debug!(language = %dictionary.language(), "Adding dictionary");
        self.dictionaries.push(dictionary);
    }

    /// Removes every dictionary of the same language, then registers `dictionary`.
    ///
    /// Returns how many dictionaries were removed.
    pub fn replace_dictionary(&mut self, dictionary: LanguageDictionary) -> usize {
        let before = self.dictionaries.len();
        self.dictionaries.retain(|existing| existing.language() != dictionary.language());
        let removed = before - self.dictionaries.len();

        tracing::debug!(language = %dictionary.language(), removed, "Replacing dictionary");
        self.dictionaries.push(dictionary);
        removed
    }

    /// Matches `query` against the reference language's dictionary.
    ///
    /// # Errors
    /// [`RegistryError::DictionaryNotFound`] if the reference language has no dictionary.
    pub fn potential_matches<'a>(
        &self,
        query: impl Into<Option<&'a str>>,
    ) -> Result<Vec<ContentMatch>, RegistryError> {
        let dictionary = self.get_dictionary(&self.reference_language)?;
        Ok(dictionary.lookup_potential_matches_with(query, &self.matching))
    }

    /// Translates every match of `query` into every supported language.
    ///
    /// Never fails: a language that cannot translate all matches is left out
    /// of the translations and recorded in [`TranslationReport::failures`].
    #[must_use]
    pub fn get_translations_report<'a>(
        &self,
        query: impl Into<Option<&'a str>>,
    ) -> TranslationReport {
        let query = query.into();
        let mut report = TranslationReport::default();
        if is_degenerate_query(query) {
            return report;
        }

        let matches = match self.potential_matches(query) {
            Ok(matches) => matches,
            Err(error) => {
                tracing::warn!(%error, "Cannot resolve query against the reference language");
                report.push_failure(self.reference_language.clone(), error);
                return report;
            }
        };
        report.set_matches(matches.len());

        let languages = match self.supported_languages() {
            Ok(languages) => languages,
            Err(error) => {
                tracing::warn!(%error, "Cannot list supported languages");
                report.push_failure(self.reference_language.clone(), error);
                return report;
            }
        };

        for language in languages {
            match self.translate_all(&matches, &language) {
                Ok(values) => report.push_translations(language, values),
                Err(error) => {
                    tracing::warn!(
                        language = %language,
                        %error,
                        "Omitting language from translations report"
                    );
                    report.push_failure(language, error);
                }
            }
        }

        report
    }

    fn translate_all(
        &self,
        matches: &[ContentMatch],
        language: &Language,
    ) -> Result<Vec<String>, RegistryError> {
        matches
            .iter()
            .map(|content_match| self.translate(content_match, language).map(str::to_string))
            .collect()
    }
}
