use serde::ser::SerializeMap;
use serde::{
    Serialize,
    Serializer,
};

use crate::error::RegistryError;
use crate::types::{
    Language,
    display_keys,
};

/// Translations of every potential match into one language, in match order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTranslations {
    pub language: Language,
    pub values: Vec<String>,
}

/// A language left out of a report and the reason.
#[derive(Debug)]
pub struct LanguageFailure {
    pub language: Language,
    pub error: RegistryError,
}

/// Result of [`super::ApplicationRegistry::get_translations_report`].
///
/// Serializes as `{"matches": n, "<display name>": [...], ...}`, see
/// [`display_keys`] for languages sharing a display name. Failures are not
/// part of the serialized form.
#[derive(Debug, Default)]
pub struct TranslationReport {
    /// Potential matches in the reference language
    matches: usize,

    /// Supported languages that translated every match, in discovery order
    translations: Vec<LanguageTranslations>,

    failures: Vec<LanguageFailure>,
}

impl TranslationReport {
    /// Number of potential matches found in the reference language.
    #[must_use]
    pub const fn matches(&self) -> usize {
        self.matches
    }

    #[must_use]
    pub fn translations(&self) -> &[LanguageTranslations] {
        &self.translations
    }

    #[must_use]
    pub fn failures(&self) -> &[LanguageFailure] {
        &self.failures
    }

    /// Values for `language`, or `None` if it is absent from the report.
    #[must_use]
    pub fn values_for(&self, language: &Language) -> Option<&[String]> {
        self.translations
            .iter()
            .find(|entry| &entry.language == language)
            .map(|entry| entry.values.as_slice())
    }

    /// Values for the language shown as `display_name`.
    #[must_use]
    pub fn values_by_display_name(&self, display_name: &str) -> Option<&[String]> {
        self.translations
            .iter()
            .find(|entry| entry.language.display_name() == display_name)
            .map(|entry| entry.values.as_slice())
    }

    /// True if no language was left out.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(super) const fn set_matches(&mut self, matches: usize) {
        self.matches = matches;
    }

    pub(super) fn push_translations(&mut self, language: Language, values: Vec<String>) {
        self.translations.push(LanguageTranslations { language, values });
    }

    pub(super) fn push_failure(&mut self, language: Language, error: RegistryError) {
        self.failures.push(LanguageFailure { language, error });
    }
}

impl Serialize for TranslationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let languages: Vec<&Language> =
            self.translations.iter().map(|entry| &entry.language).collect();
        let keys = display_keys(&languages);

        let mut map = serializer.serialize_map(Some(1 + self.translations.len()))?;
        map.serialize_entry("matches", &self.matches)?;
        for (key, entry) in keys.iter().zip(&self.translations) {
            map.serialize_entry(key, &entry.values)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    fn sample() -> TranslationReport {
        let mut report = TranslationReport::default();
        report.set_matches(1);
        report.push_translations(Language::new("en"), vec!["OK".to_string()]);
        report.push_translations(Language::new("fr"), vec!["D'accord".to_string()]);
        report
    }

    #[googletest::test]
    fn serializes_matches_then_languages_by_display_name() {
        let json = serde_json::to_string(&sample()).unwrap();

        assert_eq!(json, r#"{"matches":1,"English":["OK"],"French":["D'accord"]}"#);
    }

    #[googletest::test]
    fn failures_are_not_serialized() {
        let mut report = sample();
        report.push_failure(
            Language::new("de"),
            RegistryError::DictionaryNotFound(Language::new("de")),
        );

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value, json!({"matches": 1, "English": ["OK"], "French": ["D'accord"]}));
        expect_that!(report.is_complete(), eq(false));
    }

    #[googletest::test]
    fn empty_report() {
        let report = TranslationReport::default();

        assert_eq!(serde_json::to_value(&report).unwrap(), json!({"matches": 0}));
        expect_that!(report.is_complete(), eq(true));
    }

    #[googletest::test]
    fn shared_display_names_stay_distinct() {
        let mut report = TranslationReport::default();
        report.set_matches(1);
        report.push_translations(Language::new("en"), vec!["OK".to_string()]);
        report.push_translations(Language::new("English"), vec!["Okay".to_string()]);

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({"matches": 1, "English (en)": ["OK"], "English (English)": ["Okay"]})
        );
    }

    #[googletest::test]
    fn values_lookup() {
        let report = sample();

        expect_that!(
            report.values_for(&Language::new("fr")),
            some(elements_are![eq("D'accord")])
        );
        expect_that!(report.values_by_display_name("English"), some(elements_are![eq("OK")]));
        expect_that!(report.values_for(&Language::new("de")), none());
    }
}
