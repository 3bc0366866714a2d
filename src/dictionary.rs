//! Per-language string tables and content matching.

use std::collections::HashMap;
use std::path::Path;

use crate::config::MatchingConfig;
use crate::error::{
    DictionaryParseError,
    TranslationNotFoundError,
};
use crate::input::format;
use crate::input::strings;
use crate::scanner::language_for_file;
use crate::types::Language;

/// How a dictionary entry relates to a query. Lower ranks sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    /// The query equals the key or the value.
    Exact,
    /// Equal to the key or the value ignoring case.
    CaseInsensitive,
    /// The value is a format template the query fills in.
    Template,
    /// The key or the value contains the query, ignoring case.
    Partial,
}

impl MatchKind {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::CaseInsensitive => 1,
            Self::Template => 2,
            Self::Partial => 3,
        }
    }
}

/// A reference to one entry, by key, in the dictionary it was found in.
///
/// Carries no translated text; resolve it against a target dictionary with
/// [`LanguageDictionary::translate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMatch {
    key: String,
    source: Language,
    kind: MatchKind,
    arguments: Vec<String>,
}

impl ContentMatch {
    /// A direct reference to `key`, as if matched exactly.
    #[must_use]
    pub fn for_key(key: impl Into<String>, source: Language) -> Self {
        Self { key: key.into(), source, kind: MatchKind::Exact, arguments: Vec::new() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Language of the dictionary the match was found in.
    #[must_use]
    pub const fn source(&self) -> &Language {
        &self.source
    }

    #[must_use]
    pub const fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Arguments captured from the query by a template match, in position order.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Returns true for queries that can never match: empty, blank or the `"null"` placeholder.
#[must_use]
pub fn is_degenerate_query(query: Option<&str>) -> bool {
    query.is_none_or(|q| q.trim().is_empty() || q == "null")
}

/// The localized strings of one language.
#[derive(Debug, Clone)]
pub struct LanguageDictionary {
    language: Language,
    /// Entries in source file order.
    entries: Vec<(String, String)>,
    /// Key → index into `entries`.
    index: HashMap<String, usize>,
}

impl LanguageDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self { language, entries: Vec::new(), index: HashMap::new() }
    }

    /// Creates a dictionary from `(key, value)` pairs.
    ///
    /// A repeated key keeps its first position and its last value.
    #[must_use]
    pub fn from_entries<K, V>(
        language: Language,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut dictionary = Self::new(language);
        for (key, value) in entries {
            dictionary.insert(key.into(), value.into());
        }
        dictionary
    }

    /// Parses one localization resource file.
    ///
    /// The language comes from the enclosing `<lang>.lproj` directory, or
    /// from the file stem when there is none.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, decoded or parsed.
    pub fn create(file_path: &Path) -> Result<Self, DictionaryParseError> {
        let language = language_for_file(file_path);

        let entries = strings::parse_file(file_path)?;
        tracing::debug!(
            file = %file_path.display(),
            language = %language,
            entries = entries.len(),
            "Parsed localization file"
        );

        Ok(Self::from_entries(language, entries))
    }

    fn insert(&mut self, key: String, value: String) {
        if let Some(slot) = self.index.get(&key).and_then(|&i| self.entries.get_mut(i)) {
            slot.1 = value;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    /// Appends entries of `other` whose keys are not present yet.
    pub(crate) fn merge(&mut self, other: Self) {
        for (key, value) in other.entries {
            if !self.index.contains_key(&key) {
                self.insert(key, value);
            }
        }
    }

    #[must_use]
    pub const fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Finds entries that plausibly correspond to `query` with every match kind enabled.
    ///
    /// See [`Self::lookup_potential_matches_with`].
    #[must_use]
    pub fn lookup_potential_matches<'a>(
        &self,
        query: impl Into<Option<&'a str>>,
    ) -> Vec<ContentMatch> {
        self.lookup_potential_matches_with(query, &MatchingConfig::default())
    }

    /// Finds entries that plausibly correspond to `query`.
    ///
    /// Each key appears at most once with its best [`MatchKind`]. Results are
    /// ordered by rank, then by position in the source file. Degenerate
    /// queries (see [`is_degenerate_query`]) match nothing.
    #[must_use]
    pub fn lookup_potential_matches_with<'a>(
        &self,
        query: impl Into<Option<&'a str>>,
        options: &MatchingConfig,
    ) -> Vec<ContentMatch> {
        let query = query.into();
        if is_degenerate_query(query) {
            return Vec::new();
        }
        let Some(query) = query else {
            return Vec::new();
        };
        let folded_query = query.to_lowercase();

        let mut found: Vec<(MatchKind, usize, ContentMatch)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, (key, value))| {
                let (kind, arguments) = Self::classify(key, value, query, &folded_query, options)?;
                let content_match = ContentMatch {
                    key: key.clone(),
                    source: self.language.clone(),
                    kind,
                    arguments,
                };
                Some((kind, position, content_match))
            })
            .collect();

        found.sort_by_key(|(kind, position, _)| (*kind, *position));
        tracing::debug!(
            language = %self.language,
            query,
            matches = found.len(),
            "Looked up potential matches"
        );
        found.into_iter().map(|(_, _, content_match)| content_match).collect()
    }

    /// Best match kind of one entry, with template arguments when relevant.
    fn classify(
        key: &str,
        value: &str,
        query: &str,
        folded_query: &str,
        options: &MatchingConfig,
    ) -> Option<(MatchKind, Vec<String>)> {
        if key == query || value == query {
            return Some((MatchKind::Exact, Vec::new()));
        }

        let folded_key = key.to_lowercase();
        let folded_value = value.to_lowercase();

        if options.case_insensitive && (folded_key == folded_query || folded_value == folded_query)
        {
            return Some((MatchKind::CaseInsensitive, Vec::new()));
        }

        if options.format_specifiers {
            let segments = format::parse_template(value);
            if format::is_template(&segments)
                && let Some(arguments) = format::match_template(&segments, query)
            {
                return Some((MatchKind::Template, arguments));
            }
        }

        if options.partial
            && (folded_key.contains(folded_query) || folded_value.contains(folded_query))
        {
            return Some((MatchKind::Partial, Vec::new()));
        }

        None
    }

    /// Resolves a match against this dictionary by key.
    ///
    /// # Errors
    /// [`TranslationNotFoundError`] if this language does not localize the key.
    pub fn translate(
        &self,
        content_match: &ContentMatch,
    ) -> Result<&str, TranslationNotFoundError> {
        self.get(content_match.key()).ok_or_else(|| TranslationNotFoundError {
            key: content_match.key().to_string(),
            language: self.language.clone(),
        })
    }

    /// Like [`Self::translate`], with the match's captured arguments
    /// substituted into the localized template.
    ///
    /// # Errors
    /// [`TranslationNotFoundError`] if this language does not localize the key.
    pub fn render(&self, content_match: &ContentMatch) -> Result<String, TranslationNotFoundError> {
        let template = self.translate(content_match)?;
        Ok(format::render(template, content_match.arguments()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::create_dictionary;

    fn keys(matches: &[ContentMatch]) -> Vec<&str> {
        matches.iter().map(ContentMatch::key).collect()
    }

    fn sample() -> LanguageDictionary {
        create_dictionary(
            "en",
            &[
                ("settings.title", "Settings"),
                ("OK", "OK"),
                ("greeting", "Hello %@"),
                ("settings.reset", "Reset all settings"),
                ("ok.button", "ok"),
                ("cancel", "Cancel"),
            ],
        )
    }

    #[rstest]
    #[case::empty(Some(""))]
    #[case::blank(Some("   "))]
    #[case::null_sentinel(Some("null"))]
    #[case::none(None)]
    fn degenerate_queries_match_nothing(#[case] query: Option<&str>) {
        assert!(sample().lookup_potential_matches(query).is_empty());
    }

    #[googletest::test]
    fn exact_match_on_value() {
        let matches = sample().lookup_potential_matches("Settings");

        expect_that!(matches[0].key(), eq("settings.title"));
        expect_that!(matches[0].kind(), eq(MatchKind::Exact));
    }

    #[googletest::test]
    fn exact_match_on_key() {
        let matches = sample().lookup_potential_matches("cancel");

        expect_that!(matches[0].key(), eq("cancel"));
        expect_that!(matches[0].kind(), eq(MatchKind::Exact));
    }

    #[googletest::test]
    fn results_ordered_by_rank_then_file_order() {
        let matches = sample().lookup_potential_matches("settings");

        // "settings.title" and "settings.reset" contain the query; "Settings"
        // equals the value of "settings.title" ignoring case.
        assert_eq!(keys(&matches), vec!["settings.title", "settings.reset"]);
        expect_that!(matches[0].kind(), eq(MatchKind::CaseInsensitive));
        expect_that!(matches[1].kind(), eq(MatchKind::Partial));
    }

    #[googletest::test]
    fn each_key_appears_once_with_best_rank() {
        let matches = sample().lookup_potential_matches("OK");

        assert_eq!(keys(&matches), vec!["OK", "ok.button"]);
        expect_that!(matches[0].kind(), eq(MatchKind::Exact));
        expect_that!(matches[1].kind(), eq(MatchKind::CaseInsensitive));
    }

    #[googletest::test]
    fn template_match_captures_arguments() {
        let matches = sample().lookup_potential_matches("Hello Bob");

        expect_that!(matches.len(), eq(1));
        expect_that!(matches[0].key(), eq("greeting"));
        expect_that!(matches[0].kind(), eq(MatchKind::Template));
        assert_eq!(matches[0].arguments(), ["Bob"]);
    }

    #[googletest::test]
    fn case_insensitive_match_ranks_before_template() {
        let dictionary =
            create_dictionary("en", &[("title", "Hello %@"), ("hello.world", "hello world")]);

        let matches = dictionary.lookup_potential_matches("Hello world");

        assert_eq!(keys(&matches), vec!["hello.world", "title"]);
        expect_that!(matches[0].kind(), eq(MatchKind::CaseInsensitive));
        expect_that!(matches[1].kind(), eq(MatchKind::Template));
    }

    #[googletest::test]
    fn bare_placeholder_values_do_not_match_everything() {
        let dictionary = create_dictionary(
            "en",
            &[("user.name", "%@"), ("count", "%d"), ("ok", "Ok"), ("cancel", "Cancel")],
        );

        let matches = dictionary.lookup_potential_matches("OK");

        assert_eq!(keys(&matches), vec!["ok"]);
        expect_that!(matches[0].kind(), eq(MatchKind::CaseInsensitive));
        assert!(dictionary.lookup_potential_matches("zzz").is_empty());
    }

    #[rstest]
    #[case::digits("3 items", Some("3"))]
    #[case::signed("-2 items", Some("-2"))]
    #[case::words("Definitely not items", None)]
    fn integer_placeholder_captures_digits_only(
        #[case] query: &str,
        #[case] expected: Option<&str>,
    ) {
        let dictionary = create_dictionary("en", &[("items", "%d items")]);

        let matches = dictionary.lookup_potential_matches(query);

        let argument = matches
            .iter()
            .find(|content_match| content_match.kind() == MatchKind::Template)
            .and_then(|content_match| content_match.arguments().first())
            .map(String::as_str);
        assert_eq!(argument, expected);
    }

    #[googletest::test]
    fn options_disable_match_kinds() {
        let options =
            MatchingConfig { format_specifiers: false, case_insensitive: false, partial: false };

        let dictionary = sample();

        assert!(dictionary.lookup_potential_matches_with("settings", &options).is_empty());
        assert!(dictionary.lookup_potential_matches_with("Hello Bob", &options).is_empty());
        expect_that!(dictionary.lookup_potential_matches_with("OK", &options).len(), eq(1));
    }

    #[googletest::test]
    fn translate_round_trips_every_key() {
        let dictionary = sample();

        for (key, value) in dictionary.entries() {
            let content_match = ContentMatch::for_key(key, dictionary.language().clone());
            assert_eq!(dictionary.translate(&content_match), Ok(value));
        }
    }

    #[googletest::test]
    fn translate_across_dictionaries_by_key() {
        let english = create_dictionary("en", &[("OK", "OK"), ("greeting", "Hello %@")]);
        let french = create_dictionary("fr", &[("greeting", "Bonjour %@"), ("OK", "D'accord")]);

        let matches = english.lookup_potential_matches("OK");

        assert_eq!(french.translate(&matches[0]), Ok("D'accord"));
    }

    #[googletest::test]
    fn translate_missing_key_is_distinct_error() {
        let french = create_dictionary("fr", &[("OK", "D'accord")]);
        let content_match = ContentMatch::for_key("cancel", Language::new("en"));

        let result = french.translate(&content_match);

        assert_eq!(
            result,
            Err(TranslationNotFoundError { key: "cancel".into(), language: Language::new("fr") })
        );
    }

    #[googletest::test]
    fn render_substitutes_captured_arguments() {
        let english = create_dictionary("en", &[("greeting", "Hello %@")]);
        let french = create_dictionary("fr", &[("greeting", "Bonjour %@ !")]);

        let matches = english.lookup_potential_matches("Hello Marie");

        assert_eq!(french.translate(&matches[0]), Ok("Bonjour %@ !"));
        assert_eq!(french.render(&matches[0]), Ok("Bonjour Marie !".to_string()));
    }

    #[googletest::test]
    fn create_reads_language_from_lproj_directory() {
        let temp_dir = TempDir::new().unwrap();
        let lproj = temp_dir.path().join("fr.lproj");
        fs::create_dir_all(&lproj).unwrap();
        let file = lproj.join("Localizable.strings");
        fs::write(&file, "\"OK\" = \"D'accord\";\n\"Cancel\" = \"Annuler\";\n").unwrap();

        let dictionary = LanguageDictionary::create(&file).unwrap();

        expect_that!(dictionary.language().identifier(), eq("fr"));
        expect_that!(dictionary.language().display_name(), eq("French"));
        expect_that!(dictionary.len(), eq(2));
        expect_that!(dictionary.get("Cancel"), some(eq("Annuler")));
    }

    #[googletest::test]
    fn create_falls_back_to_file_stem() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("de.strings");
        fs::write(&file, "\"OK\" = \"OK\";").unwrap();

        let dictionary = LanguageDictionary::create(&file).unwrap();

        expect_that!(dictionary.language().identifier(), eq("de"));
    }

    #[googletest::test]
    fn create_wraps_parse_failure() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("broken.strings");
        fs::write(&file, "\"OK\" = ").unwrap();

        let result = LanguageDictionary::create(&file);

        assert!(matches!(result, Err(DictionaryParseError::Syntax { .. })));
    }

    #[googletest::test]
    fn merge_keeps_existing_keys() {
        let mut first = create_dictionary("en", &[("a", "1"), ("b", "2")]);
        let second = create_dictionary("en", &[("b", "other"), ("c", "3")]);

        first.merge(second);

        assert_eq!(first.entries().collect::<Vec<_>>(), vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }
}
