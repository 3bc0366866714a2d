//! Core types used throughout the project.

use std::collections::HashMap;
use std::fmt;
use std::hash::{
    Hash,
    Hasher,
};
use std::sync::LazyLock;

/// Display names for locale identifiers found in application bundles.
///
/// Covers ISO codes (`en`, `zh-Hans`) as well as the legacy `.lproj`
/// names (`English`, `Japanese`) that older bundles still ship.
static DISPLAY_NAMES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    [
        ("ar", "Arabic"),
        ("Base", "Base"),
        ("ca", "Catalan"),
        ("cs", "Czech"),
        ("da", "Danish"),
        ("de", "German"),
        ("de-AT", "German (Austria)"),
        ("de-CH", "German (Switzerland)"),
        ("el", "Greek"),
        ("en", "English"),
        ("en-AU", "English (Australia)"),
        ("en-CA", "English (Canada)"),
        ("en-GB", "English (United Kingdom)"),
        ("en-IN", "English (India)"),
        ("en-US", "English (United States)"),
        ("es", "Spanish"),
        ("es-419", "Spanish (Latin America)"),
        ("es-MX", "Spanish (Mexico)"),
        ("fi", "Finnish"),
        ("fr", "French"),
        ("fr-CA", "French (Canada)"),
        ("he", "Hebrew"),
        ("hi", "Hindi"),
        ("hr", "Croatian"),
        ("hu", "Hungarian"),
        ("id", "Indonesian"),
        ("it", "Italian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("ms", "Malay"),
        ("nb", "Norwegian Bokmål"),
        ("nl", "Dutch"),
        ("pl", "Polish"),
        ("pt", "Portuguese"),
        ("pt-BR", "Portuguese (Brazil)"),
        ("pt-PT", "Portuguese (Portugal)"),
        ("ro", "Romanian"),
        ("ru", "Russian"),
        ("sk", "Slovak"),
        ("sv", "Swedish"),
        ("th", "Thai"),
        ("tr", "Turkish"),
        ("uk", "Ukrainian"),
        ("vi", "Vietnamese"),
        ("zh-Hans", "Chinese (Simplified)"),
        ("zh-Hant", "Chinese (Traditional)"),
        ("zh-HK", "Chinese (Hong Kong)"),
        // Legacy bundle directory names
        ("Dutch", "Dutch"),
        ("English", "English"),
        ("French", "French"),
        ("German", "German"),
        ("Italian", "Italian"),
        ("Japanese", "Japanese"),
        ("Spanish", "Spanish"),
    ]
    .iter()
    .flat_map(|(code, name)| {
        let normalized = normalize_identifier(code);
        [((*code).to_string(), *name), (normalized, *name)]
    })
    .collect()
});

/// Normalize a locale identifier for table lookup (lowercase, `_` → `-`).
fn normalize_identifier(identifier: &str) -> String {
    identifier.to_lowercase().replace('_', "-")
}

/// A locale supported by an application bundle.
///
/// Two values are the same language when their identifiers are equal,
/// whatever their display names say.
#[derive(Debug, Clone)]
pub struct Language {
    identifier: String,
    display_name: String,
}

impl Language {
    /// Creates a language, resolving the display name from the known table.
    ///
    /// Unknown identifiers use the identifier itself as display name.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let display_name = DISPLAY_NAMES
            .get(&identifier)
            .or_else(|| DISPLAY_NAMES.get(&normalize_identifier(&identifier)))
            .map_or_else(|| identifier.clone(), |name| (*name).to_string());
        Self { identifier, display_name }
    }

    #[must_use]
    pub fn with_display_name(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self { identifier: identifier.into(), display_name: display_name.into() }
    }

    /// Locale identifier, e.g. `en` or `zh-Hans`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human-readable name, used as the field name in translation reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.identifier)
    }
}

/// Field names for `languages` in a JSON object, in the same order.
///
/// Display names are used as is; languages sharing a display name are
/// written as `"<display name> (<identifier>)"` instead.
#[must_use]
pub fn display_keys(languages: &[&Language]) -> Vec<String> {
    languages
        .iter()
        .map(|language| {
            let shared = languages
                .iter()
                .filter(|other| other.display_name() == language.display_name())
                .count()
                > 1;
            if shared { language.to_string() } else { language.display_name().to_string() }
        })
        .collect()
}
