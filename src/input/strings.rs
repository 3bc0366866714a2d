//! Localization resource file parsing.
//!
//! Two table formats are accepted:
//! - the `.strings` text format shipped in `<lang>.lproj` directories
//!   (`"key" = "value";`, UTF-8 or UTF-16 with BOM)
//! - JSON string tables, as produced by `plutil -convert json`

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::DictionaryParseError;

/// Ordered `(key, value)` pairs as they appear in the source file.
pub type Entries = Vec<(String, String)>;

/// Read, decode and parse one localization resource file.
///
/// # Errors
/// Returns error if the file cannot be read, decoded or parsed.
pub fn parse_file(file_path: &Path) -> Result<Entries, DictionaryParseError> {
    let bytes = std::fs::read(file_path)?;
    let text = decode(&bytes)?;
    parse_content(&text)
}

/// Decode raw file bytes into text.
///
/// UTF-16 requires a byte order mark; anything else must be UTF-8.
///
/// # Errors
/// Binary property lists and undecodable content.
pub fn decode(bytes: &[u8]) -> Result<String, DictionaryParseError> {
    if bytes.starts_with(b"bplist") {
        return Err(DictionaryParseError::BinaryPropertyList);
    }

    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return decode_utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }

    decode_utf8(bytes)
}

fn decode_utf8(bytes: &[u8]) -> Result<String, DictionaryParseError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DictionaryParseError::UnsupportedEncoding(format!("invalid UTF-8: {e}")))
}

fn decode_utf16(
    bytes: &[u8],
    to_unit: fn([u8; 2]) -> u16,
) -> Result<String, DictionaryParseError> {
    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(DictionaryParseError::UnsupportedEncoding(
            "UTF-16 content has an odd number of bytes".to_string(),
        ));
    }

    let units: Vec<u16> =
        chunks.filter_map(|pair| <[u8; 2]>::try_from(pair).ok()).map(to_unit).collect();
    String::from_utf16(&units)
        .map_err(|e| DictionaryParseError::UnsupportedEncoding(format!("invalid UTF-16: {e}")))
}

/// Parse decoded file content.
///
/// Content that starts with `{` and is valid JSON is read as a JSON string
/// table; everything else goes through the `.strings` parser.
///
/// # Errors
/// Returns error on `.strings` syntax errors.
pub fn parse_content(text: &str) -> Result<Entries, DictionaryParseError> {
    if text.trim_start().starts_with('{')
        && let Ok(json @ Value::Object(_)) = serde_json::from_str::<Value>(text)
    {
        return Ok(flatten_json(&json, ".", None));
    }

    StringsParser::new(text).parse()
}

/// Flatten nested JSON object into dot-separated key list.
///
/// Keeps the order of the source document.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use bundle_l10n::input::strings::flatten_json;
///
/// let json = json!({
///     "alert": {
///         "ok": "OK",
///         "cancel": "Cancel"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened[0], ("alert.ok".to_string(), "OK".to_string()));
/// assert_eq!(flattened[1], ("alert.cancel".to_string(), "Cancel".to_string()));
/// ```
#[must_use]
pub fn flatten_json(json: &Value, separator: &str, prefix: Option<&str>) -> Entries {
    let mut result = EntryList::default();
    flatten_json_value(json, separator, prefix, &mut result);
    result.into_entries()
}

fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut EntryList,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.push(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.push(key.to_string(), json.to_string());
            }
        }
    }
}

/// Entry accumulator: a repeated key keeps its first position and takes the last value.
#[derive(Debug, Default)]
struct EntryList {
    entries: Entries,
    positions: HashMap<String, usize>,
}

impl EntryList {
    fn push(&mut self, key: String, value: String) {
        if let Some(slot) = self.positions.get(&key).and_then(|&i| self.entries.get_mut(i)) {
            tracing::debug!(key = %key, "Duplicate key in localization file, last value wins");
            slot.1 = value;
            return;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    fn into_entries(self) -> Entries {
        self.entries
    }
}

/// Characters allowed in unquoted keys and values.
fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':' | '/' | '-')
}

/// Recursive-descent parser for the `.strings` text format.
struct StringsParser {
    chars: Vec<char>,
    pos: usize,
}

impl StringsParser {
    fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Syntax error at the current position (1-based line and column).
    fn error(&self, message: impl Into<String>) -> DictionaryParseError {
        let consumed = self.chars.get(..self.pos).unwrap_or_default();
        let line = 1 + consumed.iter().filter(|&&c| c == '\n').count();
        let column = 1 + consumed.iter().rev().take_while(|&&c| c != '\n').count();
        DictionaryParseError::Syntax { line, column, message: message.into() }
    }

    fn parse(mut self) -> Result<Entries, DictionaryParseError> {
        let mut entries = EntryList::default();

        self.skip_trivia()?;
        let braced = self.peek() == Some('{');
        if braced {
            self.bump();
        }

        loop {
            self.skip_trivia()?;
            match self.peek() {
                None if braced => return Err(self.error("expected '}' before end of file")),
                None => break,
                Some('}') if braced => {
                    self.bump();
                    self.skip_trivia()?;
                    if let Some(c) = self.peek() {
                        return Err(self.error(format!("unexpected '{c}' after closing '}}'")));
                    }
                    break;
                }
                Some(_) => {}
            }

            let key = self.parse_string("key")?;
            self.skip_trivia()?;

            // `"key";` is shorthand for `"key" = "key";`
            let value = if self.peek() == Some('=') {
                self.bump();
                self.skip_trivia()?;
                let value = self.parse_string("value")?;
                self.skip_trivia()?;
                value
            } else {
                key.clone()
            };

            if self.peek() != Some(';') {
                return Err(self.error(format!("expected ';' after entry '{key}'")));
            }
            self.bump();

            entries.push(key, value);
        }

        Ok(entries.into_entries())
    }

    /// Skip whitespace, `/* */` and `//` comments.
    fn skip_trivia(&mut self) -> Result<(), DictionaryParseError> {
        loop {
            match (self.peek(), self.peek_next()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_next()) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                self.pos = start;
                                return Err(self.error("unterminated comment"));
                            }
                        }
                    }
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_string(&mut self, what: &str) -> Result<String, DictionaryParseError> {
        match self.peek() {
            Some('"') => self.parse_quoted(),
            Some(c) if is_unquoted_char(c) => Ok(self.parse_unquoted()),
            Some(c) => Err(self.error(format!("expected {what}, found '{c}'"))),
            None => Err(self.error(format!("expected {what}, found end of file"))),
        }
    }

    fn parse_unquoted(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek().filter(|&c| is_unquoted_char(c)) {
            text.push(c);
            self.bump();
        }
        text
    }

    fn parse_quoted(&mut self) -> Result<String, DictionaryParseError> {
        let start = self.pos;
        self.bump();

        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => text.push(self.parse_escape()?),
                Some(c) => text.push(c),
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, DictionaryParseError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };

        let escaped = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'u' | 'U' => self.parse_unicode_escape()?,
            '0'..='7' => self.parse_octal_escape(c),
            other => other,
        };
        Ok(escaped)
    }

    /// `\UXXXX`, combining a UTF-16 surrogate pair written as two escapes.
    fn parse_unicode_escape(&mut self) -> Result<char, DictionaryParseError> {
        let high = self.parse_hex4()?;

        let code_point = if (0xD800..0xDC00).contains(&high) {
            if self.peek() != Some('\\') || !matches!(self.peek_next(), Some('u' | 'U')) {
                return Err(self.error("unpaired surrogate in unicode escape"));
            }
            self.pos += 2;
            let low = self.parse_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("invalid low surrogate in unicode escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code_point).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32, DictionaryParseError> {
        let mut value = 0;
        for _ in 0..4 {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("expected 4 hex digits in unicode escape"))?;
            self.bump();
            value = value * 16 + digit;
        }
        Ok(value)
    }

    /// Up to three octal digits, the first already consumed.
    fn parse_octal_escape(&mut self, first: char) -> char {
        let mut value = first.to_digit(8).unwrap_or_default();
        for _ in 0..2 {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(8)) else {
                break;
            };
            self.bump();
            value = value * 8 + digit;
        }
        char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}
