//! printf-style format templates found in localized values.
//!
//! A value such as `"Hello %@, you have %d messages"` is a template: the
//! literal text must appear verbatim, each specifier stands for an argument.

use std::collections::HashSet;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// A conversion specifier; `position` is 1-based.
    Placeholder { position: usize, spec: String },
}

/// Conversion characters accepted after flags, width, precision and length.
const CONVERSIONS: &[char] = &[
    '@', 'd', 'D', 'i', 'u', 'U', 'x', 'X', 'o', 'O', 'f', 'F', 'e', 'E', 'g', 'G', 'a', 'A', 'c',
    'C', 's', 'S', 'p',
];

const LENGTH_MODIFIERS: &[char] = &['h', 'l', 'q', 'L', 'z', 't', 'j'];

const FLAGS: &[char] = &['-', '+', '#', '0'];

/// Split a localized value into literal text and placeholders.
///
/// `%%` is a literal percent sign. A `%` that does not start a valid
/// specifier is kept as literal text.
#[must_use]
pub fn parse_template(value: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut next_position = 1;
    let mut rest = value;

    while let Some(index) = rest.find('%') {
        literal.push_str(rest.get(..index).unwrap_or_default());
        let after = rest.get(index..).unwrap_or_default();

        if let Some(tail) = after.strip_prefix("%%") {
            literal.push('%');
            rest = tail;
            continue;
        }

        match scan_specifier(after) {
            Some((spec_len, explicit)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let position = explicit.unwrap_or_else(|| {
                    let position = next_position;
                    next_position += 1;
                    position
                });
                let spec = after.get(..spec_len).unwrap_or_default().to_string();
                segments.push(Segment::Placeholder { position, spec });
                rest = after.get(spec_len..).unwrap_or_default();
            }
            None => {
                literal.push('%');
                rest = after.get(1..).unwrap_or_default();
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Length in bytes of the specifier at the start of `text` and its explicit
/// position (`%2$@`), if any.
fn scan_specifier(text: &str) -> Option<(usize, Option<usize>)> {
    let body = text.strip_prefix('%')?;

    // `%n$` selects the argument explicitly; positions are 1-based
    let digits_len = body.bytes().take_while(u8::is_ascii_digit).count();
    let (explicit, start) = if digits_len > 0
        && body.get(digits_len..).is_some_and(|s| s.starts_with('$'))
    {
        let position = body.get(..digits_len)?.parse::<usize>().ok().filter(|&n| n > 0)?;
        (Some(position), digits_len + 1)
    } else {
        (None, 0)
    };

    let mut chars = body.get(start..)?.char_indices().peekable();
    while chars.next_if(|(_, c)| FLAGS.contains(c)).is_some() {}
    while chars.next_if(|(_, c)| c.is_ascii_digit() || *c == '*').is_some() {}
    if chars.next_if(|(_, c)| *c == '.').is_some() {
        while chars.next_if(|(_, c)| c.is_ascii_digit() || *c == '*').is_some() {}
    }
    while chars.next_if(|(_, c)| LENGTH_MODIFIERS.contains(c)).is_some() {}

    let (index, conversion) = chars.next()?;
    CONVERSIONS
        .contains(&conversion)
        .then(|| (1 + start + index + conversion.len_utf8(), explicit))
}

/// Returns true if the value has at least one placeholder and some literal
/// text to anchor it.
///
/// Values made only of placeholders and whitespace (`"%@"`, `"%@ %d"`) are
/// not templates.
#[must_use]
pub fn is_template(segments: &[Segment]) -> bool {
    let has_placeholder =
        segments.iter().any(|segment| matches!(segment, Segment::Placeholder { .. }));
    let has_anchor = segments.iter().any(|segment| {
        matches!(segment, Segment::Literal(text) if text.chars().any(|c| !c.is_whitespace()))
    });
    has_placeholder && has_anchor
}

/// Text a placeholder accepts, from its conversion character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentKind {
    Any,
    /// `d i u`: optional sign, then decimal digits
    Decimal,
    Hexadecimal,
    Octal,
    /// `c`: exactly one character
    Character,
}

impl ArgumentKind {
    fn of(spec: &str) -> Self {
        match spec.chars().last() {
            Some('d' | 'D' | 'i' | 'u' | 'U') => Self::Decimal,
            Some('x' | 'X') => Self::Hexadecimal,
            Some('o' | 'O') => Self::Octal,
            Some('c' | 'C') => Self::Character,
            _ => Self::Any,
        }
    }

    /// Byte lengths of the prefixes of `input` this kind accepts, shortest first.
    fn candidate_lengths(self, input: &str) -> Vec<usize> {
        let run = |accept: fn(&u8) -> bool| input.bytes().take_while(accept).count();
        match self {
            Self::Any => (1..=input.len()).filter(|&end| input.is_char_boundary(end)).collect(),
            Self::Decimal => {
                let sign = usize::from(input.starts_with(['+', '-']));
                let digits = input
                    .get(sign..)
                    .map_or(0, |rest| rest.bytes().take_while(u8::is_ascii_digit).count());
                (sign + 1..=sign + digits).collect()
            }
            Self::Hexadecimal => (1..=run(u8::is_ascii_hexdigit)).collect(),
            Self::Octal => (1..=run(|b| (b'0'..=b'7').contains(b))).collect(),
            Self::Character => input.chars().next().map(char::len_utf8).into_iter().collect(),
        }
    }
}

/// Match `input` against a template, capturing one argument per placeholder.
///
/// Each placeholder spans at least one character; numeric conversions only
/// span digits. Returns the arguments ordered by placeholder position, or
/// `None` if the input does not fit.
#[must_use]
pub fn match_template(segments: &[Segment], input: &str) -> Option<Vec<String>> {
    let mut matcher = TemplateMatcher {
        segments,
        input,
        dead_ends: HashSet::new(),
        captured: Vec::new(),
    };
    if !matcher.matches_from(0, 0) {
        return None;
    }

    let mut captured = matcher.captured;
    captured.sort_by_key(|(position, _)| *position);
    Some(captured.into_iter().map(|(_, argument)| argument).collect())
}

/// Backtracking matcher over `(segment index, byte offset)` states.
struct TemplateMatcher<'a> {
    segments: &'a [Segment],
    input: &'a str,
    /// States already known not to lead to a match
    dead_ends: HashSet<(usize, usize)>,
    /// `(position, argument)` for the placeholders matched so far
    captured: Vec<(usize, String)>,
}

impl TemplateMatcher<'_> {
    fn matches_from(&mut self, index: usize, offset: usize) -> bool {
        if self.dead_ends.contains(&(index, offset)) {
            return false;
        }
        let (segments, input) = (self.segments, self.input);
        let Some(rest) = input.get(offset..) else {
            return false;
        };

        let matched = match segments.get(index) {
            None => rest.is_empty(),
            Some(Segment::Literal(literal)) => {
                rest.starts_with(literal.as_str())
                    && self.matches_from(index + 1, offset + literal.len())
            }
            Some(Segment::Placeholder { position, spec }) => {
                self.match_placeholder(index, offset, *position, ArgumentKind::of(spec))
            }
        };

        if !matched {
            self.dead_ends.insert((index, offset));
        }
        matched
    }

    fn match_placeholder(
        &mut self,
        index: usize,
        offset: usize,
        position: usize,
        kind: ArgumentKind,
    ) -> bool {
        let input = self.input;
        let Some(rest) = input.get(offset..) else {
            return false;
        };

        for length in kind.candidate_lengths(rest) {
            let Some(argument) = rest.get(..length) else {
                continue;
            };
            self.captured.push((position, argument.to_string()));
            if self.matches_from(index + 1, offset + length) {
                return true;
            }
            self.captured.pop();
        }
        false
    }
}

/// Substitute arguments into a template.
///
/// Placeholders without a matching argument are left as written.
#[must_use]
pub fn render(template: &str, arguments: &[String]) -> String {
    let mut output = String::new();
    for segment in parse_template(template) {
        match segment {
            Segment::Literal(text) => output.push_str(&text),
            Segment::Placeholder { position, spec } => {
                match position.checked_sub(1).and_then(|index| arguments.get(index)) {
                    Some(argument) => output.push_str(argument),
                    None => output.push_str(&spec),
                }
            }
        }
    }
    output
}
