//! Reply parsing pipeline.
//!
//! Each step is a pure function over the reply text; [`parse_reply`] chains
//! them and returns `None` when no statement survives.

use bilim_core::{CONNECTIVE, GeneratedFact};

/// Token that introduces the keyword annotation.
pub const KEYWORDS_MARKER: &str = "[keywords:";

/// Keywords used when the reply carries no annotation.
pub const DEFAULT_KEYWORDS: &str = "interesting fact, world, nature";

const QUOTES: [char; 5] = ['"', '“', '”', '«', '»'];

/// Trims the text and removes every quotation mark.
///
/// ```
/// use bilim_models::parse::strip_quotes;
///
/// assert_eq!(strip_quotes("  «Oy» \"sovuq\" "), "Oy sovuq");
/// ```
pub fn strip_quotes(text: &str) -> String {
    text.replace(&QUOTES[..], "").trim().to_string()
}

/// Discards everything from the first `(` onward.
pub fn strip_parenthetical(text: &str) -> &str {
    match text.find('(') {
        Some(index) => text[..index].trim(),
        None => text.trim(),
    }
}

/// Splits the reply into body and keyword annotation.
///
/// The keywords are the first line after the marker with `]` removed. A reply
/// without the marker gets [`DEFAULT_KEYWORDS`].
///
/// ```
/// use bilim_models::parse::split_keywords;
///
/// let (body, keywords) = split_keywords("Fakt\n[keywords: moon, ice]\nextra");
/// assert_eq!(body, "Fakt");
/// assert_eq!(keywords, "moon, ice");
/// ```
pub fn split_keywords(text: &str) -> (&str, String) {
    let mut parts = text.split(KEYWORDS_MARKER);
    let body = parts.next().unwrap_or_default().trim();

    match parts.last() {
        Some(annotation) => {
            let cleaned = annotation.replace(']', "");
            let first_line = cleaned.trim().lines().next().unwrap_or_default().trim();
            (body, first_line.to_string())
        }
        None => (body, DEFAULT_KEYWORDS.to_string()),
    }
}

/// Non-empty trimmed lines.
pub fn split_lines(body: &str) -> Vec<&str> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Prefixes the connective unless the line already starts with it, ignoring case.
pub fn ensure_connective(line: &str) -> String {
    let starts_with_connective = line
        .get(..CONNECTIVE.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CONNECTIVE));

    if starts_with_connective {
        line.to_string()
    } else {
        format!("{} {}", CONNECTIVE, line)
    }
}

/// Splits a single-line body on the connective.
///
/// Returns statement and explanation only when the connective occurs exactly
/// once.
pub fn split_on_connective(body: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = body.split(CONNECTIVE).collect();
    match parts.as_slice() {
        [statement, explanation] => Some((
            statement.trim().to_string(),
            format!("{} {}", CONNECTIVE, explanation.trim()),
        )),
        _ => None,
    }
}

/// Runs the whole pipeline over a reply.
///
/// ```
/// use bilim_models::parse::parse_reply;
///
/// let fact = parse_reply("Oy atrofida suv muzi bor\nChunki qutblarda soya doimiy\n[keywords: moon, ice, poles, shadow]").unwrap();
/// assert_eq!(fact.statement(), "Oy atrofida suv muzi bor");
/// assert_eq!(fact.explanation().as_deref(), Some("Chunki qutblarda soya doimiy"));
/// ```
pub fn parse_reply(text: &str) -> Option<GeneratedFact> {
    let unquoted = strip_quotes(text);
    let trimmed = strip_parenthetical(&unquoted);
    let (body, keywords) = split_keywords(trimmed);
    let lines = split_lines(body);

    let (statement, explanation) = match lines.as_slice() {
        [first, second, ..] => (first.to_string(), Some(ensure_connective(second))),
        _ => match split_on_connective(body) {
            Some((statement, explanation)) => (statement, Some(explanation)),
            None => (body.to_string(), None),
        },
    };

    if statement.trim().is_empty() {
        return None;
    }

    Some(GeneratedFact::new(statement, explanation, keywords))
}
