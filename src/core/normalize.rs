use serde_json::Value;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A list-like field that could not be parsed.
///
/// Always recovered locally by [`split_list`]; never reaches a caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataShapeError {
    #[error("list literal is not terminated by ']'")]
    Unterminated,

    #[error("unterminated quoted item starting at byte {0}")]
    UnterminatedQuote(usize),

    #[error("unexpected character {0:?} at byte {1}")]
    UnexpectedChar(char, usize),

    #[error("trailing content after closing bracket")]
    TrailingContent,
}

/// Fold text into its canonical comparison form.
///
/// Accents are stripped to their base letter, the result is lowercased,
/// and whitespace is trimmed and collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
    {
        match c {
            'ß' => folded.push_str("ss"),
            'æ' => folded.push_str("ae"),
            'œ' => folded.push_str("oe"),
            'ø' => folded.push('o'),
            'đ' => folded.push('d'),
            'ł' => folded.push('l'),
            'ı' => folded.push('i'),
            _ => folded.push(c),
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a list-like field into normalized, non-empty elements.
///
/// Accepts a delimiter-separated string (`"Romantic, Coffee"`) or a
/// bracketed list literal (`"['Romantic', 'Coffee']"`). A malformed literal
/// yields an empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    split_labels(raw).iter().map(|label| normalize(label)).collect()
}

/// Like [`split_list`] but keeps the original spelling of each element.
pub fn split_labels(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();

    let items = if trimmed.starts_with('[') {
        match parse_list_literal(trimmed) {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!("Ignoring malformed list field {:?}: {}", raw, e);
                return Vec::new();
            }
        }
    } else {
        trimmed
            .split([',', ';'])
            .map(str::to_string)
            .collect()
    };

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// List-valued row cell: a JSON array of strings, or text run through
/// [`split_labels`]. Anything else is an empty list.
pub fn labels_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) => split_labels(s),
        _ => Vec::new(),
    }
}

/// Parse a bracketed list literal such as `['a', "b", c]`.
///
/// Items may be single-quoted, double-quoted (with backslash escapes) or
/// bare. Nested lists are rejected.
pub fn parse_list_literal(input: &str) -> Result<Vec<String>, DataShapeError> {
    let mut chars = input.char_indices().peekable();
    let mut items = Vec::new();

    match chars.next() {
        Some((_, '[')) => {}
        Some((pos, c)) => return Err(DataShapeError::UnexpectedChar(c, pos)),
        None => return Err(DataShapeError::Unterminated),
    }

    loop {
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }

        let (pos, c) = chars.next().ok_or(DataShapeError::Unterminated)?;
        match c {
            ']' => break,
            '\'' | '"' => {
                let mut item = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                item.push(escaped);
                            }
                        }
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => item.push(ch),
                    }
                }
                if !closed {
                    return Err(DataShapeError::UnterminatedQuote(pos));
                }
                items.push(item);
            }
            '[' | ',' => return Err(DataShapeError::UnexpectedChar(c, pos)),
            _ => {
                let mut item = String::from(c);
                while let Some(&(p, ch)) = chars.peek() {
                    if matches!(ch, ',' | ']') {
                        break;
                    }
                    if matches!(ch, '[' | '\'' | '"') {
                        return Err(DataShapeError::UnexpectedChar(ch, p));
                    }
                    item.push(ch);
                    chars.next();
                }
                items.push(item.trim_end().to_string());
            }
        }

        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }

        match chars.next() {
            Some((_, ',')) => continue,
            Some((_, ']')) => break,
            Some((pos, c)) => return Err(DataShapeError::UnexpectedChar(c, pos)),
            None => return Err(DataShapeError::Unterminated),
        }
    }

    if chars.any(|(_, c)| !c.is_whitespace()) {
        return Err(DataShapeError::TrailingContent);
    }

    Ok(items)
}
