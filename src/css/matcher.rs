//! Locating `egal(...)` calls in arbitrary text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static CALL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)egal\(").expect("invalid regex"));

/// One occurrence of `egal(` and the extent of its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Byte range of the whole call, from `e` through the closing `)`.
    pub span: Range<usize>,
    /// Byte range between the parentheses.
    pub arguments: Range<usize>,
    /// False when the input ended before the closing parenthesis.
    pub terminated: bool,
}

impl CallSite {
    /// The call's text within `source`.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Find every `egal(` in `text`, in order of appearance.
///
/// Matching is case-insensitive and skips `egal(` preceded by an identifier
/// character, so `my-egal(` is not a call. Calls nested inside other calls
/// are reported too. The extent of a call is found by counting parentheses
/// outside quoted strings; an unterminated call runs to the end of `text`.
#[must_use]
pub fn find_call_sites(text: &str) -> Vec<CallSite> {
    CALL_START
        .find_iter(text)
        .filter(|m| !preceded_by_ident_char(text, m.start()))
        .map(|m| {
            let (close, terminated) = match find_closing_paren(text, m.end()) {
                Some(close) => (close, true),
                None => (text.len(), false),
            };
            CallSite {
                span: m.start()..if terminated { close + 1 } else { close },
                arguments: m.end()..close,
                terminated,
            }
        })
        .collect()
}

fn preceded_by_ident_char(text: &str, pos: usize) -> bool {
    text[..pos]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '\\')
}

/// Byte offset of the `)` closing a list that starts at `from`.
fn find_closing_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text[from..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' if depth == 0 => return Some(from + offset),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
