//! Argument parsing for `egal(...)` calls.
//!
//! The accepted syntax is
//!
//! ```text
//! egal( L sep C sep H [ / A ] [ sep GAMUT ] [ sep 'JSON' ] )
//! ```
//!
//! where `sep` is whitespace with at most one comma. `L`, `C` and `A` are
//! numbers, percentages or `none`; `H` is a number, an angle or `none`.
//! `GAMUT` is `srgb`, `rgb`, `p3`, `rec2020` or `rec.2020`, and `JSON` is a
//! single-quoted object of options (`''` for none).
//!
//! A call that does not match is classified to give the most helpful
//! message. The checks run in a fixed order and the first hit wins:
//!
//! 1. `none%` used as a value,
//! 2. whitespace between a number and its `%`,
//! 3. a quoted gamut keyword,
//! 4. double-quoted JSON,
//! 5. anything else: "Couldn't parse egal color".

use std::f64::consts::PI;
use std::fmt;
use std::ops::Range;

use crate::options::OptionsLayer;
use crate::space::Gamut;

use super::RewriteOptions;
use super::lexer::{Token, TokenKind, tokenize};

/// Message for calls that match no specific problem.
pub const COULD_NOT_PARSE: &str = "Couldn't parse egal color";

/// Message for malformed inline JSON when JSON is strict.
pub const INVALID_JSON: &str = "Invalid JSON options in egal color";

const CALL_PREFIX: &str = "egal(";

/// Why a call could not be parsed.
///
/// `span` is a byte range within the call text handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProblem {
    pub message: String,
    pub span: Range<usize>,
}

impl ParseProblem {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// The generic problem covering the whole call.
    #[must_use]
    pub fn generic(call: &str) -> Self {
        Self::new(COULD_NOT_PARSE, 0..call.len())
    }
}

impl fmt::Display for ParseProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseProblem {}

/// Arguments of a successfully parsed call.
#[derive(Debug, Clone, Default)]
pub struct ParsedCall {
    /// In the units of the color space; `%` has already been applied.
    pub lightness: f64,
    /// Fraction of the chroma floor.
    pub chroma: f64,
    /// Degrees.
    pub hue: f64,
    /// Alpha given after `/`.
    pub alpha: Option<f64>,
    /// Gamut given as a keyword.
    pub gamut: Option<Gamut>,
    /// Options from the quoted JSON segment.
    pub json: Option<OptionsLayer>,
}

impl ParsedCall {
    #[must_use]
    pub fn new(lightness: f64, chroma: f64, hue: f64) -> Self {
        Self {
            lightness,
            chroma,
            hue,
            ..Self::default()
        }
    }

    /// Options for this call on top of `base`.
    ///
    /// JSON options override `base`; alpha and gamut written directly in the
    /// call override both.
    #[must_use]
    pub fn layer(&self, base: &OptionsLayer) -> OptionsLayer {
        let direct = OptionsLayer {
            opacity: self.alpha,
            gamut: self.gamut,
            ..OptionsLayer::default()
        };
        match &self.json {
            Some(json) => direct.over(&json.over(base)),
            None => direct.over(base),
        }
    }
}

/// Turns the text of one call into arguments.
///
/// `call` runs from the `egal` name through the closing parenthesis (or the
/// end of input for an unterminated call). Problem spans are relative to
/// `call`.
///
/// Closures with the same signature are parsers too:
///
/// ```
/// use egal::css::{ParsedCall, RewriteOptions, Rewriter};
///
/// let rewriter = Rewriter::new()
///     .with_parser(|_call: &str, _options: &RewriteOptions| Ok(ParsedCall::new(0.5, 1.0, 0.0)));
/// let (text, _) = rewriter.rewrite("color: egal(anything)");
/// assert_eq!(text, "color: oklch(50% 0.08501 0)");
/// ```
pub trait CallParser: Send + Sync {
    fn parse(&self, call: &str, options: &RewriteOptions) -> Result<ParsedCall, ParseProblem>;
}

impl<F> CallParser for F
where
    F: Fn(&str, &RewriteOptions) -> Result<ParsedCall, ParseProblem> + Send + Sync,
{
    fn parse(&self, call: &str, options: &RewriteOptions) -> Result<ParsedCall, ParseProblem> {
        self(call, options)
    }
}

/// The built-in parser for the syntax described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCallParser;

impl CallParser for DefaultCallParser {
    fn parse(&self, call: &str, options: &RewriteOptions) -> Result<ParsedCall, ParseProblem> {
        let has_prefix = call
            .get(..CALL_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CALL_PREFIX));
        if !has_prefix {
            return Err(ParseProblem::generic(call));
        }

        let mut tokens = tokenize(&call[CALL_PREFIX.len()..]);
        for token in &mut tokens {
            token.span = token.span.start + CALL_PREFIX.len()..token.span.end + CALL_PREFIX.len();
        }

        let mut cursor = Cursor {
            tokens: &tokens,
            pos: 0,
        };
        match cursor.call(options.strict_json) {
            Ok(parsed) => Ok(parsed),
            Err(Failure::Json(problem)) => Err(problem),
            Err(Failure::Grammar) => Err(classify(call, &tokens)),
        }
    }
}

enum Failure {
    /// The text does not match the grammar.
    Grammar,
    /// The grammar matched but the JSON segment is unusable.
    Json(ParseProblem),
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Whitespace)
        {
            self.pos += 1;
        }
    }

    /// Whitespace with at most one comma. Returns false if nothing was eaten.
    /// Whitespace with at most one comma.
    fn separator(&mut self) -> bool {
        let start = self.pos;
        let mut comma = false;
        while let Some(token) = self.peek().filter(|t| t.is_separator()) {
            if token.kind == TokenKind::Comma {
                if comma {
                    break;
                }
                comma = true;
            }
            self.pos += 1;
        }
        self.pos > start
    }

    fn value(&mut self, angle: bool) -> Result<f64, Failure> {
        let token = self.next().ok_or(Failure::Grammar)?;
        match &token.kind {
            TokenKind::Number(n) => Ok(*n),
            TokenKind::Percentage(n) if !angle => Ok(n / 100.0),
            TokenKind::Dimension(n, unit) if angle => {
                degrees_per_unit(unit).map(|k| n * k).ok_or(Failure::Grammar)
            }
            TokenKind::Ident(ident) if ident.eq_ignore_ascii_case("none") => Ok(0.0),
            _ => Err(Failure::Grammar),
        }
    }

    fn call(&mut self, strict_json: bool) -> Result<ParsedCall, Failure> {
        self.skip_whitespace();
        let lightness = self.value(false)?;
        self.expect_separator()?;
        let chroma = self.value(false)?;
        self.expect_separator()?;
        let hue = self.value(true)?;
        let mut parsed = ParsedCall::new(lightness, chroma, hue);

        let before_slash = self.pos;
        self.skip_whitespace();
        if self.peek().is_some_and(|t| t.kind == TokenKind::Slash) {
            self.pos += 1;
            self.skip_whitespace();
            parsed.alpha = Some(self.value(false)?);
        } else {
            self.pos = before_slash;
        }

        let before_gamut = self.pos;
        let gamut = if self.separator() {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Ident(ident)) => Gamut::from_keyword(ident),
                _ => None,
            }
        } else {
            None
        };
        match gamut {
            Some(gamut) => {
                self.pos += 1;
                parsed.gamut = Some(gamut);
            }
            None => self.pos = before_gamut,
        }

        let before_json = self.pos;
        let json = if self.separator() {
            self.peek().and_then(|token| match &token.kind {
                TokenKind::Str {
                    quote: '\'',
                    value,
                    terminated: true,
                } => Some((token, value)),
                _ => None,
            })
        } else {
            None
        };
        match json {
            Some((token, value)) => {
                self.pos += 1;
                parsed.json = json_options(value, token.span.clone(), strict_json)?;
            }
            None => self.pos = before_json,
        }

        self.skip_whitespace();
        match (self.next().map(|t| &t.kind), self.peek()) {
            (Some(TokenKind::CloseParen), None) => Ok(parsed),
            _ => Err(Failure::Grammar),
        }
    }

    fn expect_separator(&mut self) -> Result<(), Failure> {
        if self.separator() {
            Ok(())
        } else {
            Err(Failure::Grammar)
        }
    }
}

fn degrees_per_unit(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "deg" => Some(1.0),
        "grad" => Some(360.0 / 400.0),
        "rad" => Some(180.0 / PI),
        "turn" => Some(360.0),
        _ => None,
    }
}

fn json_options(
    value: &str,
    span: Range<usize>,
    strict: bool,
) -> Result<Option<OptionsLayer>, Failure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(Failure::Grammar);
    }
    match OptionsLayer::from_json(trimmed) {
        Ok(layer) => Ok(Some(layer)),
        Err(e) if strict => {
            log::debug!(target: "egal::css", "{INVALID_JSON}: {e}");
            Err(Failure::Json(ParseProblem::new(INVALID_JSON, span)))
        }
        Err(e) => {
            log::warn!(target: "egal::css", "{INVALID_JSON}, ignoring them: {e}");
            Ok(None)
        }
    }
}

fn classify(call: &str, tokens: &[Token]) -> ParseProblem {
    none_percent(tokens)
        .or_else(|| whitespace_before_percent(tokens))
        .or_else(|| quoted_gamut(tokens))
        .or_else(|| double_quoted_json(tokens))
        .unwrap_or_else(|| ParseProblem::generic(call))
}

fn is_none(token: &Token) -> bool {
    matches!(&token.kind, TokenKind::Ident(ident) if ident.eq_ignore_ascii_case("none"))
}

fn none_percent(tokens: &[Token]) -> Option<ParseProblem> {
    tokens.windows(2).enumerate().find_map(|(i, pair)| {
        (is_none(&pair[0]) && pair[1].kind == TokenKind::Percent).then(|| {
            ParseProblem::new(
                format!("none% is not a valid {}", component_name(tokens, i)),
                pair[0].span.start..pair[1].span.end,
            )
        })
    })
}

/// Which argument the token at `index` belongs to.
fn component_name(tokens: &[Token], index: usize) -> &'static str {
    let mut slot = 0;
    let mut after_slash = false;
    let mut pending = false;
    let mut started = false;
    for token in &tokens[..=index] {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Comma => pending = started,
            TokenKind::Slash => after_slash = true,
            TokenKind::Percent => {}
            _ => {
                if pending && !after_slash {
                    slot += 1;
                }
                pending = false;
                started = true;
            }
        }
    }
    if after_slash {
        return "alpha";
    }
    ["lightness", "chroma", "hue"]
        .get(slot)
        .copied()
        .unwrap_or("value")
}

fn whitespace_before_percent(tokens: &[Token]) -> Option<ParseProblem> {
    tokens.windows(3).find_map(|triple| match triple {
        [
            Token {
                kind: TokenKind::Number(_),
                span: number,
            },
            Token {
                kind: TokenKind::Whitespace,
                ..
            },
            Token {
                kind: TokenKind::Percent,
                span: percent,
            },
        ] => Some(ParseProblem::new(
            "Whitespace is not allowed between a number and %",
            number.start..percent.end,
        )),
        _ => None,
    })
}

fn quoted_gamut(tokens: &[Token]) -> Option<ParseProblem> {
    tokens.iter().find_map(|token| match &token.kind {
        TokenKind::Str { value, .. } if Gamut::from_keyword(value.trim()).is_some() => Some(
            ParseProblem::new("Gamut keywords must not be quoted", token.span.clone()),
        ),
        _ => None,
    })
}

fn double_quoted_json(tokens: &[Token]) -> Option<ParseProblem> {
    let first = tokens.iter().position(|token| {
        matches!(&token.kind, TokenKind::Str { quote: '"', value, .. } if value.trim_start().starts_with('{'))
    })?;
    // the object's own double quotes split it into several strings
    let last = tokens
        .iter()
        .rposition(|token| matches!(token.kind, TokenKind::Str { quote: '"', .. }))
        .unwrap_or(first);
    Some(ParseProblem::new(
        "JSON options must be single-quoted",
        tokens[first].span.start..tokens[last].span.end,
    ))
}
