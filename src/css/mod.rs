//! The `egal()` CSS function.
//!
//! Stylesheets can write `egal(L C H)` wherever a color is expected. This
//! module finds those calls, parses their arguments and replaces each call
//! with the color computed by [`Egal`](crate::Egal):
//!
//! ```css
//! .button {
//!     color: egal(50% 100% 250);
//!     background: egal(95% 30% 250 / 80%, p3, '{"output": "oklab"}');
//! }
//! ```
//!
//! Malformed calls are never fatal. They stay in the text as written and
//! produce a [`Diagnostic`] with a message and character span, so one bad
//! call does not stop the rest of a stylesheet from being processed.
//!
//! - [`rewrite`] / [`Rewriter`]: rewrite any text.
//! - [`EgalPlugin`]: per-declaration entry point for stylesheet hosts.
//! - [`find_call_sites`]: locate calls without rewriting them.
//! - [`CallParser`]: plug in a different argument syntax.

mod lexer;
mod matcher;
mod parser;
mod plugin;
pub mod properties;
mod rewrite;

use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::options::{OptionsError, OptionsLayer};

pub use matcher::{CallSite, find_call_sites};
pub use parser::{
    COULD_NOT_PARSE, CallParser, DefaultCallParser, INVALID_JSON, ParseProblem, ParsedCall,
};
pub use plugin::EgalPlugin;
pub use properties::COLOR_PROPERTIES;
pub use rewrite::Rewriter;

/// A malformed `egal(...)` call.
///
/// `start..end` is a range of characters (not bytes) in the text that was
/// processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            start,
            end,
        }
    }

    /// Move the span `by` characters to the right.
    #[must_use]
    pub fn shifted(self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.start, self.end)
    }
}

/// Settings for rewriting text.
///
/// Deserializes from a camelCase JSON object; color options sit at the top
/// level next to the rewriting settings:
///
/// ```
/// use egal::css::RewriteOptions;
/// use egal::space::Gamut;
///
/// let options = RewriteOptions::from_json(r#"{"gamut": "p3", "checkVariables": false}"#).unwrap();
/// assert_eq!(options.base.gamut, Some(Gamut::P3));
/// assert!(!options.check_variables);
/// assert!(options.properties.iter().any(|p| p == "color"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewriteOptions {
    /// Options under every call; inline JSON and direct values win.
    #[serde(flatten)]
    pub base: OptionsLayer,
    /// Report malformed inline JSON instead of ignoring it with a warning.
    pub strict_json: bool,
    /// Declarations scanned by [`EgalPlugin`].
    pub properties: Vec<String>,
    /// Also scan custom properties (`--name`).
    pub check_variables: bool,
}

impl RewriteOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(OptionsError::Json)?;
        if !value.is_object() {
            return Err(OptionsError::NotAnObject);
        }
        serde_json::from_value(value).map_err(OptionsError::Json)
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            base: OptionsLayer::default(),
            strict_json: false,
            properties: COLOR_PROPERTIES.iter().map(ToString::to_string).collect(),
            check_variables: true,
        }
    }
}

static DEFAULT_REWRITER: LazyLock<Rewriter> = LazyLock::new(Rewriter::new);

/// Rewrite `text` with default options and the process-wide engine.
///
/// ```
/// let (text, diagnostics) = egal::css::rewrite("p{color: egal(none% 40% 10);}");
/// assert_eq!(text, "p{color: egal(none% 40% 10);}");
/// assert_eq!(diagnostics[0].message, "none% is not a valid lightness");
/// ```
#[must_use]
pub fn rewrite(text: &str) -> (String, Vec<Diagnostic>) {
    DEFAULT_REWRITER.rewrite(text)
}

/// Number of characters before byte offset `byte`.
pub(crate) fn char_offset(text: &str, byte: usize) -> usize {
    text.char_indices().take_while(|(i, _)| *i < byte).count()
}
