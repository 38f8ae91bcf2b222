//! Replacing `egal(...)` calls in text with CSS colors.

use std::fmt;
use std::sync::Arc;

use crate::egal::{Egal, default_engine};

use super::matcher::find_call_sites;
use super::parser::{CallParser, DefaultCallParser, ParseProblem};
use super::{Diagnostic, RewriteOptions, char_offset};

/// Rewrites every well-formed `egal(...)` call in a text.
///
/// Calls are handled left to right. A call that parses is replaced by the
/// rendered color, including any `egal(` nested inside it. A call that does
/// not parse is left untouched and yields one [`Diagnostic`]; calls nested
/// inside it are still rewritten.
///
/// ```
/// use egal::css::Rewriter;
///
/// let (text, diagnostics) = Rewriter::new().rewrite("p{color: egal(0 0 0)}");
/// assert_eq!(text, "p{color: oklch(0% 0 none)}");
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Clone)]
pub struct Rewriter {
    engine: Egal,
    options: RewriteOptions,
    parser: Arc<dyn CallParser>,
}

impl Rewriter {
    /// A rewriter with default options, the default parser and the
    /// process-wide engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: default_engine().clone(),
            options: RewriteOptions::default(),
            parser: Arc::new(DefaultCallParser),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute colors with `engine` and its cache.
    #[must_use]
    pub fn with_engine(mut self, engine: Egal) -> Self {
        self.engine = engine;
        self
    }

    /// Parse call arguments with `parser` instead of [`DefaultCallParser`].
    #[must_use]
    pub fn with_parser(mut self, parser: impl CallParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    #[must_use]
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    #[must_use]
    pub fn engine(&self) -> &Egal {
        &self.engine
    }

    /// Rewrite `text`, returning the new text and one diagnostic per call
    /// that could not be parsed. Diagnostic offsets are character offsets
    /// into `text`.
    #[must_use]
    pub fn rewrite(&self, text: &str) -> (String, Vec<Diagnostic>) {
        let mut out = String::with_capacity(text.len());
        let mut diagnostics = Vec::new();
        let mut copied = 0;

        for site in find_call_sites(text) {
            // already replaced as part of an enclosing call
            if site.span.start < copied {
                continue;
            }
            let call = site.text(text);
            match self.parser.parse(call, &self.options) {
                Ok(parsed) => {
                    let options = parsed.layer(&self.options.base);
                    let color =
                        self.engine
                            .color(parsed.lightness, parsed.chroma, parsed.hue, &options);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(call, color = color.as_str(), "rewrote egal call");
                    out.push_str(&text[copied..site.span.start]);
                    out.push_str(&color);
                    copied = site.span.end;
                }
                Err(problem) => {
                    diagnostics.push(locate(text, site.span.start, site.span.end, &problem));
                }
            }
        }

        out.push_str(&text[copied..]);
        (out, diagnostics)
    }
}

/// Turn a problem local to the call at `start..end` into a diagnostic
/// against the whole text.
fn locate(text: &str, start: usize, end: usize, problem: &ParseProblem) -> Diagnostic {
    let from = (start + problem.span.start).min(end);
    let to = (start + problem.span.end).clamp(from, end);
    Diagnostic::new(
        problem.message.clone(),
        char_offset(text, from),
        char_offset(text, to),
    )
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Rewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewriter")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::{COULD_NOT_PARSE, ParsedCall};
    use crate::options::OptionsLayer;
    use crate::space::Gamut;

    fn rewrite(text: &str) -> (String, Vec<Diagnostic>) {
        Rewriter::new().with_engine(Egal::new()).rewrite(text)
    }

    #[test]
    fn test_reference_colors() {
        assert_eq!(rewrite("egal(50% 100% 0)").0, "oklch(50% 0.08501 0)");
        assert_eq!(rewrite("egal(50% 100% 100)").0, "oklch(50% 0.08501 100)");
    }

    #[test]
    fn test_black() {
        let (text, diagnostics) = rewrite("p{color: egal(0 0 0)}");
        assert_eq!(text, "p{color: oklch(0% 0 none)}");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_none_percent_leaves_text_unchanged() {
        let input = "p{color: egal(none% 40% 10);}";
        let (text, diagnostics) = rewrite(input);
        assert_eq!(text, input);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new("none% is not a valid lightness", 14, 19)]
        );
    }

    #[test]
    fn test_generic_diagnostic_covers_call() {
        let input = ".my-class { color: egal(aaaaa(aaa)aa); }";
        let (text, diagnostics) = rewrite(input);
        assert_eq!(text, input);
        assert_eq!(diagnostics, vec![Diagnostic::new(COULD_NOT_PARSE, 19, 37)]);
    }

    #[test]
    fn test_offsets_are_characters() {
        let (_, diagnostics) = rewrite("/* ü */ egal(())");
        assert_eq!(diagnostics[0].start, 8);
        assert_eq!(diagnostics[0].end, 16);
    }

    #[test_log::test]
    fn test_multiple_calls_and_bad_call_between() {
        let (text, diagnostics) =
            rewrite("linear-gradient(egal(50% 100% 0), egal(()), egal(50% 100% 100))");
        assert_eq!(
            text,
            "linear-gradient(oklch(50% 0.08501 0), egal(()), oklch(50% 0.08501 100))"
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test_log::test]
    fn test_call_nested_in_bad_call_is_rewritten() {
        let (text, diagnostics) = rewrite("egal(egal(0 0 0))");
        assert_eq!(text, "egal(oklch(0% 0 none))");
        assert_eq!(diagnostics, vec![Diagnostic::new(COULD_NOT_PARSE, 0, 17)]);
    }

    #[test]
    fn test_base_options_apply() {
        let options = RewriteOptions {
            base: OptionsLayer::new().opacity(0.5),
            ..RewriteOptions::default()
        };
        let rewriter = Rewriter::new().with_options(options);
        assert_eq!(
            rewriter.rewrite("egal(50% 100% 0)").0,
            "oklch(50% 0.08501 0 / 0.5)"
        );
        assert_eq!(
            rewriter.rewrite("egal(50% 100% 0 / 1)").0,
            "oklch(50% 0.08501 0)"
        );
    }

    #[test]
    fn test_custom_parser() {
        let rewriter = Rewriter::new().with_parser(|call: &str, _: &RewriteOptions| {
            if call.contains("42") {
                Ok(ParsedCall {
                    gamut: Some(Gamut::Srgb),
                    ..ParsedCall::new(0.42, 1.0, 0.0)
                })
            } else {
                Err(ParseProblem::generic(call))
            }
        });
        let expected = Egal::new().color(0.42, 1.0, 0.0, &OptionsLayer::new());
        assert_eq!(rewriter.rewrite("egal(42)").0, expected);
        assert_eq!(rewriter.rewrite("egal(.5 .3 10)").1.len(), 1);
    }
}
