//! Declaration-level adapter for stylesheet tools.
//!
//! A stylesheet host hands over declarations one at a time. [`EgalPlugin`]
//! decides whether a declaration is scanned at all, rewrites its value and
//! reports diagnostics relative to the start of the declaration, the way
//! hosts attach warnings to a declaration node.

use std::sync::LazyLock;

use regex::Regex;

use super::properties::is_custom_property;
use super::rewrite::Rewriter;
use super::{Diagnostic, RewriteOptions, char_offset};

static DECLARATION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(--[A-Za-z0-9_-]+|-?[A-Za-z][A-Za-z0-9-]*)(\s*:\s*)").expect("invalid regex")
});

/// Rewrites `egal(...)` calls inside the declarations a host selects.
#[derive(Debug, Clone, Default)]
pub struct EgalPlugin {
    rewriter: Rewriter,
}

impl EgalPlugin {
    #[must_use]
    pub fn new(options: RewriteOptions) -> Self {
        Self::with_rewriter(Rewriter::new().with_options(options))
    }

    #[must_use]
    pub fn with_rewriter(rewriter: Rewriter) -> Self {
        Self { rewriter }
    }

    #[must_use]
    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    /// Returns true if declarations of `property` are scanned.
    #[must_use]
    pub fn wants(&self, property: &str) -> bool {
        let options = self.rewriter.options();
        options
            .properties
            .iter()
            .any(|p| p.eq_ignore_ascii_case(property))
            || (options.check_variables && is_custom_property(property))
    }

    /// Rewrite the value of one declaration.
    ///
    /// `between` is the raw text between the property and the value, such
    /// as `": "`. Returns `None` if the property is not scanned. Diagnostic
    /// offsets count from the first character of `property`.
    #[must_use]
    pub fn declaration(
        &self,
        property: &str,
        between: &str,
        value: &str,
    ) -> Option<(String, Vec<Diagnostic>)> {
        if !self.wants(property) {
            return None;
        }
        let (value, diagnostics) = self.rewriter.rewrite(value);
        let shift = property.chars().count() + between.chars().count();
        let diagnostics = diagnostics.into_iter().map(|d| d.shifted(shift)).collect();
        Some((value, diagnostics))
    }

    /// Rewrite the scanned declarations of a whole stylesheet.
    ///
    /// This is a lightweight scan for `property: value` pairs, not a CSS
    /// parser: it is meant for hosts that have no declaration tree of
    /// their own. Diagnostic offsets count from the start of `css`.
    #[must_use]
    pub fn stylesheet(&self, css: &str) -> (String, Vec<Diagnostic>) {
        let mut out = String::with_capacity(css.len());
        let mut diagnostics = Vec::new();
        let mut pos = 0;

        while let Some(caps) = DECLARATION_START.captures_at(css, pos) {
            let (Some(whole), Some(property), Some(between)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };
            let value_end = find_value_end(css, whole.end());
            let value = &css[whole.end()..value_end];

            out.push_str(&css[pos..whole.end()]);
            match self.declaration(property.as_str(), between.as_str(), value) {
                Some((rewritten, found)) => {
                    let start = char_offset(css, property.start());
                    out.push_str(&rewritten);
                    diagnostics.extend(found.into_iter().map(|d| d.shifted(start)));
                }
                None => out.push_str(value),
            }
            pos = value_end;
        }

        out.push_str(&css[pos..]);
        (out, diagnostics)
    }
}

/// End of a declaration value: the first `;`, `{` or `}` outside quotes and
/// parentheses.
fn find_value_end(css: &str, from: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in css[from..].char_indices() {
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
            ')' => depth = depth.saturating_sub(1),
            ';' | '{' | '}' if depth == 0 => return from + offset,
            _ => {}
        }
    }
    css.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::COULD_NOT_PARSE;

    #[test]
    fn test_wants() {
        let plugin = EgalPlugin::default();
        assert!(plugin.wants("color"));
        assert!(plugin.wants("Background-Color"));
        assert!(plugin.wants("--brand"));
        assert!(!plugin.wants("width"));

        let plugin = EgalPlugin::new(RewriteOptions {
            properties: vec!["width".to_string()],
            check_variables: false,
            ..RewriteOptions::default()
        });
        assert!(plugin.wants("width"));
        assert!(!plugin.wants("color"));
        assert!(!plugin.wants("--brand"));
    }

    #[test]
    fn test_declaration_shifts_diagnostics() {
        let plugin = EgalPlugin::default();
        let (value, diagnostics) = plugin
            .declaration("color", ": ", "egal(none% 0 0 / none%)")
            .unwrap();
        assert_eq!(value, "egal(none% 0 0 / none%)");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new("none% is not a valid lightness", 12, 17)]
        );
    }

    #[test]
    fn test_declaration_skips_other_properties() {
        assert!(
            EgalPlugin::default()
                .declaration("width", ": ", "egal(0 0 0)")
                .is_none()
        );
    }

    #[test]
    fn test_stylesheet() {
        let plugin = EgalPlugin::default();
        let css = ":root { --my-color: egal(50% 100% 0); }\na:hover { width: egal(0 0 0); color: egal(()); }";
        let (text, diagnostics) = plugin.stylesheet(css);
        assert_eq!(
            text,
            ":root { --my-color: oklch(50% 0.08501 0); }\na:hover { width: egal(0 0 0); color: egal(()); }"
        );
        let start = css.find("egal(())").unwrap();
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(COULD_NOT_PARSE, start, start + 8)]
        );
    }

    #[test]
    fn test_value_end_skips_quoted_json() {
        let css = r#"color: egal(1 1 1 '{"a": ";}"}'); x"#;
        let end = find_value_end(css, 7);
        assert_eq!(&css[end..], "; x");
    }
}
