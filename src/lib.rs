//! # egal
//!
//! Colors that look equally colorful, whatever their hue.
//!
//! A chroma of `1.0` means "the most colorful value that every hue can show
//! at this lightness in the target gamut". Two colors with the same
//! lightness and chroma therefore look equally vivid, even when one is a
//! yellow (which can get very colorful) and the other a blue (which can't
//! at the same lightness).
//!
//! ## Quick Start
//!
//! ```rust
//! use egal::prelude::*;
//!
//! // lightness 50%, full chroma, hue 0
//! assert_eq!(egal(0.5, 1.0, 0.0, &OptionsLayer::new()), "oklch(50% 0.08501 0)");
//!
//! // the same thing written in a stylesheet
//! let (css, diagnostics) = egal::css::rewrite(".a { color: egal(50% 100% 0); }");
//! assert_eq!(css, ".a { color: oklch(50% 0.08501 0); }");
//! assert!(diagnostics.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Chroma floor**: the smallest of the maximum in-gamut chromas of a set
//!   of hues at one lightness ([`search`])
//! - **Engine**: [`Egal`] computes colors and caches floors ([`cache`])
//! - **Options**: layered, partially specified settings ([`options`])
//! - **CSS**: the `egal()` function for stylesheets ([`css`])
//!
//! Invalid input never fails. It is replaced by a usable value and reported
//! through the `log` crate; see [`logging`] for a ready-made logger.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod color;
pub mod css;
pub mod egal;
pub mod logging;
pub mod options;
pub mod sanitize;
pub mod search;
pub mod space;
pub mod sync;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::cache::{CacheKey, FloorCache};
    pub use crate::color::{Color, Model};
    pub use crate::css::{Diagnostic, EgalPlugin, RewriteOptions, Rewriter};
    pub use crate::egal::{Egal, egal};
    pub use crate::options::{EgalOptions, OptionsLayer};
    pub use crate::search::HueSpec;
    pub use crate::space::{ColorSpace, Gamut, OutputFormat};
}

// Re-export key types at crate root
pub use egal::{Egal, default_engine, egal};
pub use options::{EgalOptions, OptionsError, OptionsLayer};
pub use search::HueSpec;
pub use space::{ColorSpace, Gamut, OutputFormat};
