//! Rewrite the `egal()` calls in a stylesheet.
//!
//! Reads CSS from the file named on the command line (or stdin), prints the
//! rewritten stylesheet to stdout and the diagnostics to stderr.
//!
//! ```text
//! cargo run --example rewrite -- styles.css
//! echo 'a { color: egal(50% 100% 0) }' | cargo run --example rewrite
//! ```

use std::io::Read;

use egal::css::{EgalPlugin, RewriteOptions};
use egal::logging::EgalLogger;
use log::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EgalLogger::new()
        .level(LevelFilter::Warn)
        .show_time(false)
        .init()?;

    let css = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut css = String::new();
            std::io::stdin().read_to_string(&mut css)?;
            css
        }
    };

    let options = match std::env::var("EGAL_OPTIONS") {
        Ok(json) => RewriteOptions::from_json(&json)?,
        Err(_) => RewriteOptions::default(),
    };

    let (text, diagnostics) = EgalPlugin::new(options).stylesheet(&css);
    print!("{text}");
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }

    Ok(())
}
