//! Bundled stylesheets embedded at compile time.
//!
//! The helper module and the fallback config ship with the crate; they are
//! embedded via `include_dir` and materialized into the artifact directory
//! at generation time so the bundler can resolve them by path.

use include_dir::{Dir, include_dir};

static STYLES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/styles");

/// Shared helper module content, aliased as `@sass-palette/helper`.
pub fn helper() -> &'static str {
    read("helper.scss")
}

/// Bundled fallback config, used when options carry no `default_config`.
pub fn default_config() -> &'static str {
    read("default/config.scss")
}

fn read(path: &str) -> &'static str {
    STYLES_DIR
        .get_file(path)
        .and_then(|f| f.contents_utf8())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_styles_are_embedded() {
        assert!(helper().contains("@function"));
        assert!(default_config().contains("!default"));
    }
}
