//! Virtual-module aliases and bundler configuration fragments.
//!
//! The alias map is the bundler-facing view of the artifact set: every key
//! points at a path the generator writes under the artifact directory. The
//! bundler option format itself is opaque to this crate and handled as
//! `serde_json::Value`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Value, json};

use crate::options::{ProjectDirs, ResolvedOptions};

/// Namespace for all virtual-module alias keys.
pub const ALIAS_PREFIX: &str = "@sass-palette/";

/// Build the alias map for one plugin instance.
///
/// Always contains `helper`, `<prefix>config`, `<prefix>inject` and
/// `<prefix>palette`; `<prefix>style` appears only when a user style is
/// configured. Keys for distinct ids never collide because the prefix is
/// derived from the id.
pub fn alias_map(options: &ResolvedOptions, dirs: &ProjectDirs) -> BTreeMap<String, PathBuf> {
    let artifact_dir = dirs.artifact_dir();
    let prefix = options.id_prefix();

    let mut aliases = BTreeMap::new();
    aliases.insert(
        format!("{ALIAS_PREFIX}helper"),
        artifact_dir.join("helper.scss"),
    );
    aliases.insert(
        format!("{ALIAS_PREFIX}{prefix}config"),
        artifact_dir.join(format!("{prefix}config.scss")),
    );
    aliases.insert(
        format!("{ALIAS_PREFIX}{prefix}inject"),
        artifact_dir.join(format!("{prefix}inject.scss")),
    );
    aliases.insert(
        format!("{ALIAS_PREFIX}{prefix}palette"),
        artifact_dir.join(format!("{prefix}palette.scss")),
    );

    if options.user_style.is_some() {
        aliases.insert(
            format!("{ALIAS_PREFIX}{prefix}style"),
            artifact_dir.join(format!("{prefix}style.scss")),
        );
    }

    aliases
}

/// Static bundler fragment forcing the modern Sass compiler API.
pub fn modern_sass_api_fragment() -> Value {
    json!({
        "css": {
            "preprocessorOptions": {
                "sass": { "api": "modern" },
                "scss": { "api": "modern" },
            }
        }
    })
}

/// Deep-merge `fragment` into `target`. Objects merge recursively; any
/// other value in the fragment replaces what the target had.
pub fn merge_bundler_options(target: &mut Value, fragment: &Value) {
    match (target, fragment) {
        (Value::Object(target_map), Value::Object(fragment_map)) => {
            for (key, value) in fragment_map {
                merge_bundler_options(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
        (target, fragment) => {
            *target = fragment.clone();
        }
    }
}
