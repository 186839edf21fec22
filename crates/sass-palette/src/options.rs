//! Plugin options and path resolution.
//!
//! `SassPaletteOptions` is the raw, possibly sparse user configuration.
//! `resolve` turns it into `ResolvedOptions`: concrete absolute paths
//! against the project's source directory, with defaults filled in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory under the temp dir that holds all generated artifacts.
pub const ARTIFACT_DIR_NAME: &str = "sass-palette";

/// Default location of user style sources, relative to the source dir.
const USER_STYLES_DIR: &str = ".vuepress/styles";

/// Source and temp directories of the host project.
///
/// Injected into the plugin instead of a host-app handle so the generator
/// and reconciler can be driven without a host in tests.
#[derive(Debug, Clone)]
pub struct ProjectDirs {
    source_dir: PathBuf,
    temp_dir: PathBuf,
}

impl ProjectDirs {
    pub fn new(source_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Resolve a path relative to the project source directory.
    pub fn source(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source_dir.join(relative)
    }

    /// Resolve a path relative to the temp directory.
    pub fn temp(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.join(relative)
    }

    /// Directory holding every generated artifact.
    pub fn artifact_dir(&self) -> PathBuf {
        self.temp(ARTIFACT_DIR_NAME)
    }
}

/// Raw plugin options.
///
/// All paths are interpreted relative to the project source directory
/// unless absolute. Several instances may coexist; `id` namespaces the
/// generated artifacts and alias keys of each instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SassPaletteOptions {
    /// Instance id. Empty is allowed and produces unprefixed names.
    pub id: String,

    /// User config file. Defaults to `.vuepress/styles/<prefix>config.scss`.
    pub config: Option<PathBuf>,

    /// Default config file. Falls back to the bundled config when unset.
    pub default_config: Option<PathBuf>,

    /// User palette file. Defaults to `.vuepress/styles/<prefix>palette.scss`.
    pub palette: Option<PathBuf>,

    /// Default palette file. No bundled fallback; absent means empty.
    pub default_palette: Option<PathBuf>,

    /// User style file. Only when set is a style artifact generated.
    pub style: Option<PathBuf>,
}

/// Options after path resolution. Immutable for the plugin's lifetime.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub id: String,
    /// Absolute path of the user config source.
    pub user_config: PathBuf,
    /// Absolute path of the default config, `None` for the bundled fallback.
    pub default_config: Option<PathBuf>,
    /// Absolute path of the user palette source.
    pub user_palette: PathBuf,
    pub default_palette: Option<PathBuf>,
    pub user_style: Option<PathBuf>,
}

impl ResolvedOptions {
    pub fn id_prefix(&self) -> String {
        id_prefix(&self.id)
    }
}

/// Namespacing prefix for artifact names and alias keys.
///
/// Empty id yields no prefix; any other id yields `"<id>-"`, so names for
/// distinct ids can never collide.
pub fn id_prefix(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!("{id}-")
    }
}

impl SassPaletteOptions {
    /// Resolve sparse options into absolute paths. Never fails; absent
    /// optional fields stay absent.
    pub fn resolve(&self, dirs: &ProjectDirs) -> ResolvedOptions {
        let prefix = id_prefix(&self.id);

        let user_config = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{USER_STYLES_DIR}/{prefix}config.scss")));
        let user_palette = self
            .palette
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{USER_STYLES_DIR}/{prefix}palette.scss")));

        ResolvedOptions {
            id: self.id.clone(),
            user_config: dirs.source(user_config),
            default_config: self.default_config.as_ref().map(|p| dirs.source(p)),
            user_palette: dirs.source(user_palette),
            default_palette: self.default_palette.as_ref().map(|p| dirs.source(p)),
            user_style: self.style.as_ref().map(|p| dirs.source(p)),
        }
    }
}
