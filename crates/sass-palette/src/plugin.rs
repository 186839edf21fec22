//! Plugin surface: the lifecycle-hook contract consumed by the host.
//!
//! The host calls `on_initialized` once after construction, `on_watched`
//! when its dev-server watch session starts, `client_config_file` while
//! assembling the client bundle and `extends_bundler_options` while
//! building the bundler configuration. Watcher teardown belongs to the
//! host: every watcher this plugin creates is registered into the
//! host-provided collection.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::alias;
use crate::error::{Error, Result};
use crate::generate::{Generate, SassGenerator, SourceTransform, generate_all};
use crate::options::{ProjectDirs, ResolvedOptions, SassPaletteOptions};
use crate::reconcile::{self, Update};
use crate::watch::{WatcherHandle, watch_path};

/// One sass-palette plugin instance.
///
/// Instances are cheap to construct and immutable; several may coexist as
/// long as their ids differ.
pub struct SassPalettePlugin {
    dirs: ProjectDirs,
    options: ResolvedOptions,
    generator: Arc<SassGenerator>,
}

impl SassPalettePlugin {
    pub const NAME: &'static str = "sass-palette";

    pub fn new(
        dirs: ProjectDirs,
        options: SassPaletteOptions,
        transform: Option<Arc<dyn SourceTransform>>,
    ) -> Self {
        debug!(?options, "Constructing sass-palette plugin");

        let resolved = options.resolve(&dirs);
        let generator = Arc::new(SassGenerator::new(dirs.clone(), resolved.clone(), transform));

        Self {
            dirs,
            options: resolved,
            generator,
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn id(&self) -> &str {
        &self.options.id
    }

    /// Multiple instances of this plugin may be registered with the host.
    pub fn multiple(&self) -> bool {
        true
    }

    /// Virtual-module aliases for the bundler, pointing at the artifact
    /// paths `on_initialized` populates.
    pub fn aliases(&self) -> BTreeMap<String, PathBuf> {
        alias::alias_map(&self.options, &self.dirs)
    }

    /// Generate the full artifact set. All four generation tasks run
    /// concurrently; this resolves only once every one of them settles.
    pub async fn on_initialized(&self) -> Result<()> {
        generate_all(self.generator.as_ref()).await?;
        debug!(id = %self.options.id, "Style files generated");
        Ok(())
    }

    /// Attach watchers to the user-editable sources and register them into
    /// the host's collection. The host owns teardown; dropping a handle
    /// stops both the watcher and its reconcile loop.
    pub fn on_watched(&self, watchers: &mut Vec<WatcherHandle>) -> Result<()> {
        watchers.push(self.spawn_watcher(self.options.user_config.clone(), Update::Config)?);
        watchers.push(self.spawn_watcher(self.options.user_palette.clone(), Update::Palette)?);

        if let Some(user_style) = &self.options.user_style {
            watchers.push(self.spawn_watcher(user_style.clone(), Update::Style)?);
        }

        info!(id = %self.options.id, "Watching style sources");
        Ok(())
    }

    /// Write the per-instance client config stub and return its path.
    pub async fn client_config_file(&self) -> Result<PathBuf> {
        let prefix = self.options.id_prefix();
        let path = self.dirs.artifact_dir().join(format!("{prefix}client.js"));

        let content = format!("import \"@sass-palette/{prefix}inject\";\n\nexport default {{}};\n");

        tokio::fs::create_dir_all(self.dirs.artifact_dir())
            .await
            .map_err(|source| Error::CreateArtifactDir {
                path: self.dirs.artifact_dir(),
                source,
            })?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| Error::WriteArtifact {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    /// Force the modern Sass compiler API in the bundler configuration.
    pub fn extends_bundler_options(&self, bundler_options: &mut Value) {
        alias::merge_bundler_options(bundler_options, &alias::modern_sass_api_fragment());
    }

    fn spawn_watcher(&self, source: PathBuf, update: Update) -> Result<WatcherHandle> {
        let (watcher, events) = watch_path(&source)?;
        let generator = self.generator.clone() as Arc<dyn Generate>;
        let task = tokio::spawn(reconcile::run(events, generator, update, None));
        Ok(WatcherHandle::new(watcher, task))
    }
}
