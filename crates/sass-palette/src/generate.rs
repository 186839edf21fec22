//! Sass artifact generation.
//!
//! Four artifacts are derived per plugin instance, all written into
//! `ProjectDirs::artifact_dir()` and overwritten in place on regeneration:
//!
//! - `<prefix>inject.scss` — static stub forwarding the palette module
//!   (plus the shared `helper.scss`, materialized from the embedded copy)
//! - `<prefix>config.scss` — palette sources + default config + user config
//! - `<prefix>palette.scss` — default palette + user palette
//! - `<prefix>style.scss` — pass-through of the user style, when configured
//!
//! Missing optional sources read as an empty sentinel rather than erroring;
//! only filesystem write failures and transform failures are fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::{ProjectDirs, ResolvedOptions};
use crate::resources;

/// Optional user-supplied transform applied to concatenated config and
/// palette sources before they are written. Expected to be a pure function
/// of its input content; may suspend.
#[async_trait]
pub trait SourceTransform: Send + Sync {
    async fn transform(&self, content: &str) -> Result<String>;
}

/// The four artifact generation operations.
///
/// Split from `SassGenerator` so the reconciler and the plugin surface can
/// be exercised against a recording double.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate_inject(&self) -> Result<()>;
    async fn generate_config(&self) -> Result<()>;
    async fn generate_palette(&self) -> Result<()>;
    async fn generate_style(&self) -> Result<()>;
}

/// Run all four generation operations concurrently and wait for every one
/// of them. Rejects with the first error once the join settles.
pub async fn generate_all(generator: &dyn Generate) -> Result<()> {
    tokio::try_join!(
        generator.generate_inject(),
        generator.generate_config(),
        generator.generate_palette(),
        generator.generate_style(),
    )?;
    Ok(())
}

/// Filesystem-backed artifact generator.
pub struct SassGenerator {
    dirs: ProjectDirs,
    options: ResolvedOptions,
    transform: Option<Arc<dyn SourceTransform>>,
}

impl SassGenerator {
    pub fn new(
        dirs: ProjectDirs,
        options: ResolvedOptions,
        transform: Option<Arc<dyn SourceTransform>>,
    ) -> Self {
        Self {
            dirs,
            options,
            transform,
        }
    }

    /// Artifact path for a given file name.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dirs.artifact_dir().join(name)
    }

    async fn write_artifact(&self, name: &str, content: &str) -> Result<()> {
        let dir = self.dirs.artifact_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::CreateArtifactDir {
                path: dir.clone(),
                source,
            })?;

        let path = dir.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| Error::WriteArtifact {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote artifact");
        Ok(())
    }

    async fn apply_transform(&self, content: String) -> Result<String> {
        match &self.transform {
            Some(transform) => transform.transform(&content).await,
            None => Ok(content),
        }
    }
}

#[async_trait]
impl Generate for SassGenerator {
    /// Write the shared helper module and the per-id inject stub. Neither
    /// depends on user sources, so this never reads the filesystem.
    async fn generate_inject(&self) -> Result<()> {
        let prefix = self.options.id_prefix();

        self.write_artifact("helper.scss", resources::helper())
            .await?;
        self.write_artifact(
            &format!("{prefix}inject.scss"),
            &format!("@forward \"@sass-palette/{prefix}palette\";\n"),
        )
        .await
    }

    /// Config reads palette-dependent values, so both palette sources are
    /// part of its input set. Palette edits therefore invalidate config too.
    async fn generate_config(&self) -> Result<()> {
        let default_config = match &self.options.default_config {
            Some(path) => read_source(path).await?,
            None => resources::default_config().to_string(),
        };

        let sections = [
            read_optional(self.options.default_palette.as_deref()).await?,
            read_source(&self.options.user_palette).await?,
            default_config,
            read_source(&self.options.user_config).await?,
        ];

        let content = self.apply_transform(concat_sections(&sections)).await?;
        self.write_artifact(&format!("{}config.scss", self.options.id_prefix()), &content)
            .await
    }

    async fn generate_palette(&self) -> Result<()> {
        let sections = [
            read_optional(self.options.default_palette.as_deref()).await?,
            read_source(&self.options.user_palette).await?,
        ];

        let content = self.apply_transform(concat_sections(&sections)).await?;
        self.write_artifact(
            &format!("{}palette.scss", self.options.id_prefix()),
            &content,
        )
        .await
    }

    /// Pass the user style through. No style configured means no artifact;
    /// the alias map omits the style key in that case as well.
    async fn generate_style(&self) -> Result<()> {
        let Some(user_style) = &self.options.user_style else {
            return Ok(());
        };

        let content = read_source(user_style).await?;
        self.write_artifact(&format!("{}style.scss", self.options.id_prefix()), &content)
            .await
    }
}

/// Read a source file, substituting the empty sentinel when it is missing.
async fn read_source(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(Error::ReadSource {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_source(path).await,
        None => Ok(String::new()),
    }
}

/// Join non-empty sections with a blank line, ending with a newline.
/// All-empty inputs produce the empty sentinel artifact.
fn concat_sections(sections: &[String]) -> String {
    let joined = sections
        .iter()
        .map(|s| s.trim_end())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if joined.is_empty() {
        joined
    } else {
        format!("{joined}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SassPaletteOptions;
    use tempfile::TempDir;

    fn generator(temp: &TempDir, options: SassPaletteOptions) -> SassGenerator {
        let dirs = ProjectDirs::new(temp.path().join("src"), temp.path().join("temp"));
        let resolved = options.resolve(&dirs);
        SassGenerator::new(dirs, resolved, None)
    }

    #[test]
    fn test_concat_sections_skips_empty() {
        let sections = [
            String::new(),
            "$a: 1;".to_string(),
            String::new(),
            "$b: 2;".to_string(),
        ];
        assert_eq!(concat_sections(&sections), "$a: 1;\n\n$b: 2;\n");
    }

    #[test]
    fn test_concat_sections_all_empty_is_sentinel() {
        assert_eq!(concat_sections(&[String::new(), String::new()]), "");
    }

    #[tokio::test]
    async fn test_missing_sources_produce_sentinel_artifact() {
        let temp = TempDir::new().unwrap();
        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_palette().await.unwrap();

        let palette = std::fs::read_to_string(generator.artifact_path("docs-palette.scss"));
        assert_eq!(palette.unwrap(), "");
    }

    #[tokio::test]
    async fn test_config_falls_back_to_bundled_default() {
        let temp = TempDir::new().unwrap();
        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_config().await.unwrap();

        let config = std::fs::read_to_string(generator.artifact_path("docs-config.scss")).unwrap();
        assert!(config.contains("!default"));
    }

    #[tokio::test]
    async fn test_config_includes_palette_sources() {
        let temp = TempDir::new().unwrap();
        let styles = temp.path().join("src/.vuepress/styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(styles.join("docs-palette.scss"), "$theme-color: red;\n").unwrap();
        std::fs::write(styles.join("docs-config.scss"), "$font-size: 16px;\n").unwrap();

        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_config().await.unwrap();

        let config = std::fs::read_to_string(generator.artifact_path("docs-config.scss")).unwrap();
        assert!(config.contains("$theme-color: red;"));
        assert!(config.contains("$font-size: 16px;"));
    }

    #[tokio::test]
    async fn test_style_is_noop_without_user_style() {
        let temp = TempDir::new().unwrap();
        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_style().await.unwrap();

        assert!(!generator.artifact_path("docs-style.scss").exists());
    }

    #[tokio::test]
    async fn test_inject_forwards_palette_module() {
        let temp = TempDir::new().unwrap();
        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_inject().await.unwrap();

        let inject = std::fs::read_to_string(generator.artifact_path("docs-inject.scss")).unwrap();
        assert_eq!(inject, "@forward \"@sass-palette/docs-palette\";\n");
        assert!(generator.artifact_path("helper.scss").exists());
    }

    #[tokio::test]
    async fn test_regeneration_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let styles = temp.path().join("src/.vuepress/styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(styles.join("docs-palette.scss"), "$a: 1;\n").unwrap();

        let generator = generator(
            &temp,
            SassPaletteOptions {
                id: "docs".to_string(),
                ..Default::default()
            },
        );

        generator.generate_palette().await.unwrap();
        let first = std::fs::read(generator.artifact_path("docs-palette.scss")).unwrap();

        generator.generate_palette().await.unwrap();
        let second = std::fs::read(generator.artifact_path("docs-palette.scss")).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_transform_is_applied() {
        struct Uppercase;

        #[async_trait]
        impl SourceTransform for Uppercase {
            async fn transform(&self, content: &str) -> Result<String> {
                Ok(content.to_uppercase())
            }
        }

        let temp = TempDir::new().unwrap();
        let styles = temp.path().join("src/.vuepress/styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(styles.join("palette.scss"), "$a: red;\n").unwrap();

        let dirs = ProjectDirs::new(temp.path().join("src"), temp.path().join("temp"));
        let resolved = SassPaletteOptions::default().resolve(&dirs);
        let generator = SassGenerator::new(dirs, resolved, Some(Arc::new(Uppercase)));

        generator.generate_palette().await.unwrap();

        let palette = std::fs::read_to_string(generator.artifact_path("palette.scss")).unwrap();
        assert_eq!(palette, "$A: RED;\n");
    }
}
