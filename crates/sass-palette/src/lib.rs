//! sass-palette: Sass palette artifact generation for static-site plugins
//!
//! This crate provides:
//! - Option resolution for per-instance palette/config/style sources
//! - Generation of the derived stylesheet artifacts (inject, config,
//!   palette, style) with a fan-out/fan-in initialization join
//! - Watch reconciliation that regenerates the affected artifact subset on
//!   source add/remove transitions
//! - Virtual-module aliases and bundler configuration fragments

pub mod alias;
pub mod error;
pub mod generate;
pub mod options;
pub mod reconcile;
pub mod resources;
pub mod watch;

mod plugin;

pub use error::{Error, Result};
pub use generate::{Generate, SassGenerator, SourceTransform, generate_all};
pub use options::{ProjectDirs, ResolvedOptions, SassPaletteOptions, id_prefix};
pub use plugin::SassPalettePlugin;
pub use reconcile::Update;
pub use watch::{ChangeEvent, ChangeKind, WatcherHandle};
