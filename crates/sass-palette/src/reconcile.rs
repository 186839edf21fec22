//! Watch reconciliation: change events in, regenerated artifacts out.
//!
//! Each watched source file gets its own loop. The subset of artifacts a
//! transition invalidates depends on the source:
//!
//! - config source: the config artifact only
//! - palette source: config AND palette, joined — config generation reads
//!   palette-dependent values, so the two must stay consistent
//! - style source: the style artifact only
//!
//! Loops across distinct sources run independently; rapid transitions on
//! different sources can interleave writes to the same artifact. That race
//! is inherited from the single-writer semantics of the host and left
//! unsynchronized on purpose.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::generate::Generate;
use crate::watch::ChangeEvent;

/// Which artifact subset a source transition invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Regenerate the config artifact.
    Config,
    /// Regenerate config and palette together.
    Palette,
    /// Regenerate the style artifact.
    Style,
}

/// Consume change events until the channel closes, regenerating the
/// artifact subset for each one. Every completed regeneration is signalled
/// on `done_tx` when provided, so callers can await completion instead of
/// inferring it from side effects.
pub async fn run(
    mut events: mpsc::UnboundedReceiver<ChangeEvent>,
    generator: Arc<dyn Generate>,
    update: Update,
    done_tx: Option<mpsc::UnboundedSender<()>>,
) {
    while let Some(event) = events.recv().await {
        debug!(path = %event.path.display(), kind = ?event.kind, ?update, "Reconciling source change");

        match regenerate(generator.as_ref(), update).await {
            Ok(()) => {
                debug!(?update, "Artifacts updated");
                if let Some(tx) = &done_tx {
                    let _ = tx.send(());
                }
            }
            Err(e) => {
                warn!(error = %e, ?update, "Artifact regeneration failed");
            }
        }
    }
}

async fn regenerate(generator: &dyn Generate, update: Update) -> Result<()> {
    match update {
        Update::Config => generator.generate_config().await,
        Update::Palette => {
            tokio::try_join!(generator.generate_config(), generator.generate_palette())?;
            Ok(())
        }
        Update::Style => generator.generate_style().await,
    }
}
