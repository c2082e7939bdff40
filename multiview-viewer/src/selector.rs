//! Main-stream selection state machine
//!
//! Owns the single piece of controller state: which source is projected
//! into the main viewport. Transitions follow a strict order:
//!
//! 1. un-project the old main source (fire-and-forget)
//! 2. await projection of the new source
//! 3. only on success, commit the selection and reset its quality to `Auto`
//!
//! The selection cell is never updated optimistically. Overlapping switch
//! requests are not serialized; whichever projection resolves last owns
//! the cell (last completion wins).

use crate::registry::SourceRegistry;
use crate::transport::MainStreamTransport;
use crate::types::{SimulcastQuality, SourceId};
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MainStreamSelector {
    registry: Arc<SourceRegistry>,
    transport: Arc<dyn MainStreamTransport>,
    selected: RwLock<Option<SourceId>>,
}

impl MainStreamSelector {
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, transport: Arc<dyn MainStreamTransport>) -> Self {
        Self {
            registry,
            transport,
            selected: RwLock::new(None),
        }
    }

    /// The selection cell as last committed.
    ///
    /// May briefly reference a source that already left the registry,
    /// until the next election pass replaces it.
    #[must_use]
    pub fn selected_source(&self) -> Option<SourceId> {
        self.selected.read().clone()
    }

    /// The current main source, resolved against the registry.
    ///
    /// `None` when nothing is selected, when the selection is stale, or
    /// when the registry is empty.
    #[must_use]
    pub fn current_main(&self) -> Option<SourceId> {
        let selected = self.selected.read().clone()?;
        self.registry.contains(&selected).then_some(selected)
    }

    /// Move projection from the current main source (if any) to `new_id`.
    ///
    /// On failure the selection is left unchanged; the old source has
    /// already been un-projected at that point, so the main view may be
    /// left blank until the next switch or election.
    pub async fn switch_to(&self, new_id: SourceId) -> Result<()> {
        let previous = self.selected.read().clone();
        if let Some(ref old) = previous {
            // Release the old main first; projecting the new source does
            // not wait for this to finish.
            self.transport.reproject_from_main(old);
        }

        debug!(
            source_id = %new_id,
            previous = previous.as_ref().map(SourceId::as_str),
            "Projecting source to main view"
        );

        if let Err(e) = self.transport.project_to_main(&new_id).await {
            warn!(source_id = %new_id, error = %e, "Projection failed, selection unchanged");
            return Err(e);
        }

        // Commit strictly after the projection resolved. A switch that
        // raced us and resolves later will overwrite this.
        *self.selected.write() = Some(new_id.clone());
        self.transport
            .set_source_quality(&new_id, Some(SimulcastQuality::auto()));

        info!(source_id = %new_id, "Main source switched");
        Ok(())
    }

    /// Registry-change reaction hook: elect a main source if none is
    /// selected or the selected one left the stream.
    ///
    /// The candidate is always the first source in registry insertion
    /// order. A no-op when the registry is empty or the selection is
    /// still valid.
    pub async fn ensure_main(&self) -> Result<()> {
        let candidate = {
            if self.registry.is_empty() {
                return Ok(());
            }
            let selected = self.selected.read().clone();
            if selected.is_some_and(|id| self.registry.contains(&id)) {
                return Ok(());
            }
            self.registry.first_source_id()
        };

        let Some(candidate) = candidate else {
            return Ok(());
        };

        debug!(source_id = %candidate, "Electing main source");
        self.switch_to(candidate).await
    }

    /// Sources to render as tiles: every registered source except the
    /// current main, in registry order. Not truncated here; the layout's
    /// tile capacity is a presentation concern.
    #[must_use]
    pub fn tile_sources(&self) -> Vec<SourceId> {
        let selected = self.selected.read().clone();
        self.registry
            .source_ids()
            .into_iter()
            .filter(|id| Some(id) != selected.as_ref())
            .collect()
    }
}
