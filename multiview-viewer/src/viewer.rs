//! Viewer controller
//!
//! Composition root for the main-stream projection controller: wires
//! registry change events to the selection state machine and the playback
//! registry, mediates quality selection for the main view, and computes
//! the view state (main view + tile strip) the presentation layer renders.

use crate::config::ViewerConfig;
use crate::playback::{PlaybackControl, PlaybackControls};
use crate::quality::{MainQualitySettings, QualityMediator};
use crate::registry::{RegistryEvent, SourceRegistry};
use crate::selector::MainStreamSelector;
use crate::transport::MainStreamTransport;
use crate::types::{MediaHandle, SimulcastQuality, SourceId};
use crate::Result;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Computed state for the large, controllable main view.
#[derive(Debug, Clone)]
pub struct MainView {
    pub source_id: SourceId,
    pub media: MediaHandle,
    pub quality: MainQualitySettings,
    pub controls: Arc<PlaybackControl>,
}

/// Computed state for one selectable tile preview.
#[derive(Debug, Clone)]
pub struct TileView {
    pub source_id: SourceId,
    pub media: MediaHandle,
    pub muted: bool,
    pub controls: Arc<PlaybackControl>,
}

pub struct ViewerController {
    config: ViewerConfig,
    registry: Arc<SourceRegistry>,
    selector: MainStreamSelector,
    mediator: QualityMediator,
    playback: PlaybackControls,
}

impl ViewerController {
    #[must_use]
    pub fn new(
        config: ViewerConfig,
        registry: Arc<SourceRegistry>,
        transport: Arc<dyn MainStreamTransport>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            selector: MainStreamSelector::new(Arc::clone(&registry), Arc::clone(&transport)),
            mediator: QualityMediator::new(Arc::clone(&registry), transport),
            playback: PlaybackControls::new(),
            config,
            registry,
        });

        // Cover sources registered before the controller existed
        controller
            .playback
            .sync_sources(&controller.registry.source_ids());

        info!(
            max_sources = controller.config.max_sources,
            "Viewer controller initialized"
        );

        controller
    }

    /// Start the reaction loop that keeps the controller consistent with
    /// registry changes. Subscribes before spawning so no event emitted
    /// after this call is missed.
    pub fn spawn_reactions(self: Arc<Self>) -> JoinHandle<()> {
        let controller = self;
        let mut events = controller.registry.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(RegistryEvent::SizeChanged { size }) => {
                        debug!(size, "Registry size changed");
                        controller.handle_registry_change().await;
                    }
                    Ok(RegistryEvent::QualityChanged { .. }) => {
                        // Tier updates alone never re-trigger election
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Registry event channel closed, stopping reaction loop");
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(lagged_events = n, "Reaction loop lagged, resyncing");
                        controller.handle_registry_change().await;
                    }
                }
            }
        })
    }

    /// Registry-change reaction: reconcile playback handles, then run the
    /// auto-election check. Election failures are swallowed here; the
    /// main view degrades to "not live" until membership changes again.
    pub async fn handle_registry_change(&self) {
        self.playback.sync_sources(&self.registry.source_ids());
        if let Err(e) = self.selector.ensure_main().await {
            warn!(error = %e, "Auto-election failed, main view left unprojected");
        }
    }

    /// Move projection onto `source_id`, reporting failures to the caller.
    pub async fn switch_main_source(&self, source_id: SourceId) -> Result<()> {
        self.selector.switch_to(source_id).await
    }

    /// Tile-click entry point. A failed switch has no visible effect
    /// beyond the log; the selection stays where it was.
    pub async fn select_tile(&self, source_id: SourceId) {
        if let Err(e) = self.selector.switch_to(source_id).await {
            warn!(error = %e, "Tile selection did not take effect");
        }
    }

    /// Feed a tier-list announcement from the quality subsystem.
    ///
    /// Only a layer-topology change (different list length) triggers the
    /// "re-derive current value" signal for the main source.
    pub fn update_quality_options(&self, options: Vec<SimulcastQuality>) {
        let changed = self.mediator.replace_options(options);
        if !changed {
            return;
        }

        if let Some(main) = self.selector.selected_source() {
            self.mediator.refresh_current(&main);
        }
    }

    /// Apply a quality selection from the main view's control bar.
    /// Ignored when no main source is projected.
    pub fn select_quality(&self, quality: SimulcastQuality) {
        match self.selector.current_main() {
            Some(main) => self.mediator.select(&main, quality),
            None => debug!("Quality selection ignored, no main source"),
        }
    }

    /// Whether any source is live. Drives the "stream is not live"
    /// placeholder in the presentation layer.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        !self.registry.is_empty()
    }

    /// The current main source, resolved against the registry.
    #[must_use]
    pub fn current_main(&self) -> Option<SourceId> {
        self.selector.current_main()
    }

    /// Quality-selection surface for the main view's control bar; empty
    /// when no main source is projected.
    #[must_use]
    pub fn main_quality_settings(&self) -> MainQualitySettings {
        self.mediator.settings(self.selector.current_main().as_ref())
    }

    /// Computed main-view state, or `None` when the stream is not live
    /// or no source is projected.
    #[must_use]
    pub fn main_view(&self) -> Option<MainView> {
        let source_id = self.selector.current_main()?;
        let source = self.registry.get(&source_id)?;
        let controls = self.playback.control(&source_id)?;

        Some(MainView {
            quality: self.mediator.settings(Some(&source_id)),
            media: source.media,
            controls,
            source_id,
        })
    }

    /// Computed tile strip: every live source except the main one, in
    /// registry order. Never includes the main source; not truncated to
    /// the layout's tile capacity.
    #[must_use]
    pub fn tiles(&self) -> Vec<TileView> {
        self.selector
            .tile_sources()
            .into_iter()
            .filter_map(|source_id| {
                let source = self.registry.get(&source_id)?;
                let controls = self.playback.control(&source_id)?;
                Some(TileView {
                    media: source.media,
                    muted: self.config.mute_tiles,
                    controls,
                    source_id,
                })
            })
            .collect()
    }

    /// Tile source ids without the view wrapping.
    #[must_use]
    pub fn tile_source_ids(&self) -> Vec<SourceId> {
        self.selector.tile_sources()
    }

    /// Look up the playback control handle for any live source.
    #[must_use]
    pub fn playback_control(&self, source_id: &SourceId) -> Option<Arc<PlaybackControl>> {
        self.playback.control(source_id)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SourceRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
