//! Quality mediation for the main source
//!
//! Derives the quality-selection surface (available tiers, current tier,
//! apply path) for whichever source is currently main. The derived value
//! is a pure projection of `(main source, tier list, registry)` and is
//! never stored as authoritative state.
//!
//! Invalidation is deliberately coarse: a replacement tier list counts as
//! changed only when its *length* differs, tracking layer-topology changes
//! rather than identity changes of individual tiers. Quality updates on
//! non-main sources never affect the derived settings.

use crate::registry::SourceRegistry;
use crate::transport::MainStreamTransport;
use crate::types::{SimulcastQuality, SourceId, StreamQuality};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Quality-selection surface for the main view's control bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainQualitySettings {
    /// Selectable tiers, as last announced by the quality subsystem.
    pub options: Vec<SimulcastQuality>,

    /// The main source's current tier; `None` when the source is absent.
    pub current: Option<StreamQuality>,
}

impl MainQualitySettings {
    /// True when there is nothing to select (no main source).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.current.is_none()
    }
}

pub struct QualityMediator {
    registry: Arc<SourceRegistry>,
    transport: Arc<dyn MainStreamTransport>,
    options: RwLock<Vec<SimulcastQuality>>,
}

impl QualityMediator {
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, transport: Arc<dyn MainStreamTransport>) -> Self {
        Self {
            registry,
            transport,
            options: RwLock::new(Vec::new()),
        }
    }

    /// Replace the announced tier list.
    ///
    /// Returns whether the layer topology changed, meaning the list
    /// length differs from the previous one. Same-length replacements are
    /// stored but reported unchanged.
    pub fn replace_options(&self, options: Vec<SimulcastQuality>) -> bool {
        let mut current = self.options.write();
        let changed = current.len() != options.len();
        if changed {
            debug!(
                previous = current.len(),
                announced = options.len(),
                "Quality layer topology changed"
            );
        }
        *current = options;
        changed
    }

    /// Derive the settings for the given main source.
    ///
    /// With no main source this is the empty configuration: no tiers, no
    /// current value, nothing to apply to.
    #[must_use]
    pub fn settings(&self, main: Option<&SourceId>) -> MainQualitySettings {
        let Some(main) = main else {
            return MainQualitySettings::default();
        };

        MainQualitySettings {
            options: self.options.read().clone(),
            current: self.registry.quality_of(main),
        }
    }

    /// Apply a tier selection for the main source, forwarding to the
    /// external quality subsystem.
    pub fn select(&self, main: &SourceId, quality: SimulcastQuality) {
        debug!(source_id = %main, quality = %quality.stream_quality, "Applying quality selection");
        self.transport.set_source_quality(main, Some(quality));
    }

    /// Ask the quality subsystem to re-derive the main source's current
    /// value after a topology change. Not a state change.
    pub fn refresh_current(&self, main: &SourceId) {
        self.transport.set_source_quality(main, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RemoteTrackSource;
    use crate::types::MediaHandle;
    use crate::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct QualityProbe {
        requests: Mutex<Vec<(SourceId, Option<SimulcastQuality>)>>,
    }

    #[async_trait]
    impl MainStreamTransport for QualityProbe {
        async fn project_to_main(&self, _source_id: &SourceId) -> Result<()> {
            Ok(())
        }

        fn reproject_from_main(&self, _source_id: &SourceId) {}

        fn set_source_quality(&self, source_id: &SourceId, quality: Option<SimulcastQuality>) {
            self.requests.lock().push((source_id.clone(), quality));
        }
    }

    fn tier_list(qualities: &[StreamQuality]) -> Vec<SimulcastQuality> {
        qualities.iter().copied().map(SimulcastQuality::tier).collect()
    }

    fn setup() -> (Arc<SourceRegistry>, Arc<QualityProbe>, QualityMediator) {
        let registry = Arc::new(SourceRegistry::new());
        let probe = Arc::new(QualityProbe::default());
        let mediator = QualityMediator::new(Arc::clone(&registry), probe.clone());
        (registry, probe, mediator)
    }

    #[test]
    fn test_empty_settings_without_main() {
        let (_registry, _probe, mediator) = setup();
        mediator.replace_options(tier_list(&[StreamQuality::High, StreamQuality::Low]));

        let settings = mediator.settings(None);
        assert!(settings.is_empty());
    }

    #[test]
    fn test_settings_for_main_source() {
        let (registry, _probe, mediator) = setup();
        let main = SourceId::from("s1");
        registry.insert(
            main.clone(),
            RemoteTrackSource::new(MediaHandle::from("m1"), StreamQuality::Medium),
        );
        mediator.replace_options(tier_list(&[StreamQuality::High, StreamQuality::Medium]));

        let settings = mediator.settings(Some(&main));
        assert_eq!(settings.options.len(), 2);
        assert_eq!(settings.current, Some(StreamQuality::Medium));
    }

    #[test]
    fn test_absent_main_source_has_unset_current() {
        let (_registry, _probe, mediator) = setup();
        let settings = mediator.settings(Some(&SourceId::from("gone")));
        assert_eq!(settings.current, None);
    }

    #[test]
    fn test_length_is_the_change_trigger() {
        let (_registry, _probe, mediator) = setup();

        assert!(mediator.replace_options(tier_list(&[StreamQuality::High])));
        // Same length, different tier: stored, but not a topology change
        assert!(!mediator.replace_options(tier_list(&[StreamQuality::Low])));
        assert!(mediator.replace_options(tier_list(&[
            StreamQuality::High,
            StreamQuality::Low
        ])));

        let settings = mediator.settings(Some(&SourceId::from("any")));
        assert_eq!(settings.options.len(), 2);
    }

    #[test]
    fn test_non_main_quality_change_does_not_affect_settings() {
        let (registry, _probe, mediator) = setup();
        let main = SourceId::from("s1");
        let other = SourceId::from("s2");
        registry.insert(
            main.clone(),
            RemoteTrackSource::new(MediaHandle::from("m1"), StreamQuality::Auto),
        );
        registry.insert(
            other.clone(),
            RemoteTrackSource::new(MediaHandle::from("m2"), StreamQuality::Auto),
        );

        let before = mediator.settings(Some(&main));
        registry.set_quality(&other, StreamQuality::Low).unwrap();
        let after = mediator.settings(Some(&main));

        assert_eq!(before, after);
    }

    #[test]
    fn test_select_forwards_to_quality_subsystem() {
        let (_registry, probe, mediator) = setup();
        let main = SourceId::from("s1");

        mediator.select(&main, SimulcastQuality::tier(StreamQuality::High));
        mediator.refresh_current(&main);

        let requests = probe.requests.lock().clone();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0],
            (
                main.clone(),
                Some(SimulcastQuality::tier(StreamQuality::High))
            )
        );
        assert_eq!(requests[1], (main, None));
    }

    #[test]
    fn test_options_parse_from_announcement() {
        // Tier announcements arrive as JSON from the quality subsystem
        let announced: Vec<SimulcastQuality> = serde_json::from_str(
            r#"[
                {"stream_quality": "auto"},
                {"stream_quality": "high", "layer": {"encoding_id": "h", "spatial_layer_id": 2, "temporal_layer_id": null, "bitrate_kbps": 2500}},
                {"stream_quality": "low", "layer": {"encoding_id": "l", "spatial_layer_id": 0, "temporal_layer_id": null, "bitrate_kbps": 500}}
            ]"#,
        )
        .unwrap();

        assert_eq!(announced.len(), 3);
        assert!(announced[0].stream_quality.is_auto());
        assert_eq!(announced[1].layer.as_ref().unwrap().bitrate_kbps, 2500);
    }
}
