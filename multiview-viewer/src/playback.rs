//! Per-source playback controls
//!
//! One control handle per registered source, keyed by source id. Handles
//! are looked up, not computed; they are created when a source joins and
//! dropped when it leaves, and they survive main-source switches so that
//! per-source playback state stays consistent across switches.

use crate::types::SourceId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Playback state of one source's view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub muted: bool,
    pub volume: f64,
    pub updated_at: DateTime<Utc>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            // Live feeds start playing on arrival
            playing: true,
            muted: false,
            volume: 1.0,
            updated_at: Utc::now(),
        }
    }
}

/// Control handle for one source.
#[derive(Debug)]
pub struct PlaybackControl {
    source_id: SourceId,
    state: RwLock<PlaybackState>,
}

impl PlaybackControl {
    #[must_use]
    pub fn new(source_id: SourceId) -> Self {
        Self {
            source_id,
            state: RwLock::new(PlaybackState::default()),
        }
    }

    #[must_use]
    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.read().playing
    }

    pub fn set_playing(&self, playing: bool) {
        let mut state = self.state.write();
        state.playing = playing;
        state.updated_at = Utc::now();
    }

    /// Toggle play/pause, returning the new playing state.
    pub fn toggle_playing(&self) -> bool {
        let mut state = self.state.write();
        state.playing = !state.playing;
        state.updated_at = Utc::now();
        state.playing
    }

    pub fn set_muted(&self, muted: bool) {
        let mut state = self.state.write();
        state.muted = muted;
        state.updated_at = Utc::now();
    }

    /// Set the volume. Valid range is `0.0..=1.0`.
    pub fn set_volume(&self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(Error::InvalidInput(
                "Volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        let mut state = self.state.write();
        state.volume = volume;
        state.updated_at = Utc::now();
        Ok(())
    }
}

/// Registry of playback control handles, keyed by source id.
#[derive(Debug, Default)]
pub struct PlaybackControls {
    controls: DashMap<SourceId, Arc<PlaybackControl>>,
}

impl PlaybackControls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the control handle for a source.
    #[must_use]
    pub fn control(&self, source_id: &SourceId) -> Option<Arc<PlaybackControl>> {
        self.controls.get(source_id).map(|c| Arc::clone(c.value()))
    }

    /// Reconcile handles with the current registry membership: create
    /// handles for newly joined sources, drop handles of departed ones.
    /// Existing handles (and their state) are left untouched.
    pub fn sync_sources(&self, source_ids: &[SourceId]) {
        self.controls.retain(|id, _| source_ids.contains(id));

        for id in source_ids {
            if !self.controls.contains_key(id) {
                debug!(source_id = %id, "Creating playback control");
                self.controls
                    .insert(id.clone(), Arc::new(PlaybackControl::new(id.clone())));
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let control = PlaybackControl::new(SourceId::from("s1"));
        let state = control.state();
        assert!(state.playing);
        assert!(!state.muted);
        assert!((state.volume - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_and_mute() {
        let control = PlaybackControl::new(SourceId::from("s1"));

        assert!(!control.toggle_playing());
        assert!(!control.is_playing());
        assert!(control.toggle_playing());

        control.set_muted(true);
        assert!(control.state().muted);
    }

    #[test]
    fn test_volume_validation() {
        let control = PlaybackControl::new(SourceId::from("s1"));

        control.set_volume(0.5).unwrap();
        assert!((control.state().volume - 0.5).abs() < f64::EPSILON);

        assert!(control.set_volume(1.5).is_err());
        assert!(control.set_volume(-0.1).is_err());
        // Failed updates leave the state untouched
        assert!((control.state().volume - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sync_sources_membership() {
        let controls = PlaybackControls::new();
        let s1 = SourceId::from("s1");
        let s2 = SourceId::from("s2");
        let s3 = SourceId::from("s3");

        controls.sync_sources(&[s1.clone(), s2.clone()]);
        assert_eq!(controls.len(), 2);

        // s1's state survives a resync; s2 is dropped, s3 created
        controls.control(&s1).unwrap().set_muted(true);
        controls.sync_sources(&[s1.clone(), s3.clone()]);

        assert_eq!(controls.len(), 2);
        assert!(controls.control(&s1).unwrap().state().muted);
        assert!(controls.control(&s2).is_none());
        assert!(controls.control(&s3).is_some());
    }
}
