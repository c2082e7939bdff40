//! Source registry
//!
//! Ordered mapping from source identifier to the source's live state
//! (media handle, current quality tier). Iteration order is insertion
//! order, which is what auto-election relies on: the first source to join
//! the stream is the deterministic fallback main source.
//!
//! Membership is driven by the transport layer as publishers join and
//! leave; the controller itself only reads the registry and reacts to its
//! change events.

use crate::types::{MediaHandle, SourceId, StreamQuality};
use crate::{Error, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the change-event channel. Events are tiny and consumers
/// resync from a snapshot on lag, so a small buffer is enough.
const REGISTRY_EVENT_CAPACITY: usize = 64;

/// Live state of one incoming source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrackSource {
    /// Decodable media owned by the transport layer; passed through only.
    pub media: MediaHandle,

    /// Current simulcast tier selection for this source.
    pub quality: StreamQuality,
}

impl RemoteTrackSource {
    #[must_use]
    pub const fn new(media: MediaHandle, quality: StreamQuality) -> Self {
        Self { media, quality }
    }
}

/// Registry change notification.
///
/// Granularity is deliberately coarse: consumers that only care about
/// membership (auto-election) listen for `SizeChanged` and ignore
/// per-source quality updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A source joined or left the stream.
    SizeChanged { size: usize },

    /// A source's quality tier (or media handle) was updated in place.
    QualityChanged { source_id: SourceId },
}

/// Insertion-ordered source registry with change notifications.
#[derive(Debug)]
pub struct SourceRegistry {
    sources: RwLock<IndexMap<SourceId, RemoteTrackSource>>,
    events: broadcast::Sender<RegistryEvent>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(REGISTRY_EVENT_CAPACITY);
        Self {
            sources: RwLock::new(IndexMap::new()),
            events,
        }
    }

    /// Subscribe to registry change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Register a source, or replace the state of an already-registered one.
    ///
    /// A new registration keeps insertion order and emits `SizeChanged`;
    /// replacing an existing entry emits `QualityChanged` instead since the
    /// membership did not move.
    pub fn insert(&self, source_id: SourceId, source: RemoteTrackSource) {
        let (previous, size) = {
            let mut sources = self.sources.write();
            let previous = sources.insert(source_id.clone(), source);
            (previous, sources.len())
        };

        if previous.is_none() {
            debug!(source_id = %source_id, size, "Source joined");
            let _ = self.events.send(RegistryEvent::SizeChanged { size });
        } else {
            let _ = self.events.send(RegistryEvent::QualityChanged { source_id });
        }
    }

    /// Remove a source, preserving the insertion order of the remainder.
    pub fn remove(&self, source_id: &SourceId) -> Option<RemoteTrackSource> {
        let (removed, size) = {
            let mut sources = self.sources.write();
            // shift_remove keeps the remaining sources in insertion order
            let removed = sources.shift_remove(source_id);
            (removed, sources.len())
        };

        if removed.is_some() {
            debug!(source_id = %source_id, size, "Source left");
            let _ = self.events.send(RegistryEvent::SizeChanged { size });
        }
        removed
    }

    /// Update the quality tier recorded for a source.
    pub fn set_quality(&self, source_id: &SourceId, quality: StreamQuality) -> Result<()> {
        {
            let mut sources = self.sources.write();
            let source = sources
                .get_mut(source_id)
                .ok_or_else(|| Error::SourceNotFound(source_id.clone()))?;
            source.quality = quality;
        }

        let _ = self.events.send(RegistryEvent::QualityChanged {
            source_id: source_id.clone(),
        });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, source_id: &SourceId) -> Option<RemoteTrackSource> {
        self.sources.read().get(source_id).cloned()
    }

    #[must_use]
    pub fn quality_of(&self, source_id: &SourceId) -> Option<StreamQuality> {
        self.sources.read().get(source_id).map(|s| s.quality)
    }

    #[must_use]
    pub fn contains(&self, source_id: &SourceId) -> bool {
        self.sources.read().contains_key(source_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }

    /// First source in insertion order, the auto-election candidate.
    #[must_use]
    pub fn first_source_id(&self) -> Option<SourceId> {
        self.sources.read().first().map(|(id, _)| id.clone())
    }

    /// All source ids in insertion order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.read().keys().cloned().collect()
    }

    /// Full ordered snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(SourceId, RemoteTrackSource)> {
        self.sources
            .read()
            .iter()
            .map(|(id, source)| (id.clone(), source.clone()))
            .collect()
    }
}
