//! External transport interface
//!
//! The controller drives projection and quality selection through this
//! trait; the embedding application implements it on top of whatever
//! transport actually carries the media (WebRTC, MoQ, a test double).

use crate::types::{SimulcastQuality, SourceId};
use crate::Result;
use async_trait::async_trait;

/// Operations the controller consumes from the transport and
/// quality-selection subsystems.
#[async_trait]
pub trait MainStreamTransport: Send + Sync {
    /// Begin decoding `source_id` into the main viewport.
    ///
    /// May take arbitrary time and may fail; the controller commits the
    /// selection only after this resolves successfully.
    async fn project_to_main(&self, source_id: &SourceId) -> Result<()>;

    /// Stop decoding `source_id` as the main view.
    ///
    /// Implementations should be non-blocking (fire-and-forget); the
    /// controller does not wait for un-projection before projecting the
    /// next source.
    fn reproject_from_main(&self, source_id: &SourceId);

    /// Request a quality-tier change for a source.
    ///
    /// `None` is not a state change: it signals "re-derive the current
    /// value", used when the set of available tiers changes shape.
    fn set_source_quality(&self, source_id: &SourceId, quality: Option<SimulcastQuality>);
}
