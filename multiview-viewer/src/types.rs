//! Common types used throughout the viewer controller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an incoming live video source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque reference to decodable media owned by the transport layer.
///
/// The controller never inspects the token; it only hands it to the
/// presentation layer alongside the computed view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MediaHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MediaHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Simulcast quality tier for a source.
///
/// `Auto` is the adaptive sentinel; the remaining variants are the concrete
/// simulcast layers a source can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamQuality {
    Auto,
    High,
    Medium,
    Low,
}

impl StreamQuality {
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the RID (restriction identifier) for a concrete layer.
    /// `Auto` has no RID since it is not a pinned layer.
    #[must_use]
    pub const fn rid(&self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::High => Some("h"),
            Self::Medium => Some("m"),
            Self::Low => Some("l"),
        }
    }
}

impl fmt::Display for StreamQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Auto => "Auto",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        write!(f, "{label}")
    }
}

/// Detail of one simulcast encoding, passed through to the quality
/// subsystem when a concrete tier is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulcastLayer {
    /// Encoding identifier as announced by the publisher
    pub encoding_id: String,

    /// Spatial layer index, if the codec exposes one
    pub spatial_layer_id: Option<u8>,

    /// Temporal layer index, if the codec exposes one
    pub temporal_layer_id: Option<u8>,

    /// Target bitrate of this encoding (kbps)
    pub bitrate_kbps: u32,
}

/// A selectable quality entry: the tier plus optional layer detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulcastQuality {
    pub stream_quality: StreamQuality,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<SimulcastLayer>,
}

impl SimulcastQuality {
    /// The adaptive sentinel selection.
    #[must_use]
    pub const fn auto() -> Self {
        Self {
            stream_quality: StreamQuality::Auto,
            layer: None,
        }
    }

    /// A concrete tier selection without layer detail.
    #[must_use]
    pub const fn tier(stream_quality: StreamQuality) -> Self {
        Self {
            stream_quality,
            layer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_display_and_from() {
        let id = SourceId::from("cam-1");
        assert_eq!(id.as_str(), "cam-1");
        assert_eq!(id.to_string(), "cam-1");
        assert_eq!(SourceId::new(String::from("cam-1")), id);
    }

    #[test]
    fn test_stream_quality_auto_sentinel() {
        assert!(StreamQuality::Auto.is_auto());
        assert!(!StreamQuality::High.is_auto());
        assert_eq!(StreamQuality::Auto.rid(), None);
        assert_eq!(StreamQuality::Medium.rid(), Some("m"));
    }

    #[test]
    fn test_simulcast_quality_constructors() {
        assert_eq!(SimulcastQuality::auto().stream_quality, StreamQuality::Auto);
        assert!(SimulcastQuality::auto().layer.is_none());

        let pinned = SimulcastQuality::tier(StreamQuality::Low);
        assert_eq!(pinned.stream_quality, StreamQuality::Low);
    }

    #[test]
    fn test_stream_quality_wire_format() {
        // Tier lists arrive from the quality subsystem in lowercase
        let parsed: StreamQuality = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, StreamQuality::Auto);

        let parsed: StreamQuality = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, StreamQuality::High);
    }
}
