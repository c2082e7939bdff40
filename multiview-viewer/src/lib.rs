//! Multiview viewer controller
//!
//! This crate implements the main-stream projection controller for a
//! multi-source live stream viewer: one source is projected into a large,
//! controllable main view while the remaining sources appear as a strip
//! of selectable tile previews.
//!
//! ## Architecture
//!
//! - **`ViewerController`**: composition root; reacts to registry changes
//!   and computes the view state the presentation layer renders
//! - **`MainStreamSelector`**: selection state machine (auto-election,
//!   explicit switching, commit-after-projection ordering)
//! - **`QualityMediator`**: derived quality-selection surface for the
//!   main source (available tiers, current tier, apply path)
//! - **`SourceRegistry`**: insertion-ordered source membership with
//!   change notifications
//! - **`PlaybackControls`**: per-source playback control handles
//!
//! Rendering, decoding, and the network transport are external: the
//! controller drives them through the [`MainStreamTransport`] trait.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use multiview_viewer::{SourceRegistry, ViewerConfig, ViewerController};
//!
//! let registry = Arc::new(SourceRegistry::new());
//! let controller = ViewerController::new(ViewerConfig::default(), registry, transport);
//! let _reactions = Arc::clone(&controller).spawn_reactions();
//!
//! // Presentation layer reads computed state:
//! let main = controller.main_view();
//! let tiles = controller.tiles();
//!
//! // A tile click moves projection:
//! controller.select_tile(tile_id).await;
//! ```

mod config;
mod error;
mod logging;
mod playback;
mod quality;
mod registry;
mod selector;
mod transport;
mod types;
mod viewer;

pub use config::{LoggingConfig, ViewerConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use playback::{PlaybackControl, PlaybackControls, PlaybackState};
pub use quality::{MainQualitySettings, QualityMediator};
pub use registry::{RegistryEvent, RemoteTrackSource, SourceRegistry};
pub use selector::MainStreamSelector;
pub use transport::MainStreamTransport;
pub use types::{MediaHandle, SimulcastLayer, SimulcastQuality, SourceId, StreamQuality};
pub use viewer::{MainView, TileView, ViewerController};
