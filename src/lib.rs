//! # suitmap
//!
//! Layer orchestration for a weighted-criteria suitability map viewer.
//!
//! A viewer shows two vector boundary layers fetched from a WFS server and a
//! raster suitability layer computed on demand by a remote analysis service.
//! This crate owns the part in between: building the feature/tile requests,
//! keeping one layer per role on the map surface, tracking per-layer loading
//! state, and coordinating the analysis call whose result becomes the raster
//! layer. Rendering itself is left to whatever draws the [`SurfaceManager`]'s
//! layer stack.

pub mod analysis;
pub mod core;
pub mod data;
pub mod layers;
pub mod net;
pub mod prelude;
pub mod runtime;
pub mod sources;
pub mod view;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::ViewerConfig,
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use layers::{
    base::{LayerId, LayerRole},
    manager::{MapSurface, SurfaceHandle, SurfaceManager},
    spec::{LayerSpec, RasterLayerSpec, VectorLayerSpec, VectorStyle},
    tracker::LoadingTracker,
};

pub use analysis::{
    coordinator::{AnalysisCoordinator, AnalysisStatus},
    payload::{AnalysisPayload, WeightedCriterion},
    response::{AnalysisResponse, RasterDescriptor},
    selection::{CategoryCatalog, CategorySelection, SelectionStore},
};

pub use sources::{
    basemap::{Basemap, TileSource},
    wfs::{build_vector_request, FilterValues},
    wms::{build_raster_request, RasterRequest},
};

pub use data::geojson::FeatureCollection;

pub use net::{analysis::AnalysisClient, features::FeatureSource};

pub use view::{orchestrator::ViewOrchestrator, snapshot::ViewSnapshot};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Routes panics to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
