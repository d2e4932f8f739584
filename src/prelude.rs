//! Prelude module for common suitmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use suitmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{FitOptions, RasterDefaults, RequestTiming, ViewerConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::{EasingType, ViewTransition, Viewport},
};

pub use crate::layers::{
    base::{LayerId, LayerRole},
    manager::{ActiveLayer, MapSurface, SurfaceHandle, SurfaceManager},
    spec::{LayerSpec, RasterLayerSpec, VectorLayerSpec, VectorStyle},
    tracker::{FeatureCounts, LoadingTracker},
};

pub use crate::analysis::{
    coordinator::{AnalysisCoordinator, AnalysisStatus, Resolution, TriggerOutcome},
    payload::{AnalysisPayload, WeightedCriterion},
    response::{AnalysisResponse, RasterDescriptor},
    selection::{Category, CategoryCatalog, CategorySelection, SelectionStore},
};

pub use crate::sources::{
    basemap::{Basemap, TileSource},
    wfs::{build_vector_request, FilterValues},
    wms::{build_legend_url, build_raster_request, RasterRequest},
};

pub use crate::data::geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry};

pub use crate::net::{
    analysis::{AnalysisClient, HttpAnalysisClient},
    features::{FeatureSource, HttpFeatureSource},
};

pub use crate::view::{
    events::{EventSender, ViewEvent},
    orchestrator::ViewOrchestrator,
    snapshot::{LayerInfo, LegendState, ViewSnapshot},
};

pub use crate::runtime::{async_delay, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
