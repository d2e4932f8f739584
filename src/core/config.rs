//! Configuration for the viewer: where the servers live, the initial view and
//! the timing knobs of the layer lifecycle.
//!
//! Every section has a `Default` matching the deployed tool, so a partial JSON
//! document only needs to name what differs.

use crate::core::constants::*;
use crate::core::geo::LatLng;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub endpoints: EndpointConfig,
    pub view: ViewConfig,
    pub fit: FitOptions,
    pub timing: RequestTiming,
    pub raster: RasterDefaults,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            view: ViewConfig::default(),
            fit: FitOptions::default(),
            timing: RequestTiming::default(),
            raster: RasterDefaults::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON document; missing sections keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations the viewer cannot start with
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("geoserver_url", &self.endpoints.geoserver_url),
            ("default_workspace", &self.endpoints.default_workspace),
            ("analysis_url", &self.endpoints.analysis_url),
        ] {
            if value.trim().is_empty() {
                return Err(MapError::Config(format!("{name} must not be empty")));
            }
        }
        if !self.view.center.is_valid() {
            return Err(MapError::Config(format!(
                "center ({}, {}) is not a valid coordinate",
                self.view.center.lat, self.view.center.lng
            )));
        }
        if !(0.0..=MAX_ZOOM).contains(&self.view.zoom) {
            return Err(MapError::Config(format!(
                "zoom {} outside 0..={MAX_ZOOM}",
                self.view.zoom
            )));
        }
        if self.view.initial_opacity > 100 {
            return Err(MapError::Config(format!(
                "initial_opacity {} outside 0..=100",
                self.view.initial_opacity
            )));
        }
        if !self.fit.padding.is_finite() || self.fit.padding < 0.0 {
            return Err(MapError::Config("fit padding must be a non-negative number".into()));
        }
        Ok(())
    }

    pub fn with_geoserver_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.geoserver_url = url.into();
        self
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.endpoints.default_workspace = workspace.into();
        self
    }

    pub fn with_analysis_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.analysis_url = url.into();
        self
    }

    pub fn with_timing(mut self, timing: RequestTiming) -> Self {
        self.timing = timing;
        self
    }

    /// The WMS endpoint rasters and legends are served from
    pub fn wms_url(&self) -> String {
        self.endpoints
            .wms_url
            .clone()
            .unwrap_or_else(|| format!("{}/wms", self.endpoints.geoserver_url.trim_end_matches('/')))
    }
}

/// Remote services the viewer talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// GeoServer base URL; `/wfs` and `/wms` are appended
    pub geoserver_url: String,
    /// Workspace the vector boundary layers live in
    pub default_workspace: String,
    /// POST endpoint of the suitability analysis
    pub analysis_url: String,
    /// Overrides the WMS endpoint derived from `geoserver_url`
    pub wms_url: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geoserver_url: DEFAULT_GEOSERVER_URL.to_string(),
            default_workspace: DEFAULT_WORKSPACE.to_string(),
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            wms_url: None,
        }
    }
}

/// Initial view and presentation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Basemap catalog key shown at start
    pub basemap: String,
    /// Raster opacity in percent
    pub initial_opacity: u8,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            zoom: DEFAULT_ZOOM,
            basemap: "osm".to_string(),
            initial_opacity: 100,
        }
    }
}

/// How the view frames a freshly loaded vector layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    pub padding: f64,
    pub duration_ms: u64,
}

impl FitOptions {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: FIT_PADDING_PX,
            duration_ms: FIT_DURATION_MS,
        }
    }
}

/// Timing of the layer lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTiming {
    /// Pause between a successful analysis and attaching its raster
    pub raster_attach_delay_ms: u64,
}

impl RequestTiming {
    /// No artificial delays, for deterministic tests
    pub fn for_testing() -> Self {
        Self {
            raster_attach_delay_ms: 0,
        }
    }

    pub fn raster_attach_delay(&self) -> Duration {
        Duration::from_millis(self.raster_attach_delay_ms)
    }
}

impl Default for RequestTiming {
    fn default() -> Self {
        Self {
            raster_attach_delay_ms: RASTER_ATTACH_DELAY_MS,
        }
    }
}

/// Where a raster lives when the analysis response does not say
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterDefaults {
    pub workspace: String,
    pub layer_name: String,
}

impl Default for RasterDefaults {
    fn default() -> Self {
        Self {
            workspace: DEFAULT_RASTER_WORKSPACE.to_string(),
            layer_name: DEFAULT_RASTER_LAYER.to_string(),
        }
    }
}
