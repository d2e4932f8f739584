use crate::analysis::coordinator::AnalysisStatus;
use crate::analysis::response::RasterDescriptor;
use crate::layers::base::LayerRole;
use crate::layers::tracker::FeatureCounts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ANALYSIS_BUSY_MESSAGE: &str = "Processing analysis...";
pub const LOADING_BUSY_MESSAGE: &str = "Loading data...";

/// Legend graphic of the active raster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendState {
    pub url: Option<String>,
    pub visible: bool,
    /// Cosmetic; set when the legend image failed to load
    pub warning: Option<String>,
}

/// What the layer info box lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub primary_layer: Option<String>,
    pub primary_features: usize,
    pub secondary_layer: Option<String>,
    pub secondary_features: usize,
    pub raster_layer: Option<String>,
}

/// Everything presentation needs, copied out of the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub loading: bool,
    pub busy_message: Option<String>,
    pub error: Option<String>,
    pub layer_errors: BTreeMap<LayerRole, String>,
    pub feature_counts: FeatureCounts,
    pub raster_descriptor: Option<RasterDescriptor>,
    pub legend: LegendState,
    /// Raster opacity percent
    pub opacity: u8,
    pub layer_info: LayerInfo,
    pub analysis_status: AnalysisStatus,
    pub analysis_requested: bool,
}

/// Overlay text while something is pending; analysis takes precedence
pub fn busy_message(loading: bool, analysis_pending: bool) -> Option<String> {
    if analysis_pending {
        Some(ANALYSIS_BUSY_MESSAGE.to_string())
    } else if loading {
        Some(LOADING_BUSY_MESSAGE.to_string())
    } else {
        None
    }
}

impl ViewSnapshot {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
