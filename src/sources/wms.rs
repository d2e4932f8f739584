use crate::core::config::RasterDefaults;
use serde::{Deserialize, Serialize};

/// Vendor flag handed to the tiling library
pub const SERVER_TYPE: &str = "geoserver";

/// Locators for a WMS raster layer and its legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterRequest {
    pub workspace: String,
    pub layer_name: String,
    /// `workspace:layer_name`
    pub layers: String,
    pub tile_url: String,
    pub legend_url: String,
    pub server_type: String,
    /// True when the layer name came from the configured fallback
    pub used_fallback: bool,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds tile and legend locators for a raster layer.
///
/// A missing workspace or layer name falls back to `defaults`; a missing layer
/// name is logged since it usually means the analysis response was malformed.
pub fn build_raster_request(
    wms_url: &str,
    workspace: Option<&str>,
    layer_name: Option<&str>,
    defaults: &RasterDefaults,
) -> RasterRequest {
    let workspace = present(workspace).unwrap_or(&defaults.workspace).to_string();
    let (layer_name, used_fallback) = match present(layer_name) {
        Some(name) => (name.to_string(), false),
        None => {
            log::warn!(
                "raster layer name missing, falling back to '{}'",
                defaults.layer_name
            );
            (defaults.layer_name.clone(), true)
        }
    };

    let layers = format!("{workspace}:{layer_name}");
    let tile_url = format!(
        "{}?LAYERS={}&TILED=true&FORMAT=image/png&TRANSPARENT=true",
        wms_url, layers
    );
    let legend_url = build_legend_url(wms_url, &workspace, &layer_name);

    RasterRequest {
        workspace,
        layer_name,
        layers,
        tile_url,
        legend_url,
        server_type: SERVER_TYPE.to_string(),
        used_fallback,
    }
}

/// GetLegendGraphic URL for `workspace:layer_name`
pub fn build_legend_url(wms_url: &str, workspace: &str, layer_name: &str) -> String {
    format!(
        "{}?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetLegendGraphic&FORMAT=image/png&LAYER={}:{}&STYLE=",
        wms_url, workspace, layer_name
    )
}
