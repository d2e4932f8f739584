//! Value objects describing what a role should show.
//!
//! Specs are built by the orchestrator and handed to the surface; the surface
//! never mutates them except for opacity on the active raster.

use crate::layers::base::LayerRole;
use crate::sources::basemap::Basemap;
use crate::sources::wms::RasterRequest;
use serde::{Deserialize, Serialize};

/// Fill and stroke of a vector boundary layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStyle {
    /// CSS color, usually translucent
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl VectorStyle {
    /// Pale yellow districts with a blue outline
    pub fn primary() -> Self {
        Self {
            fill: "rgba(255, 246, 181, 0.3)".to_string(),
            stroke: "#3b82f6".to_string(),
            stroke_width: 1.0,
        }
    }

    /// Magenta filtered subset with a green outline
    pub fn secondary() -> Self {
        Self {
            fill: "rgba(251, 0, 255, 0.3)".to_string(),
            stroke: "#10b981".to_string(),
            stroke_width: 1.5,
        }
    }

    pub fn for_role(role: LayerRole) -> Self {
        match role {
            LayerRole::Secondary => Self::secondary(),
            _ => Self::primary(),
        }
    }
}

/// A WFS-backed boundary layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayerSpec {
    pub role: LayerRole,
    /// Layer name inside the workspace, for display
    pub name: String,
    pub resource_url: String,
    pub style: VectorStyle,
    pub z_index: i32,
}

impl VectorLayerSpec {
    pub fn new(role: LayerRole, name: impl Into<String>, resource_url: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            resource_url: resource_url.into(),
            style: VectorStyle::for_role(role),
            z_index: role.z_index(),
        }
    }

    pub fn with_style(mut self, style: VectorStyle) -> Self {
        self.style = style;
        self
    }
}

/// The analysis result rendered as WMS imagery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayerSpec {
    pub workspace: String,
    pub layer_identifier: String,
    /// Percent, 0 to 100
    pub opacity: u8,
    pub tile_url: String,
    pub legend_url: String,
}

impl RasterLayerSpec {
    pub fn from_request(request: &RasterRequest, opacity: u8) -> Self {
        Self {
            workspace: request.workspace.clone(),
            layer_identifier: request.layer_name.clone(),
            opacity: opacity.min(100),
            tile_url: request.tile_url.clone(),
            legend_url: request.legend_url.clone(),
        }
    }

    /// `workspace:layer` as GeoServer addresses it
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.workspace, self.layer_identifier)
    }
}

/// Anything the surface can hold in a role
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Base(Basemap),
    Vector(VectorLayerSpec),
    Raster(RasterLayerSpec),
}

impl LayerSpec {
    /// Whether this spec may occupy `role`
    pub fn fits_role(&self, role: LayerRole) -> bool {
        match self {
            LayerSpec::Base(_) => role == LayerRole::Base,
            LayerSpec::Vector(spec) => spec.role == role && role.is_vector(),
            LayerSpec::Raster(_) => role == LayerRole::Raster,
        }
    }

    /// Human-readable name shown in layer listings
    pub fn display_name(&self) -> String {
        match self {
            LayerSpec::Base(basemap) => basemap.name.clone(),
            LayerSpec::Vector(spec) => spec.name.clone(),
            LayerSpec::Raster(spec) => spec.qualified_name(),
        }
    }

    pub fn as_vector(&self) -> Option<&VectorLayerSpec> {
        match self {
            LayerSpec::Vector(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn as_raster(&self) -> Option<&RasterLayerSpec> {
        match self {
            LayerSpec::Raster(spec) => Some(spec),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_spec_takes_role_defaults() {
        let spec = VectorLayerSpec::new(LayerRole::Secondary, "villages", "http://x/wfs?a=b");
        assert_eq!(spec.z_index, 2);
        assert_eq!(spec.style, VectorStyle::secondary());
    }

    #[test]
    fn test_fits_role() {
        let vector = LayerSpec::Vector(VectorLayerSpec::new(LayerRole::Primary, "d", "u"));
        assert!(vector.fits_role(LayerRole::Primary));
        assert!(!vector.fits_role(LayerRole::Secondary));
        assert!(!vector.fits_role(LayerRole::Raster));

        let base = LayerSpec::Base(Basemap::openstreetmap());
        assert!(base.fits_role(LayerRole::Base));
        assert!(!base.fits_role(LayerRole::Primary));
    }
}
