use crate::core::geo::TileCoord;
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution text the renderer must display
    fn attribution(&self) -> &str;
}

/// An XYZ basemap from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basemap {
    pub key: String,
    pub name: String,
    /// URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Basemap {
    fn new(key: &str, name: &str, template: &str, subdomains: &[&str], attribution: &str, max_zoom: u8) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            template: template.to_string(),
            subdomains: subdomains.iter().map(|s| s.to_string()).collect(),
            attribution: attribution.to_string(),
            max_zoom,
        }
    }

    pub fn openstreetmap() -> Self {
        Self::new(
            "osm",
            "OpenStreetMap",
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            &["a", "b", "c"],
            "© OpenStreetMap contributors",
            19,
        )
    }

    pub fn satellite() -> Self {
        Self::new(
            "satellite",
            "Satellite",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            &[],
            "Tiles © Esri",
            18,
        )
    }

    pub fn topo() -> Self {
        Self::new(
            "topo",
            "Topographic",
            "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            &["a", "b", "c"],
            "© OpenStreetMap contributors, SRTM | © OpenTopoMap (CC-BY-SA)",
            17,
        )
    }

    pub fn light() -> Self {
        Self::new(
            "light",
            "Light",
            "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
            &["a", "b", "c", "d"],
            "© OpenStreetMap contributors © CARTO",
            19,
        )
    }

    /// Every basemap the viewer offers, default first
    pub fn catalog() -> Vec<Basemap> {
        vec![Self::openstreetmap(), Self::satellite(), Self::topo(), Self::light()]
    }

    pub fn from_key(key: &str) -> Option<Basemap> {
        Self::catalog().into_iter().find(|b| b.key == key)
    }
}

impl Default for Basemap {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

impl TileSource for Basemap {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if !self.subdomains.is_empty() {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            url = url.replace("{s}", &self.subdomains[idx]);
        }
        url
    }

    fn attribution(&self) -> &str {
        &self.attribution
    }
}
