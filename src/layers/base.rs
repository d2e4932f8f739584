use serde::{Deserialize, Serialize};

/// The logical slot a layer occupies on the map surface.
///
/// At most one layer is active per role; the z-index is fixed per role so the
/// raster always paints above both vector layers whatever the insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Base,
    Primary,
    Secondary,
    Raster,
}

impl LayerRole {
    pub const ALL: [LayerRole; 4] = [
        LayerRole::Base,
        LayerRole::Primary,
        LayerRole::Secondary,
        LayerRole::Raster,
    ];

    /// Fixed paint order of the role
    pub fn z_index(self) -> i32 {
        match self {
            LayerRole::Base => 0,
            LayerRole::Primary => 1,
            LayerRole::Secondary => 2,
            LayerRole::Raster => 3,
        }
    }

    /// Roles whose data is fetched as a vector feature collection
    pub fn is_vector(self) -> bool {
        matches!(self, LayerRole::Primary | LayerRole::Secondary)
    }
}

impl std::fmt::Display for LayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerRole::Base => write!(f, "base"),
            LayerRole::Primary => write!(f, "primary"),
            LayerRole::Secondary => write!(f, "secondary"),
            LayerRole::Raster => write!(f, "raster"),
        }
    }
}

/// Identity of one layer instance on the surface.
///
/// Assigned by the surface when a layer is attached. A fetch started for an
/// instance may only report back while that same instance is still attached
/// to its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub(crate) u64);

impl LayerId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Mutable presentation properties of an attached layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperties {
    pub id: LayerId,
    pub role: LayerRole,
    pub name: String,
    pub z_index: i32,
    /// 0.0 to 1.0
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: LayerId, role: LayerRole, name: String) -> Self {
        Self {
            id,
            role,
            name,
            z_index: role.z_index(),
            opacity: 1.0,
            visible: true,
        }
    }

    /// Sets opacity from a percentage, clamped to [0, 100]. Returns the applied percent.
    pub fn set_opacity_percent(&mut self, percent: i32) -> u8 {
        let clamped = percent.clamp(0, 100) as u8;
        self.opacity = clamped as f32 / 100.0;
        clamped
    }

    pub fn opacity_percent(&self) -> u8 {
        (self.opacity * 100.0).round() as u8
    }
}
