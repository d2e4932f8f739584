use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + Self::clamp_lat(self.lat).to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate from a LatLng and zoom level
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let n = 2_f64.powi(zoom as i32);

        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor() as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u32;

        Self::new(x, y, zoom)
    }
}
