use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Represents a bounding box in projected (EPSG:3857) or pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates empty bounds (invalid bounds that can be extended)
    pub fn empty() -> Self {
        Self::new(
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Extends the bounds to include a point. Non-finite points are skipped.
    pub fn extend(&mut self, point: &Point) {
        if !point.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// True when every corner is a finite number and min <= max.
    ///
    /// Empty bounds (never extended) and bounds containing NaN are not
    /// finite; a single point is.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.is_valid()
    }

    /// Converts projected Web Mercator bounds into geographic bounds
    pub fn to_lat_lng_bounds(&self) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::from_mercator(self.min),
            LatLng::from_mercator(self.max),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}
