use crate::core::constants::{MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

const EARTH_RADIUS: f64 = 6378137.0;

/// Easing curves used by animated view transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EasingType {
    Linear,
    EaseOut,
    EaseInOut,
}

impl EasingType {
    /// Apply easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingType::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// An in-progress animated move of the view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransition {
    pub from_center: LatLng,
    pub from_zoom: f64,
    pub to_center: LatLng,
    pub to_zoom: f64,
    pub duration: Duration,
    pub easing: EasingType,
    started: Instant,
}

impl ViewTransition {
    /// Progress in [0, 1] at `now`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        if now <= self.started {
            return 0.0;
        }
        let elapsed = now.duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
    transition: Option<ViewTransition>,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM),
            size,
            min_zoom: 0.0,
            max_zoom: MAX_ZOOM,
            transition: None,
        }
    }

    /// Sets the center of the viewport, clamped to the projectable world
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        );
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + LatLng::clamp_lat(lat_lng.lat).to_radians() / 2.0).tan().ln())
            * EARTH_RADIUS;

        let pixel_x = (x + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Finds the center and the highest whole zoom at which `bounds` fits
    /// inside the viewport with `padding` pixels on every side.
    pub fn fit_target(&self, bounds: &LatLngBounds, padding: f64) -> (LatLng, f64) {
        let available = Point::new(
            (self.size.x - 2.0 * padding).max(1.0),
            (self.size.y - 2.0 * padding).max(1.0),
        );

        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom as i32)..=(self.max_zoom as i32) {
            let zoom = test_zoom as f64;

            let nw = self.project(
                &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
                Some(zoom),
            );
            let se = self.project(
                &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
                Some(zoom),
            );

            let bounds_width = (se.x - nw.x).abs();
            let bounds_height = (se.y - nw.y).abs();

            if bounds_width <= available.x && bounds_height <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        (bounds.center(), best_zoom)
    }

    /// Starts an animated move that frames `bounds`
    pub fn animate_fit(&mut self, bounds: &LatLngBounds, padding: f64, duration: Duration) {
        let (to_center, to_zoom) = self.fit_target(bounds, padding);
        log::debug!(
            "fitting view to ({:.4}, {:.4}) @ z{} over {:?}",
            to_center.lat,
            to_center.lng,
            to_zoom,
            duration
        );

        self.transition = Some(ViewTransition {
            from_center: self.center,
            from_zoom: self.zoom,
            to_center,
            to_zoom,
            duration,
            easing: EasingType::EaseOut,
            started: Instant::now(),
        });
        if duration.is_zero() {
            self.advance(Instant::now());
        }
    }

    /// Steps the active transition to `now`. Returns true while it is still running.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(transition) = self.transition.clone() else {
            return false;
        };

        let t = transition.progress(now);
        let eased = transition.easing.apply(t);
        self.set_center(LatLng::new(
            transition.from_center.lat + (transition.to_center.lat - transition.from_center.lat) * eased,
            transition.from_center.lng + (transition.to_center.lng - transition.from_center.lng) * eased,
        ));
        self.set_zoom(transition.from_zoom + (transition.to_zoom - transition.from_zoom) * eased);

        if t >= 1.0 {
            self.transition = None;
            false
        } else {
            true
        }
    }

    /// The transition currently animating the view, if any
    pub fn transition(&self) -> Option<&ViewTransition> {
        self.transition.as_ref()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(20.5937, 78.9629), 6.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 6.0);
        assert_eq!(viewport.center.lat, 20.5937);
        assert!(viewport.transition().is_none());
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(-3.0);
        assert_eq!(viewport.zoom, 0.0);

        viewport.set_zoom(40.0);
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_fit_target_zooms_in_on_small_area() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let district = LatLngBounds::from_coords(26.7, 80.8, 26.95, 81.1);

        let (center, zoom) = viewport.fit_target(&district, 50.0);
        assert!(zoom >= 9.0, "expected a close zoom, got {zoom}");
        assert!((center.lat - 26.825).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_fit_applies_immediately() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::from_coords(20.0, 77.0, 22.0, 80.0);

        viewport.animate_fit(&bounds, 50.0, Duration::ZERO);

        assert!(viewport.transition().is_none());
        assert!((viewport.center.lat - 21.0).abs() < 1e-9);
        assert!(viewport.zoom > 2.0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [EasingType::Linear, EasingType::EaseOut, EasingType::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }
}
