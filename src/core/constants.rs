//! Viewer-wide defaults taken from the deployed decision-support tool.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level any basemap in the catalog serves.
pub const MAX_ZOOM: f64 = 18.0;

/// Initial view: centre of India.
pub const DEFAULT_CENTER_LAT: f64 = 20.5937;
pub const DEFAULT_CENTER_LNG: f64 = 78.9629;
pub const DEFAULT_ZOOM: f64 = 6.0;

/// Padding (CSS pixels) kept around a layer extent when framing it.
pub const FIT_PADDING_PX: f64 = 50.0;

/// Duration of the animated fit to a freshly loaded layer.
pub const FIT_DURATION_MS: u64 = 1000;

/// Delay before attaching a new raster layer. The tiling library races the
/// cross-origin image load if the layer is attached in the same tick.
pub const RASTER_ATTACH_DELAY_MS: u64 = 100;

/// Fallbacks used when an analysis response omits where its raster lives.
pub const DEFAULT_RASTER_WORKSPACE: &str = "raster_work";
pub const DEFAULT_RASTER_LAYER: &str = "Clipped_STP_Priority_Map";

pub const DEFAULT_GEOSERVER_URL: &str = "http://localhost:9090/geoserver";
pub const DEFAULT_WORKSPACE: &str = "stp_vector";
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:7000/api/stp_operation/stp_raster";

/// Timeout applied by the shared HTTP client to every request.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
