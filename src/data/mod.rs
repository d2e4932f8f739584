//! Parsed feature data served by the WFS endpoint.

pub mod geojson;
