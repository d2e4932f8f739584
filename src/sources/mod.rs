//! Resource locators for everything the viewer fetches: WFS feature queries,
//! WMS raster tiles and legends, and basemap tile templates.

pub mod basemap;
pub mod wfs;
pub mod wms;
