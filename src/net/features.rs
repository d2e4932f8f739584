use crate::data::geojson::FeatureCollection;
use crate::net::client::{check_status, HTTP_CLIENT};
use crate::Result;
use async_trait::async_trait;

/// Fetches a vector layer's features from a resource URL
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FeatureCollection>;
}

/// GETs WFS GeoJSON over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpFeatureSource;

impl HttpFeatureSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl FeatureSource for HttpFeatureSource {
    async fn fetch(&self, url: &str) -> Result<FeatureCollection> {
        log::debug!("fetching features from {}", url);
        let response = check_status(HTTP_CLIENT.get(url).send().await?)?;
        let body = response.text().await?;
        let collection = FeatureCollection::from_str(&body)?;
        log::debug!("received {} features ({} bytes)", collection.len(), body.len());
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_fetch_future_spawnable_on_native() {
        let source = HttpFeatureSource::new();
        let fetch = source.fetch("http://localhost:9090/geoserver/ows");
        assert_send(&fetch);
    }
}
