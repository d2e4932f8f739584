use crate::core::bounds::Bounds;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// A coordinate tuple; a third (elevation) value is tolerated and ignored
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    /// Grows `bounds` by every position of the geometry
    fn extend_bounds(&self, bounds: &mut Bounds) {
        fn add(bounds: &mut Bounds, position: &Position) {
            if let [x, y, ..] = position.as_slice() {
                bounds.extend(&Point::new(*x, *y));
            }
        }

        match self {
            GeoJsonGeometry::Point { coordinates } => add(bounds, coordinates),
            GeoJsonGeometry::LineString { coordinates } | GeoJsonGeometry::MultiPoint { coordinates } => {
                coordinates.iter().for_each(|p| add(bounds, p));
            }
            GeoJsonGeometry::Polygon { coordinates } | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().flatten().for_each(|p| add(bounds, p));
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(|p| add(bounds, p));
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().for_each(|g| g.extend_bounds(bounds));
            }
        }
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeoJsonDocument {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

/// Features returned by a WFS query, in the requested projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<GeoJsonFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self { features }
    }

    /// Parses a `FeatureCollection` or a lone `Feature`
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        let document: GeoJsonDocument = serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))?;

        Ok(match document {
            GeoJsonDocument::Feature(feature) => Self::new(vec![feature]),
            GeoJsonDocument::FeatureCollection { features } => Self::new(features),
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box over every finite coordinate, `None` if there is none
    pub fn extent(&self) -> Option<Bounds> {
        let mut bounds = Bounds::empty();
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            geometry.extend_bounds(&mut bounds);
        }
        bounds.is_finite().then_some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WFS_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "totalFeatures": 2,
        "features": [
            {
                "type": "Feature",
                "id": "districts.1",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[100.0, 200.0], [300.0, 200.0], [300.0, 400.0], [100.0, 200.0]]]]
                },
                "geometry_name": "the_geom",
                "properties": { "district": "Lucknow" }
            },
            {
                "type": "Feature",
                "id": "districts.2",
                "geometry": { "type": "Point", "coordinates": [-50.0, 250.0, 12.0] },
                "properties": { "district": "Kanpur" }
            }
        ],
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } }
    }"#;

    #[test]
    fn test_parse_wfs_response() {
        let collection = FeatureCollection::from_str(WFS_RESPONSE).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.features[0].property("district"),
            Some(&serde_json::Value::String("Lucknow".into()))
        );

        let extent = collection.extent().unwrap();
        assert_eq!(extent, Bounds::from_coords(-50.0, 200.0, 300.0, 400.0));
    }

    #[test]
    fn test_empty_collection_has_no_extent() {
        let collection = FeatureCollection::from_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(collection.is_empty());
        assert!(collection.extent().is_none());
    }

    #[test]
    fn test_null_geometry_has_no_extent() {
        let collection = FeatureCollection::from_str(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{}}]}"#,
        )
        .unwrap();
        assert_eq!(collection.len(), 1);
        assert!(collection.extent().is_none());
    }

    #[test]
    fn test_non_finite_coordinates_ignored() {
        let point = |x: f64, y: f64| GeoJsonFeature {
            id: None,
            geometry: Some(GeoJsonGeometry::Point { coordinates: vec![x, y] }),
            properties: None,
        };

        let only_nan = FeatureCollection::new(vec![point(f64::NAN, f64::NAN)]);
        assert!(only_nan.extent().is_none());

        let mixed = FeatureCollection::new(vec![point(f64::NAN, 1.0), point(5.0, 6.0)]);
        assert_eq!(mixed.extent(), Some(Bounds::from_coords(5.0, 6.0, 5.0, 6.0)));
    }

    #[test]
    fn test_single_feature_document() {
        let collection = FeatureCollection::from_str(
            r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[2,3]]},"properties":null}"#,
        )
        .unwrap();
        assert_eq!(collection.extent(), Some(Bounds::from_coords(0.0, 0.0, 2.0, 3.0)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = FeatureCollection::from_str("<ServiceExceptionReport/>").unwrap_err();
        assert!(matches!(err, crate::Error::ParseError(_)));
    }
}
