use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One selected criterion and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriterion {
    #[serde(rename = "RasterName")]
    pub raster_name: String,
    /// Sent as a decimal string, `30` rather than `30.0`
    #[serde(serialize_with = "weight_to_string", deserialize_with = "weight_from_any")]
    pub weight: f64,
}

impl WeightedCriterion {
    pub fn new(raster_name: impl Into<String>, weight: f64) -> Self {
        Self {
            raster_name: raster_name.into(),
            weight,
        }
    }
}

fn weight_to_string<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&weight.to_string())
}

fn weight_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Weight {
        Number(f64),
        Text(String),
    }

    match Weight::deserialize(deserializer)? {
        Weight::Number(n) => Ok(n),
        Weight::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Request body of the analysis endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub data: Vec<WeightedCriterion>,
}

impl AnalysisPayload {
    pub fn new(data: Vec<WeightedCriterion>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
