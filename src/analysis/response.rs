use crate::core::config::RasterDefaults;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

const SUCCESS: &str = "success";

/// Validated reply of the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Success {
        layer_name: Option<String>,
        /// camelCase spelling used by older service builds
        layer_name_alt: Option<String>,
        id: Option<String>,
        workspace: Option<String>,
    },
    Failure {
        status: String,
    },
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    layer_name: Option<String>,
    #[serde(default, rename = "layerName")]
    layer_name_alt: Option<String>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    workspace: Option<String>,
}

impl AnalysisResponse {
    /// Parses the service's JSON body. Anything other than `status: "success"` is a failure.
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawResponse = serde_json::from_str(body)
            .map_err(|e| MapError::ParseError(format!("invalid analysis response: {}", e)))?;

        let status = raw.status.unwrap_or_default();
        if status != SUCCESS {
            return Ok(AnalysisResponse::Failure {
                status: if status.is_empty() { "unknown".to_string() } else { status },
            });
        }

        let id = raw.id.and_then(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(AnalysisResponse::Success {
            layer_name: raw.layer_name,
            layer_name_alt: raw.layer_name_alt,
            id,
            workspace: raw.workspace,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success { .. })
    }

    /// Where the computed raster lives, or `None` for a failure
    pub fn descriptor(&self, defaults: &RasterDefaults) -> Option<RasterDescriptor> {
        match self {
            AnalysisResponse::Success {
                layer_name,
                layer_name_alt,
                id,
                workspace,
            } => {
                let identifier = [layer_name, layer_name_alt, id]
                    .into_iter()
                    .find_map(|candidate| non_blank(candidate.as_deref()));
                Some(RasterDescriptor::resolve(workspace.as_deref(), identifier, defaults))
            }
            AnalysisResponse::Failure { .. } => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The raster layer an analysis produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDescriptor {
    pub workspace: String,
    pub layer_identifier: String,
    /// The response named no layer and the configured default was used
    pub used_fallback: bool,
}

impl RasterDescriptor {
    pub fn new(workspace: impl Into<String>, layer_identifier: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            layer_identifier: layer_identifier.into(),
            used_fallback: false,
        }
    }

    /// Fills missing parts from `defaults`, warning when the layer name is guessed
    pub fn resolve(workspace: Option<&str>, identifier: Option<&str>, defaults: &RasterDefaults) -> Self {
        let workspace = non_blank(workspace).unwrap_or(&defaults.workspace).to_string();
        match non_blank(identifier) {
            Some(identifier) => Self::new(workspace, identifier),
            None => {
                log::warn!(
                    "analysis response did not name a raster layer; using default '{}'",
                    defaults.layer_name
                );
                Self {
                    workspace,
                    layer_identifier: defaults.layer_name.clone(),
                    used_fallback: true,
                }
            }
        }
    }
}
