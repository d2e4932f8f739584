use serde::{Deserialize, Serialize};

/// Values an attribute filter matches against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValues {
    Single(String),
    List(Vec<String>),
}

impl FilterValues {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValues::Single(value) => value.is_empty(),
            FilterValues::List(values) => values.is_empty(),
        }
    }

    /// Comma-joined, individually single-quoted values
    fn quoted(&self) -> String {
        match self {
            FilterValues::Single(value) => quote(value),
            FilterValues::List(values) => values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(","),
        }
    }
}

impl From<&str> for FilterValues {
    fn from(value: &str) -> Self {
        FilterValues::Single(value.to_string())
    }
}

impl From<String> for FilterValues {
    fn from(value: String) -> Self {
        FilterValues::Single(value)
    }
}

impl From<Vec<String>> for FilterValues {
    fn from(values: Vec<String>) -> Self {
        FilterValues::List(values)
    }
}

impl From<Vec<&str>> for FilterValues {
    fn from(values: Vec<&str>) -> Self {
        FilterValues::List(values.into_iter().map(str::to_string).collect())
    }
}

// CQL string literal; embedded quotes are doubled
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds a WFS GetFeature URL for `workspace:layer_name`.
///
/// When both `filter` and non-empty `values` are given, a
/// `CQL_FILTER=<filter> IN ('a','b')` clause is appended.
pub fn build_vector_request(
    server_url: &str,
    workspace: &str,
    layer_name: &str,
    filter: Option<&str>,
    values: Option<&FilterValues>,
) -> String {
    let mut url = format!(
        "{}/wfs?service=WFS&version=1.1.0&request=GetFeature&typeName={}:{}&outputFormat=application/json&srsname=EPSG:3857",
        server_url.trim_end_matches('/'),
        workspace,
        layer_name
    );

    match (filter.filter(|f| !f.is_empty()), values) {
        (Some(attribute), Some(values)) if !values.is_empty() => {
            url.push_str(&format!("&CQL_FILTER={} IN ({})", attribute, values.quoted()));
        }
        (Some(attribute), _) => {
            log::debug!("filter '{}' has no values; requesting unfiltered", attribute);
        }
        _ => {}
    }

    url
}
