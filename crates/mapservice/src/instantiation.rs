use std::collections::BTreeMap;

use foundation::{AnalysisId, DataviewId, Protocol, ProtocolUrls};
use serde::{Deserialize, Serialize};

use crate::error::DerivationError;

/// Category of a configured layer; decides the shape of its URL templates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    /// Server-rendered png tiles with UTF grids and per-feature attributes.
    #[serde(rename = "raster-tile", alias = "mapnik", alias = "cartodb")]
    RasterTile,
    /// Aggregated time-series tiles, fetched as one combined request.
    #[serde(rename = "time-series", alias = "torque")]
    TimeSeries,
    /// Anything else the service hosts (plain tiles, basemaps).
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderType::RasterTile => "raster-tile",
            ProviderType::TimeSeries => "time-series",
            ProviderType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Legend metadata blocks, left undecoded so one malformed kind can't
/// prevent decoding of the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bubble: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choropleth: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLayer {
    #[serde(rename = "type")]
    pub provider: ProviderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataviewMetadata {
    pub url: ProtocolUrls,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Waiting,
    Running,
    Ready,
    Failed,
    Canceled,
    /// A status this client does not know about; kept so the result still parses.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisNodeMetadata {
    pub status: AnalysisStatus,
    pub url: ProtocolUrls,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Anything else the service echoes back for the node (parameters included).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Snapshot of a server-confirmed map configuration.
///
/// Ordering contract:
/// - `layers` is in the service's own order; a layer's position is its remote index.
/// - Within one provider type, that order matches the client's local order of
///   entities of the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInstantiationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layergroupid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Subdomain-sharded base url with a `{s}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_url_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomains: Option<Vec<String>>,
    #[serde(default)]
    pub layers: Vec<RemoteLayer>,
    #[serde(default)]
    pub dataviews: BTreeMap<DataviewId, DataviewMetadata>,
    #[serde(default)]
    pub analyses: BTreeMap<AnalysisId, AnalysisNodeMetadata>,
}

impl MapInstantiationResult {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Remote indexes of every layer of `provider`, in service order.
    pub fn layer_indexes_by_type(&self, provider: ProviderType) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.provider == provider)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn layer(&self, index: usize) -> Result<&RemoteLayer, DerivationError> {
        self.layers
            .get(index)
            .ok_or(DerivationError::UnknownLayerIndex(index))
    }

    pub fn layer_metadata(&self, index: usize) -> Result<&serde_json::Value, DerivationError> {
        self.layer(index).map(|layer| &layer.meta)
    }

    /// Legend blocks for the layer at `index`; `None` when the layer has none
    /// configured or the index is unknown.
    pub fn legend_metadata(&self, index: usize) -> Option<&LegendMetadata> {
        self.layers.get(index).and_then(|layer| layer.legend.as_ref())
    }

    pub fn supported_subdomains(&self) -> Result<&[String], DerivationError> {
        self.subdomains
            .as_deref()
            .ok_or(DerivationError::MissingSubdomains)
    }

    /// Base url, sharded onto `subdomain` when the service offers a CDN template.
    pub fn base_url(&self, subdomain: Option<&str>) -> Result<String, DerivationError> {
        if let (Some(subdomain), Some(template)) = (subdomain, self.cdn_url_template.as_deref()) {
            return Ok(template.replace("{s}", subdomain));
        }
        match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url.trim_end_matches('/').to_string()),
            _ => Err(DerivationError::MissingBaseUrl),
        }
    }

    pub fn dataview_metadata(&self, id: &DataviewId) -> Option<&DataviewMetadata> {
        self.dataviews.get(id)
    }

    pub fn dataview_url(&self, id: &DataviewId, protocol: Protocol) -> Option<&str> {
        self.dataview_metadata(id)
            .map(|meta| meta.url.resolve(protocol))
    }

    pub fn analysis_node_metadata(&self, id: &AnalysisId) -> Option<&AnalysisNodeMetadata> {
        self.analyses.get(id)
    }
}
