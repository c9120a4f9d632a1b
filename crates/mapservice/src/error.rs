use foundation::{AnalysisId, LayerId};
use serde::{Deserialize, Serialize};

/// Which entity a service-reported error belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ErrorScope {
    Layer {
        #[serde(rename = "layerId")]
        layer_id: LayerId,
    },
    Analysis {
        #[serde(rename = "analysisId")]
        analysis_id: AnalysisId,
    },
    #[serde(rename = "none")]
    Unscoped,
}

/// An error reported by the map service for one instantiation attempt.
///
/// This is data, not a software fault: it is routed onto the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    #[serde(flatten)]
    pub scope: ErrorScope,
    pub message: String,
}

impl ServiceError {
    pub fn layer(layer_id: impl Into<LayerId>, message: impl Into<String>) -> Self {
        Self {
            scope: ErrorScope::Layer {
                layer_id: layer_id.into(),
            },
            message: message.into(),
        }
    }

    pub fn analysis(analysis_id: impl Into<AnalysisId>, message: impl Into<String>) -> Self {
        Self {
            scope: ErrorScope::Analysis {
                analysis_id: analysis_id.into(),
            },
            message: message.into(),
        }
    }

    pub fn unscoped(message: impl Into<String>) -> Self {
        Self {
            scope: ErrorScope::Unscoped,
            message: message.into(),
        }
    }

    pub fn is_layer_error(&self) -> bool {
        matches!(self.scope, ErrorScope::Layer { .. })
    }

    pub fn is_analysis_error(&self) -> bool {
        matches!(self.scope, ErrorScope::Analysis { .. })
    }

    /// Parses a JSON array of errors as handed over by the transport.
    pub fn batch_from_json(json: &str) -> Result<Vec<ServiceError>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            ErrorScope::Layer { layer_id } => write!(f, "layer {layer_id}: {}", self.message),
            ErrorScope::Analysis { analysis_id } => {
                write!(f, "analysis {analysis_id}: {}", self.message)
            }
            ErrorScope::Unscoped => f.write_str(&self.message),
        }
    }
}

/// A malformed instantiation result. Fatal to the synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    MissingSubdomains,
    MissingBaseUrl,
    UnknownLayerIndex(usize),
}

impl std::fmt::Display for DerivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivationError::MissingSubdomains => {
                write!(f, "instantiation result has no subdomain list")
            }
            DerivationError::MissingBaseUrl => write!(f, "instantiation result has no base url"),
            DerivationError::UnknownLayerIndex(index) => {
                write!(f, "instantiation result has no layer at index {index}")
            }
        }
    }
}

impl std::error::Error for DerivationError {}
