//! Building a [`MapSession`] from a JSON description of the client's entities.

use std::collections::BTreeMap;

use analysis::{AnalysisCollectionError, AnalysisNode};
use dataviews::{DataviewCollectionError, DataviewEntity};
use foundation::{AnalysisId, DataviewId, LayerId};
use layers::{LayerCollectionError, LayerEntity};
use mapservice::ProviderType;
use serde::Deserialize;
use sync::MapSession;

#[derive(Debug, Clone, Deserialize)]
pub struct LayerDescription {
    pub id: LayerId,
    #[serde(rename = "type")]
    pub provider: ProviderType,
    #[serde(default = "default_legends")]
    pub legends: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

fn default_legends() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub id: AnalysisId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Client entities, in local order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitiesDescription {
    #[serde(default)]
    pub layers: Vec<LayerDescription>,
    #[serde(default)]
    pub dataviews: Vec<DataviewId>,
    #[serde(default)]
    pub analyses: Vec<NodeDescription>,
}

#[derive(Debug)]
pub enum DescriptionError {
    Json(serde_json::Error),
    Layer(LayerCollectionError),
    Dataview(DataviewCollectionError),
    Analysis(AnalysisCollectionError),
}

impl std::fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptionError::Json(e) => write!(f, "invalid entities description: {e}"),
            DescriptionError::Layer(e) => write!(f, "{e}"),
            DescriptionError::Dataview(e) => write!(f, "{e}"),
            DescriptionError::Analysis(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DescriptionError {}

impl EntitiesDescription {
    pub fn from_json(json: &str) -> Result<Self, DescriptionError> {
        serde_json::from_str(json).map_err(DescriptionError::Json)
    }

    pub fn build_session(&self) -> Result<MapSession, DescriptionError> {
        let mut session = MapSession::new();

        for desc in &self.layers {
            let mut layer = LayerEntity::new(desc.id.clone(), desc.provider);
            if !desc.legends {
                layer = layer.without_legends();
            }
            // Reload requests are irrelevant while composing the initial state.
            for (name, value) in &desc.attributes {
                let _ = layer.set_attribute(name.clone(), value.clone());
            }
            session.layers.add(layer).map_err(DescriptionError::Layer)?;
        }

        for id in &self.dataviews {
            session
                .dataviews
                .add(DataviewEntity::new(id.clone()))
                .map_err(DescriptionError::Dataview)?;
        }

        for desc in &self.analyses {
            let mut node = AnalysisNode::new(desc.id.clone(), desc.kind.clone());
            for (name, value) in &desc.params {
                node = node.with_param(name.clone(), value.clone());
            }
            session
                .analysis
                .add(node)
                .map_err(DescriptionError::Analysis)?;
        }

        Ok(session)
    }
}
