use std::collections::BTreeMap;

use foundation::{AnalysisId, Lifecycle};
use mapservice::AnalysisStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeError {
    pub message: String,
}

/// Server-derived attributes to apply to a node. `None` means "not in the set":
/// the node keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    pub status: Option<AnalysisStatus>,
    pub url: Option<String>,
    pub query: Option<String>,
}

impl NodeAttributes {
    /// Drops every attribute whose name is one of `names`.
    pub fn omit<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            match name {
                "status" => self.status = None,
                "url" => self.url = None,
                "query" => self.query = None,
                _ => {}
            }
        }
        self
    }
}

/// One node of the analysis graph, seen flat.
///
/// `params` are the node's own inputs and are authoritative locally; the
/// status/url/query fields are outputs echoed by the map service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisNode {
    id: AnalysisId,
    kind: String,
    params: BTreeMap<String, serde_json::Value>,
    status: Option<AnalysisStatus>,
    url: Option<String>,
    query: Option<String>,
    error: Option<NodeError>,
    lifecycle: Lifecycle,
}

impl AnalysisNode {
    pub fn new(id: impl Into<AnalysisId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            params: BTreeMap::new(),
            status: None,
            url: None,
            query: None,
            error: None,
            lifecycle: Lifecycle::Pending,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn id(&self) -> &AnalysisId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&serde_json::Value> {
        self.params.get(name)
    }

    /// Looks `name` up the way collaborators see the node: parameters shadow
    /// derived attributes of the same name.
    pub fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        if let Some(value) = self.params.get(name) {
            return Some(value.clone());
        }
        match name {
            "status" => self.status.and_then(|s| serde_json::to_value(s).ok()),
            "url" => self.url.clone().map(serde_json::Value::String),
            "query" => self.query.clone().map(serde_json::Value::String),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<AnalysisStatus> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn error(&self) -> Option<&NodeError> {
        self.error.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ok(&self) -> bool {
        self.lifecycle.is_ok()
    }

    pub fn is_error(&self) -> bool {
        self.lifecycle.is_error()
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    pub fn is_ready(&self) -> bool {
        self.status == Some(AnalysisStatus::Ready)
    }

    /// Writes every attribute present in `attrs`; lifecycle is left alone.
    pub fn set(&mut self, attrs: NodeAttributes) {
        if let Some(status) = attrs.status {
            self.status = Some(status);
        }
        if let Some(url) = attrs.url {
            self.url = Some(url);
        }
        if let Some(query) = attrs.query {
            self.query = Some(query);
        }
    }

    /// Settles to `Ok`, clearing any error from a previous pass.
    pub fn set_ok(&mut self) {
        self.error = None;
        self.lifecycle = Lifecycle::Ok;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(NodeError {
            message: message.into(),
        });
        self.lifecycle = Lifecycle::Error;
    }
}
