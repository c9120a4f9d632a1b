use std::collections::BTreeMap;

use foundation::{LayerId, Lifecycle};
use mapservice::ProviderType;
use serde::Serialize;

use crate::legends::Legends;

/// Layer attributes whose change requires the map to be re-instantiated.
pub const RELOAD_TRIGGER_ATTRIBUTES: [&str; 4] = ["sql", "source", "sql_wrap", "cartocss"];

/// Asks the owner of the map to re-instantiate it on behalf of one layer.
///
/// `source_id` is what later reaches the dataview updater as the refresh tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub source_id: LayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntity {
    id: LayerId,
    provider: ProviderType,
    meta: Option<serde_json::Value>,
    tile_url_templates: Vec<String>,
    legends: Option<Legends>,
    lifecycle: Lifecycle,
    error: Option<String>,
    attributes: BTreeMap<String, serde_json::Value>,
    initial_style: Option<String>,
}

impl LayerEntity {
    /// Raster-tile and time-series layers carry legends; other layers don't.
    pub fn new(id: impl Into<LayerId>, provider: ProviderType) -> Self {
        let legends = match provider {
            ProviderType::RasterTile | ProviderType::TimeSeries => Some(Legends::new()),
            ProviderType::Other => None,
        };
        Self {
            id: id.into(),
            provider,
            meta: None,
            tile_url_templates: Vec::new(),
            legends,
            lifecycle: Lifecycle::Pending,
            error: None,
            attributes: BTreeMap::new(),
            initial_style: None,
        }
    }

    pub fn without_legends(mut self) -> Self {
        self.legends = None;
        self
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn provider(&self) -> ProviderType {
        self.provider
    }

    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    pub fn set_meta(&mut self, meta: serde_json::Value) {
        self.meta = Some(meta);
    }

    pub fn tile_url_templates(&self) -> &[String] {
        &self.tile_url_templates
    }

    pub fn set_tile_url_templates(&mut self, templates: Vec<String>) {
        self.tile_url_templates = templates;
    }

    pub fn legends(&self) -> Option<&Legends> {
        self.legends.as_ref()
    }

    pub fn legends_mut(&mut self) -> Option<&mut Legends> {
        self.legends.as_mut()
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

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Settles to `Ok`, clearing any error from a previous pass.
    pub fn set_ok(&mut self) {
        self.error = None;
        self.lifecycle = Lifecycle::Ok;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.lifecycle = Lifecycle::Error;
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Stores a layer attribute.
    ///
    /// Returns a reload request when a reload-trigger attribute actually changed.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<ReloadRequest> {
        let name = name.into();
        if name == "cartocss" && self.initial_style.is_none() {
            self.initial_style = value.as_str().map(str::to_string);
        }

        let previous = self.attributes.insert(name.clone(), value.clone());
        let changed = previous.as_ref() != Some(&value);
        if changed && RELOAD_TRIGGER_ATTRIBUTES.contains(&name.as_str()) {
            Some(ReloadRequest {
                source_id: self.id.clone(),
            })
        } else {
            None
        }
    }

    pub fn initial_style(&self) -> Option<&str> {
        self.initial_style.as_deref()
    }

    /// Puts back the first cartocss this layer was given.
    pub fn restore_cartocss(&mut self) -> Option<ReloadRequest> {
        let style = self.initial_style.clone()?;
        self.set_attribute("cartocss", serde_json::Value::String(style))
    }

    /// `meta.stats.estimatedFeatureCount` from the last synchronization, if any.
    pub fn estimated_feature_count(&self) -> Option<u64> {
        self.meta
            .as_ref()?
            .get("stats")?
            .get("estimatedFeatureCount")?
            .as_u64()
    }
}
