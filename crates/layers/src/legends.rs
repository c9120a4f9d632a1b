use foundation::LegendState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendKind {
    Bubble,
    Category,
    Choropleth,
}

impl LegendKind {
    pub const ALL: [LegendKind; 3] = [
        LegendKind::Bubble,
        LegendKind::Category,
        LegendKind::Choropleth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegendKind::Bubble => "bubble",
            LegendKind::Category => "category",
            LegendKind::Choropleth => "choropleth",
        }
    }
}

/// Bubble legend block as published by the map service.
///
/// Every field is optional: a partial block still decodes, and only a block
/// of the wrong shape counts as malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BubbleLegendData {
    #[serde(default)]
    pub bubbles: Option<Vec<f64>>,
    #[serde(default)]
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryLegendData {
    #[serde(default)]
    pub categories: Option<Vec<CategoryEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethLegendData {
    #[serde(default)]
    pub colors: Option<Vec<ColorStop>>,
}

/// Bubble legend payload; both fields are `None` when no bubble legend is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BubblePayload {
    pub bubbles: Option<Vec<f64>>,
    pub avg: Option<f64>,
}

impl From<Option<BubbleLegendData>> for BubblePayload {
    fn from(data: Option<BubbleLegendData>) -> Self {
        let data = data.unwrap_or_default();
        Self {
            bubbles: data.bubbles,
            avg: data.avg,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub categories: Option<Vec<CategoryEntry>>,
}

impl From<Option<CategoryLegendData>> for CategoryPayload {
    fn from(data: Option<CategoryLegendData>) -> Self {
        Self {
            categories: data.and_then(|d| d.categories),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChoroplethPayload {
    pub colors: Option<Vec<ColorStop>>,
}

impl From<Option<ChoroplethLegendData>> for ChoroplethPayload {
    fn from(data: Option<ChoroplethLegendData>) -> Self {
        Self {
            colors: data.and_then(|d| d.colors),
        }
    }
}

/// One legend of a layer: a kind-specific payload plus its own state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend<P> {
    payload: P,
    state: LegendState,
}

impl<P: Default> Legend<P> {
    pub fn new() -> Self {
        Self {
            payload: P::default(),
            state: LegendState::Pending,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn state(&self) -> LegendState {
        self.state
    }

    /// Replaces the payload and settles to `Success`.
    pub fn apply(&mut self, payload: P) {
        self.payload = payload;
        self.state = LegendState::Success;
    }

    /// Drops the payload; the upstream block for this kind could not be read.
    pub fn fail(&mut self) {
        self.payload = P::default();
        self.state = LegendState::Error;
    }

    /// Marks the legend errored while keeping whatever payload it has.
    pub fn set_error(&mut self) {
        self.state = LegendState::Error;
    }
}

/// The three legends owned by a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legends {
    pub bubble: Legend<BubblePayload>,
    pub category: Legend<CategoryPayload>,
    pub choropleth: Legend<ChoroplethPayload>,
}

impl Legends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, kind: LegendKind) -> LegendState {
        match kind {
            LegendKind::Bubble => self.bubble.state(),
            LegendKind::Category => self.category.state(),
            LegendKind::Choropleth => self.choropleth.state(),
        }
    }

    pub fn set_error(&mut self, kind: LegendKind) {
        match kind {
            LegendKind::Bubble => self.bubble.set_error(),
            LegendKind::Category => self.category.set_error(),
            LegendKind::Choropleth => self.choropleth.set_error(),
        }
    }

    pub fn set_all_error(&mut self) {
        for kind in LegendKind::ALL {
            self.set_error(kind);
        }
    }
}
