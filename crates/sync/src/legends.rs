//! Legend metadata mapping.
//!
//! Each legend kind is decoded on its own so one malformed block never blocks
//! the others. A kind the service did not publish is not an error: it maps to
//! an empty payload.

use layers::{
    BubbleLegendData, BubblePayload, CategoryLegendData, CategoryPayload, ChoroplethLegendData,
    ChoroplethPayload, LegendKind,
};
use mapservice::MapInstantiationResult;
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub struct LegendDecodeError {
    pub kind: LegendKind,
    pub remote_index: usize,
    pub source: serde_json::Error,
}

impl std::fmt::Display for LegendDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed {} legend for remote layer {}: {}",
            self.kind.as_str(),
            self.remote_index,
            self.source
        )
    }
}

impl std::error::Error for LegendDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decoded payloads for the three legend kinds of one remote layer.
#[derive(Debug)]
pub struct LegendPayloads {
    pub bubble: Result<BubblePayload, LegendDecodeError>,
    pub category: Result<CategoryPayload, LegendDecodeError>,
    pub choropleth: Result<ChoroplethPayload, LegendDecodeError>,
}

pub fn bubble_payload(
    result: &MapInstantiationResult,
    remote_index: usize,
) -> Result<BubblePayload, LegendDecodeError> {
    let block = result
        .legend_metadata(remote_index)
        .and_then(|m| m.bubble.as_ref());
    decode::<BubbleLegendData>(block, LegendKind::Bubble, remote_index).map(BubblePayload::from)
}

pub fn category_payload(
    result: &MapInstantiationResult,
    remote_index: usize,
) -> Result<CategoryPayload, LegendDecodeError> {
    let block = result
        .legend_metadata(remote_index)
        .and_then(|m| m.category.as_ref());
    decode::<CategoryLegendData>(block, LegendKind::Category, remote_index)
        .map(CategoryPayload::from)
}

pub fn choropleth_payload(
    result: &MapInstantiationResult,
    remote_index: usize,
) -> Result<ChoroplethPayload, LegendDecodeError> {
    let block = result
        .legend_metadata(remote_index)
        .and_then(|m| m.choropleth.as_ref());
    decode::<ChoroplethLegendData>(block, LegendKind::Choropleth, remote_index)
        .map(ChoroplethPayload::from)
}

pub fn legend_payloads(result: &MapInstantiationResult, remote_index: usize) -> LegendPayloads {
    LegendPayloads {
        bubble: bubble_payload(result, remote_index),
        category: category_payload(result, remote_index),
        choropleth: choropleth_payload(result, remote_index),
    }
}

fn decode<T: DeserializeOwned>(
    block: Option<&serde_json::Value>,
    kind: LegendKind,
    remote_index: usize,
) -> Result<Option<T>, LegendDecodeError> {
    match block {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|source| LegendDecodeError {
                kind,
                remote_index,
                source,
            }),
    }
}
