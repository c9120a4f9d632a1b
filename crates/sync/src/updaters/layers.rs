use layers::{LayerCollection, LayerEntity, LayerGroup, Legends};
use mapservice::{MapInstantiationResult, ProviderType};
use runtime::{EntityKind, EventBus, Transition};
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::legends::legend_payloads;
use crate::urls::{layer_group_urls, time_series_tile_url_templates};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LayerUpdateSummary {
    pub layers: usize,
    pub malformed_legends: usize,
}

/// Replaces the layer-group aggregate's indexes and url templates.
pub fn update_layer_group(
    group: &mut LayerGroup,
    result: &MapInstantiationResult,
    bus: &mut EventBus,
) -> Result<(), SyncError> {
    let urls = layer_group_urls(result)?;
    group.set(result.layer_indexes_by_type(ProviderType::RasterTile), urls);
    bus.emit(EntityKind::LayerGroup, "layer_group", Transition::Updated);
    Ok(())
}

/// Updates raster-tile layers, then time-series layers, each in local order.
///
/// The Nth local layer of a provider type takes the Nth remote index of the
/// same type.
pub fn update_layers(
    layers: &mut LayerCollection,
    result: &MapInstantiationResult,
    bus: &mut EventBus,
) -> Result<LayerUpdateSummary, SyncError> {
    let mut summary = LayerUpdateSummary::default();

    let raster_indexes = result.layer_indexes_by_type(ProviderType::RasterTile);
    for (local_index, layer) in layers.of_type_mut(ProviderType::RasterTile).enumerate() {
        let remote_index = remote_index_for(layer, &raster_indexes, local_index)?;
        update_layer(layer, result, remote_index, &mut summary, bus)?;
    }

    let time_series_indexes = result.layer_indexes_by_type(ProviderType::TimeSeries);
    if layers.of_type(ProviderType::TimeSeries).next().is_some() {
        let templates = time_series_tile_url_templates(result)?;
        for (local_index, layer) in layers.of_type_mut(ProviderType::TimeSeries).enumerate() {
            let remote_index = remote_index_for(layer, &time_series_indexes, local_index)?;
            layer.set_tile_url_templates(templates.clone());
            update_layer(layer, result, remote_index, &mut summary, bus)?;
        }
    }

    Ok(summary)
}

fn remote_index_for(
    layer: &LayerEntity,
    remote_indexes: &[usize],
    local_index: usize,
) -> Result<usize, SyncError> {
    remote_indexes
        .get(local_index)
        .copied()
        .ok_or_else(|| SyncError::MissingRemoteLayer {
            layer_id: layer.id().clone(),
            provider: layer.provider(),
            local_index,
        })
}

fn update_layer(
    layer: &mut LayerEntity,
    result: &MapInstantiationResult,
    remote_index: usize,
    summary: &mut LayerUpdateSummary,
    bus: &mut EventBus,
) -> Result<(), SyncError> {
    layer.set_meta(result.layer_metadata(remote_index)?.clone());
    if let Some(legends) = layer.legends_mut() {
        summary.malformed_legends += update_legends(legends, result, remote_index);
    }

    layer.set_ok();
    debug!(layer = %layer.id(), remote_index, "layer synchronized");
    bus.emit(EntityKind::Layer, layer.id().as_str(), Transition::Ok);
    summary.layers += 1;
    Ok(())
}

/// Returns how many legend kinds could not be decoded.
fn update_legends(legends: &mut Legends, result: &MapInstantiationResult, remote_index: usize) -> usize {
    let payloads = legend_payloads(result, remote_index);
    let mut malformed = 0;

    match payloads.bubble {
        Ok(payload) => legends.bubble.apply(payload),
        Err(err) => {
            warn!("{err}");
            legends.bubble.fail();
            malformed += 1;
        }
    }
    match payloads.category {
        Ok(payload) => legends.category.apply(payload),
        Err(err) => {
            warn!("{err}");
            legends.category.fail();
            malformed += 1;
        }
    }
    match payloads.choropleth {
        Ok(payload) => legends.choropleth.apply(payload),
        Err(err) => {
            warn!("{err}");
            legends.choropleth.fail();
            malformed += 1;
        }
    }

    malformed
}
