//! URL template derivation.
//!
//! Pure functions from an instantiation result to the url templates the
//! renderer and the feature-attribute fetcher consume. `{z}/{x}/{y}` and
//! `{layerIndexes}` are placeholders resolved downstream, never here.

use layers::LayerGroupUrls;
use mapservice::{DerivationError, MapInstantiationResult, ProviderType};

/// One png template per supported subdomain.
pub fn tile_url_templates(result: &MapInstantiationResult) -> Result<Vec<String>, DerivationError> {
    let mut templates = Vec::new();
    for subdomain in result.supported_subdomains()? {
        let base = result.base_url(Some(subdomain))?;
        templates.push(format!("{base}/{{layerIndexes}}/{{z}}/{{x}}/{{y}}.png"));
    }
    Ok(templates)
}

/// For each raster-tile layer, one grid template per supported subdomain.
pub fn grid_url_templates(
    result: &MapInstantiationResult,
) -> Result<Vec<Vec<String>>, DerivationError> {
    let indexes = result.layer_indexes_by_type(ProviderType::RasterTile);
    if indexes.is_empty() {
        return Ok(Vec::new());
    }

    let subdomains = result.supported_subdomains()?;
    let mut templates = Vec::with_capacity(indexes.len());
    for index in indexes {
        let mut layer_templates = Vec::with_capacity(subdomains.len());
        for subdomain in subdomains {
            let base = result.base_url(Some(subdomain))?;
            layer_templates.push(format!("{base}/{index}/{{z}}/{{x}}/{{y}}.grid.json"));
        }
        templates.push(layer_templates);
    }
    Ok(templates)
}

/// One attributes base url per raster-tile layer. Not subdomain-sharded.
pub fn attributes_base_urls(
    result: &MapInstantiationResult,
) -> Result<Vec<String>, DerivationError> {
    let indexes = result.layer_indexes_by_type(ProviderType::RasterTile);
    if indexes.is_empty() {
        return Ok(Vec::new());
    }

    let base = result.base_url(None)?;
    Ok(indexes
        .into_iter()
        .map(|index| format!("{base}/{index}/attributes"))
        .collect())
}

/// A single template covering every time-series layer, or nothing when there
/// are none. Time-series layers are fetched as one combined request.
pub fn time_series_tile_url_templates(
    result: &MapInstantiationResult,
) -> Result<Vec<String>, DerivationError> {
    let indexes = result.layer_indexes_by_type(ProviderType::TimeSeries);
    if indexes.is_empty() {
        return Ok(Vec::new());
    }

    let base = result.base_url(None)?;
    let joined = indexes
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Ok(vec![format!("{base}/{joined}/{{z}}/{{x}}/{{y}}.json.torque")])
}

pub fn layer_group_urls(result: &MapInstantiationResult) -> Result<LayerGroupUrls, DerivationError> {
    Ok(LayerGroupUrls {
        tiles: tile_url_templates(result)?,
        grids: grid_url_templates(result)?,
        attributes: attributes_base_urls(result)?,
    })
}
