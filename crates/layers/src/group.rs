use serde::Serialize;

/// URL templates for every raster-tile layer of the current instantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerGroupUrls {
    /// One png template per subdomain; `{layerIndexes}` is left for the renderer.
    pub tiles: Vec<String>,
    /// Per raster-tile layer, one grid template per subdomain.
    pub grids: Vec<Vec<String>>,
    /// Per raster-tile layer, one attributes base url.
    pub attributes: Vec<String>,
}

/// Aggregate the renderer draws raster-tile layers through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerGroup {
    indexes_in_service: Vec<usize>,
    urls: LayerGroupUrls,
}

impl LayerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all derived state at once.
    pub fn set(&mut self, indexes_in_service: Vec<usize>, urls: LayerGroupUrls) {
        self.indexes_in_service = indexes_in_service;
        self.urls = urls;
    }

    pub fn indexes_in_service(&self) -> &[usize] {
        &self.indexes_in_service
    }

    pub fn urls(&self) -> &LayerGroupUrls {
        &self.urls
    }

    pub fn tile_url_templates(&self) -> &[String] {
        &self.urls.tiles
    }

    pub fn grid_url_templates(&self) -> &[Vec<String>] {
        &self.urls.grids
    }

    pub fn attributes_base_urls(&self) -> &[String] {
        &self.urls.attributes
    }

    pub fn has_tile_urls(&self) -> bool {
        !self.urls.tiles.is_empty()
    }

    /// Attributes url of one feature of the `local_index`-th raster-tile layer.
    pub fn attributes_url(&self, local_index: usize, feature_id: u64) -> Option<String> {
        self.urls
            .attributes
            .get(local_index)
            .map(|base| format!("{base}/{feature_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerGroup, LayerGroupUrls};

    #[test]
    fn starts_without_urls() {
        let group = LayerGroup::new();
        assert!(!group.has_tile_urls());
        assert!(group.indexes_in_service().is_empty());
    }

    #[test]
    fn attributes_url_appends_feature_id() {
        let mut group = LayerGroup::new();
        group.set(
            vec![3],
            LayerGroupUrls {
                tiles: vec!["https://x/{layerIndexes}/{z}/{x}/{y}.png".into()],
                grids: vec![vec!["https://x/3/{z}/{x}/{y}.grid.json".into()]],
                attributes: vec!["https://x/3/attributes".into()],
            },
        );
        assert_eq!(
            group.attributes_url(0, 17).as_deref(),
            Some("https://x/3/attributes/17")
        );
        assert_eq!(group.attributes_url(1, 17), None);
    }
}
