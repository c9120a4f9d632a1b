use analysis::AnalysisCollection;
use dataviews::DataviewCollection;
use layers::{LayerCollection, LayerGroup};
use mapservice::{MapInstantiationResult, ProviderType, ServiceError};
use runtime::metrics::names;
use runtime::{EntityKind, Event, EventBus, Metrics, Transition};
use serde::Serialize;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::reconcile::{ReconcileSummary, reconcile_errors};
use crate::updaters::{update_analysis_nodes, update_dataviews, update_layer_group, update_layers};
use crate::vis::VisState;

/// Every collaborator a pass writes to, borrowed for the duration of one call.
pub struct SyncTargets<'a> {
    pub vis: &'a mut VisState,
    pub layer_group: &'a mut LayerGroup,
    pub layers: &'a mut LayerCollection,
    pub dataviews: &'a mut DataviewCollection,
    pub analysis: &'a mut AnalysisCollection,
}

/// Owns all entities of one map session.
#[derive(Debug, Default, Serialize)]
pub struct MapSession {
    pub vis: VisState,
    pub layer_group: LayerGroup,
    pub layers: LayerCollection,
    pub dataviews: DataviewCollection,
    pub analysis: AnalysisCollection,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&mut self) -> SyncTargets<'_> {
        SyncTargets {
            vis: &mut self.vis,
            layer_group: &mut self.layer_group,
            layers: &mut self.layers,
            dataviews: &mut self.dataviews,
            analysis: &mut self.analysis,
        }
    }
}

/// Reconciles map-service outcomes onto client entities.
///
/// Callers invoke exactly one of [`synchronize`](Self::synchronize) (success)
/// or [`report_errors`](Self::report_errors) (failure) per service round trip,
/// and only for the latest in-flight request. Nothing is cached between calls.
///
/// Published events are kept for the last
/// [`DEFAULT_RETAINED_PASSES`](runtime::DEFAULT_RETAINED_PASSES) passes;
/// consumers that want all of them call [`drain_events`](Self::drain_events)
/// after every pass.
#[derive(Debug, Default)]
pub struct ModelSync {
    config: SyncConfig,
    bus: EventBus,
    metrics: Metrics,
}

impl ModelSync {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            bus: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Applies a fresh instantiation result to every entity.
    ///
    /// Order: layer group, layers, dataviews, analysis nodes, then the
    /// visualization is marked ok. On error the pass stops where it failed;
    /// entities already updated keep their new state and the visualization is
    /// left as it was.
    pub fn synchronize(
        &mut self,
        targets: &mut SyncTargets<'_>,
        result: &MapInstantiationResult,
        source_id: Option<&str>,
        force_fetch: bool,
    ) -> Result<(), SyncError> {
        let pass = self.bus.begin_pass();
        self.metrics.inc_counter(names::SYNC_PASSES, 1);
        self.metrics
            .set_gauge(names::REMOTE_LAYERS, result.layers.len() as i64);

        update_layer_group(targets.layer_group, result, &mut self.bus)?;

        let layer_summary = update_layers(targets.layers, result, &mut self.bus)?;
        self.metrics
            .inc_counter(names::SYNC_LAYERS, layer_summary.layers as u64);
        self.metrics
            .inc_counter(names::LEGENDS_MALFORMED, layer_summary.malformed_legends as u64);

        let dataviews = update_dataviews(
            targets.dataviews,
            result,
            self.config.protocol,
            source_id,
            force_fetch,
            &mut self.bus,
        );
        self.metrics
            .inc_counter(names::SYNC_DATAVIEWS, dataviews as u64);

        let nodes = update_analysis_nodes(
            targets.analysis,
            result,
            self.config.protocol,
            &mut self.bus,
        );
        self.metrics
            .inc_counter(names::SYNC_ANALYSIS_NODES, nodes as u64);

        targets.vis.set_ok();
        self.bus.emit(EntityKind::Vis, "vis", Transition::Ok);

        info!(
            pass,
            raster_layers = result.layer_indexes_by_type(ProviderType::RasterTile).len(),
            layers = layer_summary.layers,
            dataviews,
            nodes,
            "map synchronized"
        );
        Ok(())
    }

    /// Routes a batch of service errors. Independent of any `synchronize` call.
    pub fn report_errors(
        &mut self,
        targets: &mut SyncTargets<'_>,
        errors: &[ServiceError],
    ) -> ReconcileSummary {
        self.bus.begin_pass();
        let summary = reconcile_errors(
            errors,
            targets.vis,
            targets.layers,
            targets.analysis,
            &mut self.bus,
        );

        self.metrics
            .inc_counter(names::ERRORS_REPORTED, errors.len() as u64);
        self.metrics
            .inc_counter(names::ERRORS_DROPPED, summary.dropped as u64);
        self.metrics
            .inc_counter(names::ERRORS_GLOBAL, summary.global as u64);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::{MapSession, ModelSync};
    use crate::config::SyncConfig;
    use crate::error::SyncError;
    use analysis::AnalysisNode;
    use dataviews::{DataviewEntity, RefreshTrigger};
    use foundation::{AnalysisId, DataviewId, LayerId, LegendState, Protocol};
    use layers::LayerEntity;
    use mapservice::{DerivationError, MapInstantiationResult, ProviderType, ServiceError};
    use pretty_assertions::assert_eq;
    use runtime::metrics::names;
    use runtime::{EntityKind, Transition};
    use serde_json::json;

    const INSTANTIATION: &str = include_str!("../fixtures/instantiation.json");

    fn session() -> MapSession {
        let mut session = MapSession::new();
        session
            .layers
            .add(LayerEntity::new("basemap", ProviderType::Other))
            .unwrap();
        session
            .layers
            .add(LayerEntity::new("layer1", ProviderType::RasterTile))
            .unwrap();
        session
            .layers
            .add(LayerEntity::new("layer2", ProviderType::RasterTile))
            .unwrap();
        session
            .layers
            .add(LayerEntity::new("torque1", ProviderType::TimeSeries))
            .unwrap();
        session.dataviews.add(DataviewEntity::new("dv1")).unwrap();
        session.dataviews.add(DataviewEntity::new("dv2")).unwrap();
        session
            .analysis
            .add(AnalysisNode::new("a0", "source").with_param("query", json!("SELECT * FROM t")))
            .unwrap();
        session
            .analysis
            .add(AnalysisNode::new("a1", "buffer").with_param("buffer", json!(300)))
            .unwrap();
        session
    }

    fn result() -> MapInstantiationResult {
        MapInstantiationResult::from_json(INSTANTIATION).unwrap()
    }

    fn sync_once(sync: &mut ModelSync, session: &mut MapSession) {
        sync.synchronize(&mut session.targets(), &result(), Some("layer2"), true)
            .unwrap();
    }

    #[test]
    fn full_pass_updates_everything_and_marks_vis_ok() {
        let mut session = session();
        let mut sync = ModelSync::new(SyncConfig::new(Protocol::Https));
        sync_once(&mut sync, &mut session);

        assert!(session.vis.is_ok());
        assert_eq!(session.layer_group.indexes_in_service(), &[3, 5]);
        assert_eq!(
            session.layer_group.grid_url_templates()[0],
            vec![
                "https://a.cdn.example.com/api/v1/map/abc123/3/{z}/{x}/{y}.grid.json".to_string(),
                "https://b.cdn.example.com/api/v1/map/abc123/3/{z}/{x}/{y}.grid.json".to_string(),
            ]
        );
        assert_eq!(
            session.layer_group.attributes_base_urls(),
            &[
                "https://x.example.com/api/v1/map/abc123/3/attributes".to_string(),
                "https://x.example.com/api/v1/map/abc123/5/attributes".to_string(),
            ]
        );

        let layer1 = session.layers.get(&LayerId::from("layer1")).unwrap();
        assert!(layer1.is_ok());
        assert_eq!(layer1.estimated_feature_count(), Some(1200));
        assert_eq!(
            layer1.legends().unwrap().bubble.payload().avg,
            Some(12.5)
        );
        let torque = session.layers.get(&LayerId::from("torque1")).unwrap();
        assert_eq!(
            torque.tile_url_templates(),
            &["https://x.example.com/api/v1/map/abc123/1/{z}/{x}/{y}.json.torque".to_string()]
        );
        assert!(session.layers.get(&LayerId::from("basemap")).unwrap().is_pending());

        let dv1 = session.dataviews.get(&DataviewId::from("dv1")).unwrap();
        assert_eq!(dv1.url(), Some("https://x.example.com/dv1"));
        assert_eq!(
            dv1.last_refresh(),
            Some(&RefreshTrigger {
                source_id: Some("layer2".into()),
                force_fetch: true,
            })
        );
        assert_eq!(
            session.dataviews.get(&DataviewId::from("dv2")).unwrap(),
            &DataviewEntity::new("dv2")
        );

        let a1 = session.analysis.get(&AnalysisId::from("a1")).unwrap();
        assert_eq!(a1.param("buffer"), Some(&json!(300)));
        assert!(a1.is_ok());
    }

    #[test]
    fn vis_ok_is_published_last() {
        let mut session = session();
        let mut sync = ModelSync::default();
        sync_once(&mut sync, &mut session);

        let events = sync.events();
        assert_eq!(events.first().map(|e| e.entity), Some(EntityKind::LayerGroup));
        let last = events.last().unwrap();
        assert_eq!((last.entity, last.transition), (EntityKind::Vis, Transition::Ok));
        assert!(events.iter().all(|e| e.pass == 1));
    }

    #[test]
    fn undrained_events_stay_bounded() {
        let mut session = session();
        let mut sync = ModelSync::default();
        let passes = runtime::DEFAULT_RETAINED_PASSES + 3;
        for _ in 0..passes {
            sync_once(&mut sync, &mut session);
        }

        let oldest = sync.events().iter().map(|e| e.pass).min().unwrap();
        assert_eq!(oldest, passes - runtime::DEFAULT_RETAINED_PASSES + 1);
        assert_eq!(sync.drain_events().last().map(|e| e.pass), Some(passes));
        assert!(sync.events().is_empty());
    }

    #[test]
    fn synchronize_is_idempotent() {
        let mut session = session();
        let mut sync = ModelSync::default();
        sync_once(&mut sync, &mut session);
        let first = serde_json::to_value(&session).unwrap();

        sync_once(&mut sync, &mut session);
        let second = serde_json::to_value(&session).unwrap();

        assert_eq!(first, second);
        assert_eq!(sync.metrics().counter(names::SYNC_PASSES), 2);
    }

    #[test]
    fn derivation_error_aborts_before_vis_ok() {
        let mut session = session();
        let mut sync = ModelSync::default();
        let mut broken = result();
        broken.subdomains = None;

        let err = sync
            .synchronize(&mut session.targets(), &broken, None, false)
            .unwrap_err();
        assert_eq!(err, SyncError::Derivation(DerivationError::MissingSubdomains));
        assert!(session.vis.is_pending());
        assert!(session.layers.iter().all(|l| l.is_pending()));
    }

    #[test]
    fn partial_pass_leaves_touched_entities_updated() {
        let mut session = session();
        session
            .layers
            .add(LayerEntity::new("layer3", ProviderType::RasterTile))
            .unwrap();
        let mut sync = ModelSync::default();

        let err = sync
            .synchronize(&mut session.targets(), &result(), None, false)
            .unwrap_err();
        assert!(matches!(err, SyncError::MissingRemoteLayer { .. }));
        assert!(session.layer_group.has_tile_urls());
        assert!(session.layers.get(&LayerId::from("layer1")).unwrap().is_ok());
        assert!(!session.vis.is_ok());
        assert!(session.dataviews.get(&DataviewId::from("dv1")).unwrap().url().is_none());
    }

    #[test]
    fn errors_after_a_successful_pass() {
        let mut session = session();
        let mut sync = ModelSync::default();
        sync_once(&mut sync, &mut session);

        let summary = sync.report_errors(
            &mut session.targets(),
            &[
                ServiceError::layer("layer2", "syntax error in cartocss"),
                ServiceError::layer("removed", "gone"),
            ],
        );
        assert_eq!(summary.routed, 1);
        assert_eq!(summary.dropped, 1);

        let layer2 = session.layers.get(&LayerId::from("layer2")).unwrap();
        assert!(layer2.is_error());
        assert_eq!(layer2.legends().unwrap().choropleth.state(), LegendState::Error);
        let layer1 = session.layers.get(&LayerId::from("layer1")).unwrap();
        assert!(layer1.is_ok());
        assert_eq!(layer1.legends().unwrap().bubble.state(), LegendState::Error);
        assert!(session.vis.is_ok());

        assert_eq!(sync.metrics().counter(names::ERRORS_REPORTED), 2);
        assert_eq!(sync.metrics().counter(names::ERRORS_DROPPED), 1);
    }

    #[test]
    fn resync_recovers_from_errors() {
        let mut session = session();
        let mut sync = ModelSync::default();
        sync.report_errors(
            &mut session.targets(),
            &[ServiceError::unscoped("map service unavailable")],
        );
        assert!(session.vis.is_error());

        sync_once(&mut sync, &mut session);
        assert!(session.vis.is_ok());
        assert_eq!(session.vis.error(), None);
        let layer1 = session.layers.get(&LayerId::from("layer1")).unwrap();
        assert_eq!(layer1.legends().unwrap().bubble.state(), LegendState::Success);
    }
}
