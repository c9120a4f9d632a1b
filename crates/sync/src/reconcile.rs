//! Routing of service-reported errors onto the entities that own them.

use analysis::AnalysisCollection;
use layers::LayerCollection;
use mapservice::{ErrorScope, ServiceError};
use runtime::{EntityKind, EventBus, Transition};
use serde::Serialize;
use tracing::{debug, warn};

use crate::vis::VisState;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Errors applied to a layer or analysis node.
    pub routed: usize,
    /// Errors naming an entity the client no longer has.
    pub dropped: usize,
    /// Unscoped errors applied to the visualization.
    pub global: usize,
    /// Layers whose legends were forced into the error state.
    pub legend_layers: usize,
}

/// Routes `errors` in order, then invalidates legends.
///
/// Errors for unknown ids are dropped without touching anything. When at
/// least one error was applied, every legend of every layer is forced into the
/// error state: legend data comes from the same failed server computation.
pub fn reconcile_errors(
    errors: &[ServiceError],
    vis: &mut VisState,
    layers: &mut LayerCollection,
    nodes: &mut AnalysisCollection,
    bus: &mut EventBus,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    for error in errors {
        match &error.scope {
            ErrorScope::Layer { layer_id } => match layers.get_mut(layer_id) {
                Some(layer) => {
                    layer.set_error(error.message.clone());
                    bus.emit(EntityKind::Layer, layer_id.as_str(), Transition::Error);
                    summary.routed += 1;
                }
                None => {
                    debug!(layer = %layer_id, "dropping error for unknown layer");
                    summary.dropped += 1;
                }
            },
            ErrorScope::Analysis { analysis_id } => match nodes.get_mut(analysis_id) {
                Some(node) => {
                    node.set_error(error.message.clone());
                    bus.emit(EntityKind::AnalysisNode, analysis_id.as_str(), Transition::Error);
                    summary.routed += 1;
                }
                None => {
                    debug!(node = %analysis_id, "dropping error for unknown analysis node");
                    summary.dropped += 1;
                }
            },
            ErrorScope::Unscoped => {
                warn!("map instantiation failed: {error}");
                vis.set_error(error.clone());
                bus.emit(EntityKind::Vis, "vis", Transition::Error);
                summary.global += 1;
            }
        }
    }

    if summary.routed + summary.global > 0 {
        for layer in layers.iter_mut() {
            let id = layer.id().clone();
            if let Some(legends) = layer.legends_mut() {
                legends.set_all_error();
                bus.emit(EntityKind::Legend, id.as_str(), Transition::Error);
                summary.legend_layers += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::{ReconcileSummary, reconcile_errors};
    use crate::vis::VisState;
    use analysis::{AnalysisCollection, AnalysisNode};
    use foundation::{AnalysisId, LayerId, LegendState};
    use layers::{LayerCollection, LayerEntity, LegendKind};
    use mapservice::{ProviderType, ServiceError};
    use pretty_assertions::assert_eq;
    use runtime::EventBus;

    struct Fixture {
        vis: VisState,
        layers: LayerCollection,
        nodes: AnalysisCollection,
        bus: EventBus,
    }

    impl Fixture {
        fn new() -> Self {
            let mut layers = LayerCollection::new();
            layers
                .add(LayerEntity::new("l1", ProviderType::RasterTile))
                .unwrap();
            layers
                .add(LayerEntity::new("l2", ProviderType::RasterTile))
                .unwrap();
            layers
                .add(LayerEntity::new("base", ProviderType::Other))
                .unwrap();
            let mut nodes = AnalysisCollection::new();
            nodes.add(AnalysisNode::new("a0", "source")).unwrap();
            Self {
                vis: VisState::new(),
                layers,
                nodes,
                bus: EventBus::new(),
            }
        }

        fn reconcile(&mut self, errors: &[ServiceError]) -> ReconcileSummary {
            reconcile_errors(
                errors,
                &mut self.vis,
                &mut self.layers,
                &mut self.nodes,
                &mut self.bus,
            )
        }

        fn layer(&self, id: &str) -> &LayerEntity {
            self.layers.get(&LayerId::from(id)).unwrap()
        }
    }

    #[test]
    fn unknown_layer_error_alters_nothing() {
        let mut fx = Fixture::new();
        let before = fx.layers.clone();
        let summary = fx.reconcile(&[ServiceError::layer("gone", "bad sql")]);

        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.legend_layers, 0);
        for (a, b) in before.iter().zip(fx.layers.iter()) {
            assert_eq!(a, b);
        }
        assert!(fx.vis.is_pending());
        assert!(fx.bus.events().is_empty());
    }

    #[test]
    fn layer_error_marks_layer_and_all_its_legends() {
        let mut fx = Fixture::new();
        fx.reconcile(&[ServiceError::layer("l1", "bad cartocss")]);

        let l1 = fx.layer("l1");
        assert!(l1.is_error());
        assert_eq!(l1.error(), Some("bad cartocss"));
        for kind in LegendKind::ALL {
            assert_eq!(l1.legends().unwrap().state(kind), LegendState::Error);
        }
        assert!(fx.layer("l2").is_pending());
        assert!(!fx.vis.is_error());
    }

    #[test]
    fn legends_of_every_layer_are_invalidated() {
        let mut fx = Fixture::new();
        let summary = fx.reconcile(&[ServiceError::analysis("a0", "timeout")]);

        assert_eq!(summary.legend_layers, 2);
        let l2 = fx.layer("l2").legends().unwrap();
        assert_eq!(l2.bubble.state(), LegendState::Error);
        assert!(fx.layer("base").legends().is_none());
        assert!(
            fx.nodes
                .get(&AnalysisId::from("a0"))
                .unwrap()
                .is_error()
        );
    }

    #[test]
    fn unscoped_errors_go_to_the_visualization() {
        let mut fx = Fixture::new();
        let quota = ServiceError::unscoped("quota exceeded");
        let summary = fx.reconcile(&[
            ServiceError::analysis("missing", "x"),
            quota.clone(),
        ]);

        assert_eq!(
            summary,
            ReconcileSummary {
                routed: 0,
                dropped: 1,
                global: 1,
                legend_layers: 2,
            }
        );
        assert!(fx.vis.is_error());
        assert_eq!(fx.vis.error(), Some(&quota));
    }
}
