use analysis::{AnalysisCollection, NodeAttributes};
use foundation::Protocol;
use mapservice::MapInstantiationResult;
use runtime::{EntityKind, EventBus, Transition};
use tracing::debug;

/// Propagates status/url/query (and errors) onto analysis nodes.
///
/// Attributes named like one of the node's own parameters are never
/// overwritten: local parameters win over server echoes. Returns the number of
/// nodes updated.
pub fn update_analysis_nodes(
    nodes: &mut AnalysisCollection,
    result: &MapInstantiationResult,
    protocol: Protocol,
    bus: &mut EventBus,
) -> usize {
    let mut updated = 0;
    for node in nodes.iter_mut() {
        let Some(meta) = result.analysis_node_metadata(node.id()) else {
            continue;
        };

        let attrs = NodeAttributes {
            status: Some(meta.status),
            url: Some(meta.url.resolve(protocol).to_string()),
            query: Some(meta.query.clone()),
        }
        .omit(node.param_names());

        node.set(attrs);
        let transition = match &meta.error_message {
            Some(message) => {
                node.set_error(message.clone());
                Transition::Error
            }
            None => {
                node.set_ok();
                Transition::Ok
            }
        };
        debug!(node = %node.id(), ?transition, "analysis node synchronized");
        bus.emit(EntityKind::AnalysisNode, node.id().as_str(), transition);
        updated += 1;
    }
    updated
}
