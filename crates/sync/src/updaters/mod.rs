//! Entity updaters.
//!
//! Each updater writes every derived field of an entity first and then
//! performs exactly one lifecycle transition, published on the event bus.

pub mod analysis;
pub mod dataviews;
pub mod layers;

pub use self::analysis::update_analysis_nodes;
pub use self::dataviews::update_dataviews;
pub use self::layers::{LayerUpdateSummary, update_layer_group, update_layers};
