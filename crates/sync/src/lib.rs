//! Model synchronization engine.
//!
//! Takes a map-instantiation result (or a batch of service errors) and
//! reconciles it onto the client-side entities: the layer-group aggregate,
//! layers and their legends, dataviews, analysis nodes and the overall
//! visualization state. Single-threaded and synchronous; no I/O.

pub mod config;
pub mod engine;
pub mod error;
pub mod legends;
pub mod reconcile;
pub mod updaters;
pub mod urls;
pub mod vis;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use reconcile::*;
pub use vis::*;
