//! Shapes consumed from the map service.
//!
//! The map service compiles layer and analysis definitions into a runnable map
//! configuration. This crate models the snapshot it returns after a successful
//! (re)instantiation, plus the errors it reports when instantiation fails.
//! Transport is not handled here: callers hand over already-fetched JSON.

pub mod error;
pub mod instantiation;

pub use error::*;
pub use instantiation::*;
