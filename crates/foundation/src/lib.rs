pub mod ids;
pub mod lifecycle;
pub mod protocol;

// Foundation crate: identifiers and small shared enums only.
pub use ids::*;
pub use lifecycle::*;
pub use protocol::*;
