pub mod collection;
pub mod node;

pub use collection::*;
pub use node::*;
