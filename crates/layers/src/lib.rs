pub mod collection;
pub mod group;
pub mod layer;
pub mod legends;

pub use collection::*;
pub use group::*;
pub use layer::*;
pub use legends::*;
