pub mod dataview;

pub use dataview::*;
