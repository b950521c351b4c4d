pub use classifier::*;
pub use enrich::*;
pub use fetch::*;

pub mod classifier;
pub mod enrich;
pub mod fetch;
