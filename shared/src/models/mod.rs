//! Domain models for the dispatch and settlement flow

mod asset;
mod daily_load;
mod order;
mod seller;

pub use asset::*;
pub use daily_load::*;
pub use order::*;
pub use seller::*;
