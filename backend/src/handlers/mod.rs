//! HTTP request handlers

pub mod dispatch;
pub mod health;
pub mod ledger;
pub mod settlement;

pub use dispatch::*;
pub use health::*;
pub use ledger::*;
pub use settlement::*;
