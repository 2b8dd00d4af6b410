//! Shared types and reconciliation logic for the dispatch back-office
//!
//! This crate contains the models and the dispatch/settlement engines shared
//! between the backend gateway and the browser (via WASM). Nothing here
//! performs I/O.

pub mod balance;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod settlement;
pub mod types;
pub mod validation;

pub use balance::*;
pub use dispatch::*;
pub use error::*;
pub use models::*;
pub use settlement::*;
pub use types::*;
pub use validation::*;
