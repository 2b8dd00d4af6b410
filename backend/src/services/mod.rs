//! Business logic services for the dispatch gateway

pub mod dispatch;
pub mod ledger;
pub mod settlement;

pub use dispatch::DispatchService;
pub use ledger::LedgerService;
pub use settlement::{CloseGuard, SettlementService};
