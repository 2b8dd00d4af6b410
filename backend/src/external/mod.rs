//! External API integrations

pub mod backoffice;

pub use backoffice::{BackofficeApi, RestBackofficeClient};
