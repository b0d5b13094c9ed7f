pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::BillsplitError;
pub use crate::core::services::BillsplitService;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::realtime::broadcast::BroadcastHub;
pub use infrastructure::storage::in_memory::InMemoryStorage;

/// The service as wired by the binary.
pub type AppService = BillsplitService<InMemoryStorage, InMemoryLogging, BroadcastHub>;

#[cfg(test)]
mod tests;
