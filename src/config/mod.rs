//! Persisted configuration
//!
//! - **storage**: local-storage backends (file-backed and in-memory)
//! - **store**: typed JSON store per storage key with subscriptions
//! - **simulator**: simulator kinds and their branding config

pub mod simulator;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use simulator::{open_simulator_store, SimulatorConfig, SimulatorKind};
pub use storage::{FileStorage, StorageBackend};

#[cfg(test)]
pub use storage::MemoryStorage;
pub use store::ConfigStore;
