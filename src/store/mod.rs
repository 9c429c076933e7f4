//! State store abstraction layer
//!
//! Provides trait-based abstractions over the host's key-value state store,
//! its object metadata and its inter-instance message bus, so the engine can
//! run against an in-memory store in tests and a snapshot file from the CLI.

pub mod memory;
pub mod pattern;
pub mod snapshot;
pub mod traits;
pub mod value;

pub use memory::{MemoryStore, SentMessage};
pub use pattern::Selector;
pub use snapshot::SnapshotStore;
pub use traits::{Host, MessageBus, ObjectMeta, ObjectStore, StateSample, StateStore};
