//! Service layer for the device watcher
//!
//! Services implement one pass: profile selection, device resolution,
//! metric extraction, aggregation, persistence and the orchestrating run.

pub mod aggregator;
pub mod extractor;
pub mod persistence;
pub mod registry;
pub mod resolver;
pub mod watcher;

pub use aggregator::Aggregator;
pub use extractor::MetricExtractor;
pub use persistence::{OutputWriter, StateWrite};
pub use registry::{catalogue, ProfileRegistry};
pub use resolver::DeviceResolver;
pub use watcher::{RunSummary, Watcher};
