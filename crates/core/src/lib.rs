//! Waypoint core types and collaborator contracts.
//!
//! Everything the execution engine needs from the outside world is expressed
//! here as a trait: perception capture, reasoning, and surface automation.

pub mod automation;
pub mod error;
pub mod metrics;
pub mod perception;
pub mod reasoning;
pub mod types;

pub use automation::{AutomationHandle, ScrollDirection};
pub use error::ProviderError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use perception::{PerceptionProvider, PerceptionSnapshot};
pub use reasoning::{Message, ReasoningProvider, ReasoningRequest, ReasoningResponse, Role};
pub use types::*;
