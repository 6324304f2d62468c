//! Waypoint runtime
//!
//! Task supervision and the perceive → decide → act execution loop.

pub mod config;
pub mod control;
pub mod debug;
pub mod error;
mod execution;
pub mod messages;
pub mod metrics;
pub mod options;
pub mod recorder;
pub mod retry;
pub mod supervisor;
pub mod task;

#[cfg(test)]
mod test_support;

pub use config::{load_runtime_config, RuntimeConfig};
pub use control::{TaskControl, TaskFailure};
pub use error::RuntimeError;
pub use options::{TaskObserver, TaskOptions};
pub use recorder::{StepEvent, StepRecorder};
pub use supervisor::{Supervisor, SupervisorBuilder};
pub use task::{TaskInfo, TaskState};
