//! Waypoint actions
//!
//! Action definitions, the per-execution registry, dispatch and the built-in
//! action set.

pub mod builtin;
pub mod context;
pub mod defaults;
pub mod definition;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod schema;
pub mod variables;

pub use context::ActionContext;
pub use defaults::{default_registry, Capabilities};
pub use definition::ActionDefinition;
pub use dispatcher::ActionDispatcher;
pub use error::{ActionError, RegistryError};
pub use registry::{ActionRegistry, CompletionVariant};
pub use variables::{substitute, substitute_text};
