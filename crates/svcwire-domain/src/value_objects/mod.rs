//! Value objects shared by every layer

pub mod instance;
pub mod scope;

pub use instance::{ContextValue, ErasedValue, RootContextValue, ServiceInstance};
pub use scope::{InitializationStrategy, Plugin, Root, ScopeMarker, ServiceScope};
