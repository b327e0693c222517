//! Service resolution
//!
//! The [`ServiceRegistry`] engine and the bootstrap that assembles it from
//! configuration and registered factories.

pub mod bootstrap;
pub mod registry;

pub use bootstrap::{RegistryInitializer, init_registry};
pub use registry::ServiceRegistry;
