//! Compile-time factory registration
//!
//! Modules contribute factories through the `linkme` distributed slice
//! declared here; the hosting runtime collects them on startup.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  1. Module defines:   #[linkme::distributed_slice(SERVICE_FACTORIES)]
//! │                       static ENTRY: ServiceFactoryEntry = ...    │
//! │                              ↓                                   │
//! │  2. Runtime queries:  registered_service_factories()             │
//! │                              ↓                                   │
//! │  3. Engine validates and resolves the collected descriptors      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```ignore
//! #[linkme::distributed_slice(SERVICE_FACTORIES)]
//! static DATABASE_FACTORY: ServiceFactoryEntry = ServiceFactoryEntry {
//!     name: "database",
//!     description: "Shared connection pool",
//!     factory: || database_factory().into(),
//! };
//! ```

use crate::factory::ServiceFactoryOrBuilder;

/// Registry entry for a statically registered factory
pub struct ServiceFactoryEntry {
    /// Unique entry name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Produces the factory or its builder
    pub factory: fn() -> ServiceFactoryOrBuilder,
}

/// Factories registered at compile time
#[linkme::distributed_slice]
pub static SERVICE_FACTORIES: [ServiceFactoryEntry] = [..];

/// Collect every registered factory
pub fn registered_service_factories() -> Vec<ServiceFactoryOrBuilder> {
    SERVICE_FACTORIES.iter().map(|entry| (entry.factory)()).collect()
}

/// List registered entries as (name, description) pairs
///
/// Useful for diagnostics and startup logs.
pub fn list_registered_factories() -> Vec<(&'static str, &'static str)> {
    SERVICE_FACTORIES
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect()
}
