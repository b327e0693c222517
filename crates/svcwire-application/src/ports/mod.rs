//! Ports exposed to hosting runtimes

pub mod registry;

pub use registry::{
    SERVICE_FACTORIES, ServiceFactoryEntry, list_registered_factories,
    registered_service_factories,
};
