//! # Infrastructure Layer
//!
//! Resolution engine, configuration and logging for svcwire.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Service registry engine and bootstrap |
//! | [`config`] | Figment-based configuration loading |
//! | [`logging`] | tracing subscriber setup |
//! | [`error_ext`] | Error context helpers |
//! | [`constants`] | Infrastructure defaults |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

pub use config::{AppConfig, ConfigLoader};
pub use di::{RegistryInitializer, ServiceRegistry, init_registry};
pub use error_ext::ErrorContext;
