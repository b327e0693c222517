//! Configuration management
//!
//! Settings are layered: defaults, then a TOML file, then `SVCWIRE_`
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig, RegistryConfig};
