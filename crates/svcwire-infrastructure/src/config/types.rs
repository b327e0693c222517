//! Configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EAGER_INITIALIZATION, DEFAULT_LOG_LEVEL, DEFAULT_USE_DEFAULT_FACTORIES};

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Service registry configuration
    pub registry: RegistryConfig,
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// Registry Configuration
// ============================================================================

/// Service registry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Fall back to token default factories when nothing is registered
    pub use_default_factories: bool,
    /// Construct `always` services during initialization
    ///
    /// When disabled every service is constructed on first request.
    pub eager_initialization: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            use_default_factories: DEFAULT_USE_DEFAULT_FACTORIES,
            eager_initialization: DEFAULT_EAGER_INITIALIZATION,
        }
    }
}
