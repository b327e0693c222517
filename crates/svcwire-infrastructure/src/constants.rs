//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `svcwire_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "svcwire.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "svcwire";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "SVCWIRE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "SVCWIRE_LOG";

// ============================================================================
// REGISTRY CONSTANTS
// ============================================================================

/// Whether token default factories are used when nothing is registered
pub const DEFAULT_USE_DEFAULT_FACTORIES: bool = true;

/// Whether `always` services are constructed during startup
pub const DEFAULT_EAGER_INITIALIZATION: bool = true;
