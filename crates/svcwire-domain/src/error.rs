//! Error handling types

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by user supplied constructors
///
/// Construction failures are carried in this form so that whatever error a
/// factory author returns (including `anyhow::Error`) reaches the caller
/// unchanged through [`std::error::Error::source`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Phase of service construction in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructionPhase {
    /// Shared root context of a plugin scoped service
    RootContext,
    /// Creation of the service instance itself
    Instance,
    /// Resolution of a token's default factory
    DefaultFactory,
}

impl fmt::Display for ConstructionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::RootContext => "root context",
            Self::Instance => "instance",
            Self::DefaultFactory => "default factory",
        };
        f.write_str(phase)
    }
}

/// Main error type for svcwire
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid service wiring, reported before any construction begins
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Id of the offending token, when one is known
        token_id: Option<String>,
    },

    /// Runtime read of a token's compile-time contract type
    #[error(
        "Contract misuse: the contract type of token{{{token_id}}} is a compile-time marker and cannot be read at runtime"
    )]
    ContractMisuse {
        /// Id of the token that was misused
        token_id: String,
    },

    /// A constructor failed while building a service
    #[error("Failed to construct service '{token_id}' during {phase}: {source}")]
    Construction {
        /// Id of the service being constructed
        token_id: String,
        /// Phase that failed
        phase: ConstructionPhase,
        /// Error returned by the constructor, unchanged
        #[source]
        source: BoxError,
    },

    /// No factory is registered for a token and no default applies
    #[error("No factory registered for service '{token_id}' requested by plugin '{plugin_id}'")]
    MissingService {
        /// Id of the requested token
        token_id: String,
        /// Plugin that requested the service
        plugin_id: String,
    },

    /// Settings could not be loaded or are invalid
    #[error("Settings error: {message}")]
    Config {
        /// Description of the settings error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Internal invariant broken
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Wiring error creation methods
impl Error {
    /// Create a configuration error not tied to a single token
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            token_id: None,
        }
    }

    /// Create a configuration error identifying the offending token
    pub fn configuration_for<I: Into<String>, S: Into<String>>(token_id: I, message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            token_id: Some(token_id.into()),
        }
    }

    /// Create a contract misuse error
    pub fn contract_misuse<I: Into<String>>(token_id: I) -> Self {
        Self::ContractMisuse {
            token_id: token_id.into(),
        }
    }

    /// Create a missing service error
    pub fn missing_service<I: Into<String>, P: Into<String>>(token_id: I, plugin_id: P) -> Self {
        Self::MissingService {
            token_id: token_id.into(),
            plugin_id: plugin_id.into(),
        }
    }
}

// Construction error creation methods
impl Error {
    /// Wrap a constructor failure
    pub fn construction<I: Into<String>, E: Into<BoxError>>(
        token_id: I,
        phase: ConstructionPhase,
        source: E,
    ) -> Self {
        Self::Construction {
            token_id: token_id.into(),
            phase,
            source: source.into(),
        }
    }
}

// Settings and internal error creation methods
impl Error {
    /// Create a settings error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a settings error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification helpers
impl Error {
    /// Whether this error is a wiring problem detected before construction
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Id of the token this error is about, if any
    pub fn token_id(&self) -> Option<&str> {
        match self {
            Self::Configuration { token_id, .. } => token_id.as_deref(),
            Self::ContractMisuse { token_id }
            | Self::Construction { token_id, .. }
            | Self::MissingService { token_id, .. } => Some(token_id),
            Self::Config { .. } | Self::Internal { .. } => None,
        }
    }
}
