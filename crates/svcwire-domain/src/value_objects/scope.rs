//! Service scopes and initialization timing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifetime tier of a service
///
/// Fixed when a token is created and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceScope {
    /// One instance per process
    Root,
    /// One instance per owning plugin
    #[default]
    Plugin,
}

impl ServiceScope {
    /// Lowercase name used in diagnostics and settings
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Plugin => "plugin",
        }
    }

    /// Initialization strategy applied when a factory declares none
    pub fn default_initialization(self) -> InitializationStrategy {
        match self {
            Self::Root => InitializationStrategy::Always,
            Self::Plugin => InitializationStrategy::Lazy,
        }
    }

    /// Whether a service of this scope may depend on a token of `dependency` scope
    pub fn may_depend_on(self, dependency: ServiceScope) -> bool {
        match self {
            Self::Root => dependency == Self::Root,
            Self::Plugin => true,
        }
    }
}

impl fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction timing directive for the resolution engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitializationStrategy {
    /// Construct during startup even when nothing depends on the service
    Always,
    /// Construct on first use
    Lazy,
}

impl fmt::Display for InitializationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Lazy => f.write_str("lazy"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Root {}
    impl Sealed for super::Plugin {}
}

/// Type-level scope marker
///
/// Implemented only by [`Root`] and [`Plugin`].
pub trait ScopeMarker: sealed::Sealed + Send + Sync + 'static {
    /// Runtime value of this scope
    const SCOPE: ServiceScope;
}

/// Marker for root scoped tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Root;

/// Marker for plugin scoped tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Plugin;

impl ScopeMarker for Root {
    const SCOPE: ServiceScope = ServiceScope::Root;
}

impl ScopeMarker for Plugin {
    const SCOPE: ServiceScope = ServiceScope::Plugin;
}
