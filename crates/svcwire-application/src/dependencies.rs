//! Dependency declaration and projection
//!
//! Factories declare their dependencies as a tuple of named tokens:
//!
//! ```ignore
//! let deps = (dep("db", &DATABASE), dep("logger", &LOGGER));
//! ```
//!
//! The tuple's [`DependencySet::Resolved`] type is the tuple of resolved
//! instances handed to the factory (`(Arc<Pool>, Arc<dyn Logger>)` above).
//! [`DependencySet::RootResolved`] is the root-context view of the same
//! tuple, in which plugin scoped entries are replaced by [`PluginScoped`].
//! [`RootDependencySet`] is only implemented when every entry is root scoped,
//! which is how root factories are kept from depending on plugin services.
//!
//! At runtime the engine works with the erased forms: [`DependencyMap`] for
//! the declaration and [`ResolvedDependencies`] for the resolved values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use svcwire_domain::error::{Error, Result};
use svcwire_domain::value_objects::{Plugin, Root, ScopeMarker, ServiceInstance};

use crate::token::{AnyServiceToken, ServiceToken};

/// A named dependency on a typed token
pub struct Dependency<T: ?Sized, S: ScopeMarker> {
    name: String,
    token: ServiceToken<T, S>,
}

/// Declare a dependency named `name` on `token`
pub fn dep<T, S>(name: impl Into<String>, token: &ServiceToken<T, S>) -> Dependency<T, S>
where
    T: ?Sized + Send + Sync + 'static,
    S: ScopeMarker,
{
    Dependency {
        name: name.into(),
        token: token.clone(),
    }
}

impl<T: ?Sized, S: ScopeMarker> Clone for Dependency<T, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            token: self.token.clone(),
        }
    }
}

impl<T: ?Sized, S: ScopeMarker> fmt::Debug for Dependency<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("name", &self.name)
            .field("token", &self.token)
            .finish()
    }
}

/// Placeholder for a plugin scoped dependency in a root context projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginScoped;

/// Ordered mapping of dependency names to tokens
///
/// A name declared twice keeps its first binding and is recorded in
/// [`DependencyMap::duplicate_names`]; declarations carrying duplicates are
/// rejected when the factory is built.
#[derive(Clone, Default)]
pub struct DependencyMap {
    entries: Vec<(String, AnyServiceToken)>,
    duplicates: Vec<String>,
}

impl DependencyMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dependency
    ///
    /// Returns `false` when `name` was already declared.
    pub fn insert(&mut self, name: impl Into<String>, token: AnyServiceToken) -> bool {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            if !self.duplicates.contains(&name) {
                self.duplicates.push(name);
            }
            return false;
        }
        self.entries.push((name, token));
        true
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, token: impl Into<AnyServiceToken>) -> Self {
        self.insert(name, token.into());
        self
    }

    /// Names declared more than once
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicates
    }

    /// Token bound to `name`
    pub fn get(&self, name: &str) -> Option<&AnyServiceToken> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, token)| token)
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyServiceToken)> {
        self.entries.iter().map(|(name, token)| (name.as_str(), token))
    }

    /// Declared tokens in declaration order
    pub fn tokens(&self) -> impl Iterator<Item = &AnyServiceToken> {
        self.entries.iter().map(|(_, token)| token)
    }

    /// Number of declared dependencies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DependencyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, token)| (name, token.id())))
            .finish()
    }
}

/// Resolved dependency values keyed by dependency name
#[derive(Clone, Default, Debug)]
pub struct ResolvedDependencies {
    values: HashMap<String, ServiceInstance>,
}

impl ResolvedDependencies {
    /// Empty set of values
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value resolved for `name`
    pub fn insert(&mut self, name: impl Into<String>, instance: ServiceInstance) {
        self.values.insert(name.into(), instance);
    }

    /// Erased value resolved for `name`
    pub fn get(&self, name: &str) -> Option<&ServiceInstance> {
        self.values.get(name)
    }

    /// Typed value resolved for `name` on behalf of `token`
    pub fn get_typed<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        token: &AnyServiceToken,
    ) -> Result<Arc<T>> {
        let instance = self.get(name).ok_or_else(|| {
            Error::configuration_for(
                token.id(),
                format!("dependency '{name}' on {token} was not resolved"),
            )
        })?;
        instance.downcast::<T>().ok_or_else(|| {
            Error::configuration_for(
                token.id(),
                format!(
                    "dependency '{name}' on {token} resolved to {}, expected {}",
                    instance.type_name(),
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// Whether a value was resolved for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of resolved values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value was resolved
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One entry of a dependency tuple
pub trait DependencyEntry: Send + Sync + 'static {
    /// Value handed to the instance constructor
    type Resolved: Send + 'static;
    /// Value handed to the root context constructor
    type RootResolved: Send + 'static;

    /// Dependency name
    fn name(&self) -> &str;

    /// Erased token
    fn token(&self) -> &AnyServiceToken;

    /// Project the entry out of the resolved values
    fn resolve(&self, resolved: &ResolvedDependencies) -> Result<Self::Resolved>;

    /// Project the entry for the root context phase
    fn resolve_root(&self, resolved: &ResolvedDependencies) -> Result<Self::RootResolved>;
}

/// Entry that may be used by a root scoped factory
pub trait RootDependencyEntry: DependencyEntry {}

impl<T: ?Sized + Send + Sync + 'static> DependencyEntry for Dependency<T, Root> {
    type Resolved = Arc<T>;
    type RootResolved = Arc<T>;

    fn name(&self) -> &str {
        &self.name
    }

    fn token(&self) -> &AnyServiceToken {
        self.token.as_any()
    }

    fn resolve(&self, resolved: &ResolvedDependencies) -> Result<Arc<T>> {
        resolved.get_typed::<T>(&self.name, self.token.as_any())
    }

    fn resolve_root(&self, resolved: &ResolvedDependencies) -> Result<Arc<T>> {
        self.resolve(resolved)
    }
}

impl<T: ?Sized + Send + Sync + 'static> RootDependencyEntry for Dependency<T, Root> {}

impl<T: ?Sized + Send + Sync + 'static> DependencyEntry for Dependency<T, Plugin> {
    type Resolved = Arc<T>;
    type RootResolved = PluginScoped;

    fn name(&self) -> &str {
        &self.name
    }

    fn token(&self) -> &AnyServiceToken {
        self.token.as_any()
    }

    fn resolve(&self, resolved: &ResolvedDependencies) -> Result<Arc<T>> {
        resolved.get_typed::<T>(&self.name, self.token.as_any())
    }

    fn resolve_root(&self, _resolved: &ResolvedDependencies) -> Result<PluginScoped> {
        Ok(PluginScoped)
    }
}

/// A declared set of dependencies
pub trait DependencySet: Send + Sync + 'static {
    /// Values handed to the instance constructor
    type Resolved: Send + 'static;
    /// Values handed to the root context constructor
    type RootResolved: Send + 'static;

    /// Erased declaration
    fn dependency_map(&self) -> DependencyMap;

    /// Project the instance constructor's arguments
    fn project(&self, resolved: &ResolvedDependencies) -> Result<Self::Resolved>;

    /// Project the root context constructor's arguments
    fn project_root(&self, resolved: &ResolvedDependencies) -> Result<Self::RootResolved>;
}

/// Dependency set containing only root scoped entries
pub trait RootDependencySet: DependencySet {}

impl DependencySet for () {
    type Resolved = ();
    type RootResolved = ();

    fn dependency_map(&self) -> DependencyMap {
        DependencyMap::new()
    }

    fn project(&self, _resolved: &ResolvedDependencies) -> Result<()> {
        Ok(())
    }

    fn project_root(&self, _resolved: &ResolvedDependencies) -> Result<()> {
        Ok(())
    }
}

impl RootDependencySet for () {}

impl<D: DependencySet> DependencySet for Arc<D> {
    type Resolved = D::Resolved;
    type RootResolved = D::RootResolved;

    fn dependency_map(&self) -> DependencyMap {
        self.as_ref().dependency_map()
    }

    fn project(&self, resolved: &ResolvedDependencies) -> Result<Self::Resolved> {
        self.as_ref().project(resolved)
    }

    fn project_root(&self, resolved: &ResolvedDependencies) -> Result<Self::RootResolved> {
        self.as_ref().project_root(resolved)
    }
}

macro_rules! impl_dependency_set {
    ($($entry:ident $var:ident),+) => {
        impl<$($entry: DependencyEntry),+> DependencySet for ($($entry,)+) {
            type Resolved = ($($entry::Resolved,)+);
            type RootResolved = ($($entry::RootResolved,)+);

            fn dependency_map(&self) -> DependencyMap {
                let ($($var,)+) = self;
                let mut map = DependencyMap::new();
                $(map.insert($var.name(), $var.token().clone());)+
                map
            }

            fn project(&self, resolved: &ResolvedDependencies) -> Result<Self::Resolved> {
                let ($($var,)+) = self;
                Ok(($($var.resolve(resolved)?,)+))
            }

            fn project_root(&self, resolved: &ResolvedDependencies) -> Result<Self::RootResolved> {
                let ($($var,)+) = self;
                Ok(($($var.resolve_root(resolved)?,)+))
            }
        }

        impl<$($entry: RootDependencyEntry),+> RootDependencySet for ($($entry,)+) {}
    };
}

impl_dependency_set!(A a);
impl_dependency_set!(A a, B b);
impl_dependency_set!(A a, B b, C c);
impl_dependency_set!(A a, B b, C c, D d);
impl_dependency_set!(A a, B b, C c, D d, E e);
impl_dependency_set!(A a, B b, C c, D d, E e, F f);
impl_dependency_set!(A a, B b, C c, D d, E e, F f, G g);
impl_dependency_set!(A a, B b, C c, D d, E e, F f, G g, H h);
