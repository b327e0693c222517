//! Normalized factory descriptor consumed by the resolution engine

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use svcwire_domain::constants::FACTORY_KIND;
use svcwire_domain::error::Result;
use svcwire_domain::value_objects::{
    ContextValue, InitializationStrategy, RootContextValue, ServiceInstance, ServiceScope,
};

use crate::dependencies::{DependencyMap, ResolvedDependencies};
use crate::token::AnyServiceToken;

/// Erased instance constructor
///
/// Receives the resolved dependencies and the root context. Root scoped
/// services always receive [`RootContextValue::Absent`].
pub type InstanceConstructor = Arc<
    dyn Fn(ResolvedDependencies, RootContextValue) -> BoxFuture<'static, Result<ServiceInstance>>
        + Send
        + Sync,
>;

/// Erased root context constructor, receiving only root scoped dependencies
pub type RootContextConstructor =
    Arc<dyn Fn(ResolvedDependencies) -> BoxFuture<'static, Result<ContextValue>> + Send + Sync>;

/// Canonical factory descriptor
///
/// Produced by [`crate::factory::ServiceFactoryBuilder`]; every declaration
/// shape ends up in this form.
#[derive(Clone)]
pub struct ServiceFactory {
    service: AnyServiceToken,
    dependencies: DependencyMap,
    initialization: InitializationStrategy,
    root_context_constructor: Option<RootContextConstructor>,
    instance_constructor: InstanceConstructor,
}

impl ServiceFactory {
    pub(crate) fn new(
        service: AnyServiceToken,
        dependencies: DependencyMap,
        initialization: InitializationStrategy,
        root_context_constructor: Option<RootContextConstructor>,
        instance_constructor: InstanceConstructor,
    ) -> Self {
        Self {
            service,
            dependencies,
            initialization,
            root_context_constructor,
            instance_constructor,
        }
    }

    /// Token this factory satisfies
    pub fn service(&self) -> &AnyServiceToken {
        &self.service
    }

    /// Scope of the provided service
    pub fn scope(&self) -> ServiceScope {
        self.service.scope()
    }

    /// Declared dependencies
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Construction timing directive
    pub fn initialization(&self) -> InitializationStrategy {
        self.initialization
    }

    /// Root context constructor, present only when declared
    pub fn root_context_constructor(&self) -> Option<&RootContextConstructor> {
        self.root_context_constructor.as_ref()
    }

    /// Instance constructor
    pub fn instance_constructor(&self) -> &InstanceConstructor {
        &self.instance_constructor
    }

    /// Discriminant tag of factories
    pub fn kind(&self) -> &'static str {
        FACTORY_KIND
    }

    /// Run the root context phase
    ///
    /// Yields [`RootContextValue::Absent`] without running anything when no
    /// constructor was declared.
    pub async fn create_root_context(
        &self,
        dependencies: ResolvedDependencies,
    ) -> Result<RootContextValue> {
        match &self.root_context_constructor {
            None => Ok(RootContextValue::Absent),
            Some(constructor) => constructor(dependencies)
                .await
                .map(RootContextValue::Provided),
        }
    }

    /// Run the instance phase
    pub async fn create_instance(
        &self,
        dependencies: ResolvedDependencies,
        context: RootContextValue,
    ) -> Result<ServiceInstance> {
        (self.instance_constructor)(dependencies, context).await
    }
}

impl fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("service", &self.service.id())
            .field("scope", &self.scope())
            .field("dependencies", &self.dependencies)
            .field("initialization", &self.initialization)
            .field(
                "root_context_constructor",
                &self.root_context_constructor.is_some(),
            )
            .finish_non_exhaustive()
    }
}
