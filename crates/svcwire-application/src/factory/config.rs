//! Factory configurations
//!
//! A [`FactoryConfig`] is the resolved content of a declaration: the target
//! token, its dependencies, an optional initialization strategy and the
//! constructors. The typed constructors erase user closures into the
//! descriptor's constructor signatures; [`FactoryConfig::from_parts`] accepts
//! already erased parts for dynamically assembled factories.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use svcwire_domain::error::{BoxError, ConstructionPhase, Error};
use svcwire_domain::value_objects::{
    ContextValue, InitializationStrategy, Plugin, Root, RootContextValue, ServiceInstance,
};

use crate::dependencies::{DependencyMap, DependencySet, ResolvedDependencies, RootDependencySet};
use crate::factory::descriptor::{InstanceConstructor, RootContextConstructor};
use crate::token::{AnyServiceToken, ServiceToken};

/// Constructors of a factory, tagged by scope
#[derive(Clone)]
pub enum FactoryBody {
    /// Root scoped service: a single instance phase
    Root {
        /// Instance constructor
        factory: InstanceConstructor,
    },
    /// Plugin scoped service: optional root context phase, then instance phase
    Plugin {
        /// Root context constructor, when declared
        create_root_context: Option<RootContextConstructor>,
        /// Instance constructor
        factory: InstanceConstructor,
    },
}

/// Resolved factory declaration
#[derive(Clone)]
pub struct FactoryConfig {
    service: AnyServiceToken,
    dependencies: DependencyMap,
    initialization: Option<InitializationStrategy>,
    body: FactoryBody,
}

impl FactoryConfig {
    /// Root scoped factory
    ///
    /// `deps` must only contain root scoped dependencies.
    pub fn root<T, D, F, Fut>(service: &ServiceToken<T, Root>, deps: D, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        D: RootDependencySet,
        F: Fn(D::Resolved) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<T>, BoxError>> + Send + 'static,
    {
        let dependencies = deps.dependency_map();
        let factory = typed_instance_constructor(service.id(), deps, move |resolved, _| {
            Ok(factory(resolved))
        });
        Self::from_parts(
            service.as_any().clone(),
            dependencies,
            FactoryBody::Root { factory },
        )
    }

    /// Plugin scoped factory without a root context
    pub fn plugin<T, D, F, Fut>(service: &ServiceToken<T, Plugin>, deps: D, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        D: DependencySet,
        F: Fn(D::Resolved) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<T>, BoxError>> + Send + 'static,
    {
        let dependencies = deps.dependency_map();
        let factory = typed_instance_constructor(service.id(), deps, move |resolved, _| {
            Ok(factory(resolved))
        });
        Self::from_parts(
            service.as_any().clone(),
            dependencies,
            FactoryBody::Plugin {
                create_root_context: None,
                factory,
            },
        )
    }

    /// Plugin scoped factory with a shared root context
    ///
    /// `create_root_context` sees only the root scoped dependencies (plugin
    /// scoped entries are [`crate::dependencies::PluginScoped`] placeholders);
    /// `factory` receives every dependency plus the shared context.
    pub fn plugin_with_root_context<T, C, D, R, RFut, F, Fut>(
        service: &ServiceToken<T, Plugin>,
        deps: D,
        create_root_context: R,
        factory: F,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        D: DependencySet,
        R: Fn(D::RootResolved) -> RFut + Send + Sync + 'static,
        RFut: Future<Output = Result<Arc<C>, BoxError>> + Send + 'static,
        F: Fn(D::Resolved, Arc<C>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<T>, BoxError>> + Send + 'static,
    {
        let dependencies = deps.dependency_map();
        let deps = Arc::new(deps);

        let context_id = service.id().to_string();
        let context_deps = Arc::clone(&deps);
        let context: RootContextConstructor = Arc::new(move |resolved: ResolvedDependencies| {
            let token_id = context_id.clone();
            let pending = context_deps.project_root(&resolved).map(&create_root_context);
            async move {
                let context = pending?.await.map_err(|source| {
                    Error::construction(token_id, ConstructionPhase::RootContext, source)
                })?;
                Ok(ContextValue::new(context))
            }
            .boxed()
        });

        let instance_id = service.id().to_string();
        let factory = typed_instance_constructor(
            service.id(),
            deps,
            move |resolved, context: RootContextValue| {
                let context = match context {
                    RootContextValue::Provided(value) => value.downcast::<C>().ok_or_else(|| {
                        Error::configuration_for(
                            instance_id.as_str(),
                            format!(
                                "root context resolved to {}, expected {}",
                                value.type_name(),
                                std::any::type_name::<C>()
                            ),
                        )
                    }),
                    RootContextValue::Absent => Err(Error::configuration_for(
                        instance_id.as_str(),
                        "a root context was declared but the instance constructor received none",
                    )),
                };
                context.map(|context| factory(resolved, context))
            },
        );

        Self::from_parts(
            service.as_any().clone(),
            dependencies,
            FactoryBody::Plugin {
                create_root_context: Some(context),
                factory,
            },
        )
    }

    /// Assemble a config from erased parts
    ///
    /// Nothing is checked here; the builder validates the result.
    pub fn from_parts(service: AnyServiceToken, dependencies: DependencyMap, body: FactoryBody) -> Self {
        Self {
            service,
            dependencies,
            initialization: None,
            body,
        }
    }

    /// Override the scope's default initialization strategy
    #[must_use]
    pub fn with_initialization(mut self, initialization: InitializationStrategy) -> Self {
        self.initialization = Some(initialization);
        self
    }

    /// Target token
    pub fn service(&self) -> &AnyServiceToken {
        &self.service
    }

    /// Declared dependencies
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Declared initialization strategy, if any
    pub fn initialization(&self) -> Option<InitializationStrategy> {
        self.initialization
    }

    /// Constructors
    pub fn body(&self) -> &FactoryBody {
        &self.body
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        AnyServiceToken,
        DependencyMap,
        Option<InitializationStrategy>,
        FactoryBody,
    ) {
        (self.service, self.dependencies, self.initialization, self.body)
    }
}

impl std::fmt::Debug for FactoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.body {
            FactoryBody::Root { .. } => "root",
            FactoryBody::Plugin { .. } => "plugin",
        };
        f.debug_struct("FactoryConfig")
            .field("service", &self.service.id())
            .field("dependencies", &self.dependencies)
            .field("initialization", &self.initialization)
            .field("body", &kind)
            .finish()
    }
}

/// Wrap a typed instance closure into an [`InstanceConstructor`]
///
/// Projection and context failures surface unchanged as configuration
/// errors; failures of the user future become instance-phase construction
/// errors.
fn typed_instance_constructor<T, D, F, Fut>(token_id: &str, deps: D, factory: F) -> InstanceConstructor
where
    T: ?Sized + Send + Sync + 'static,
    D: DependencySet,
    F: Fn(D::Resolved, RootContextValue) -> svcwire_domain::Result<Fut> + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<T>, BoxError>> + Send + 'static,
{
    let token_id = token_id.to_string();
    Arc::new(move |resolved: ResolvedDependencies, context: RootContextValue| {
        let token_id = token_id.clone();
        let pending = deps
            .project(&resolved)
            .and_then(|projected| factory(projected, context));
        async move {
            let instance = pending?.await.map_err(|source| {
                Error::construction(token_id, ConstructionPhase::Instance, source)
            })?;
            Ok(ServiceInstance::new(instance))
        }
        .boxed()
    })
}
