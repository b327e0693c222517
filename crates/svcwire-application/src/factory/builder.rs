//! Factory declaration builder
//!
//! Four declaration shapes are accepted: root or plugin configs, each either
//! fixed or parameterized by caller options. All of them normalize to the
//! same [`ServiceFactory`] descriptor.
//!
//! ```ignore
//! let builder = create_service_factory(FactoryDeclaration::parameterized(
//!     |options: Option<PoolOptions>| {
//!         let options = options.unwrap_or_default();
//!         FactoryConfig::root(&DATABASE, (), move |()| {
//!             let options = options.clone();
//!             async move { Ok(Arc::new(Pool::with_options(options))) }
//!         })
//!     },
//! ));
//! let factory = builder.build_with(PoolOptions { retries: 3 })?;
//! ```

use std::fmt;
use std::sync::Arc;

use svcwire_domain::constants::FACTORY_KIND;
use svcwire_domain::error::Result;
use svcwire_domain::value_objects::InitializationStrategy;
use tracing::debug;

use crate::factory::config::{FactoryBody, FactoryConfig};
use crate::factory::descriptor::ServiceFactory;
use crate::factory::validation::validate_declaration;

type ConfigureFn<O> = Arc<dyn Fn(Option<O>) -> FactoryConfig + Send + Sync>;

/// A factory declaration
pub enum FactoryDeclaration<O = ()> {
    /// Configuration known up front
    Fixed(FactoryConfig),
    /// Configuration computed from caller options when the builder runs
    Parameterized(ConfigureFn<O>),
}

impl<O> FactoryDeclaration<O> {
    /// Fixed declaration
    pub fn fixed(config: FactoryConfig) -> Self {
        Self::Fixed(config)
    }

    /// Parameterized declaration; `configure` runs on every build
    pub fn parameterized<F>(configure: F) -> Self
    where
        F: Fn(Option<O>) -> FactoryConfig + Send + Sync + 'static,
    {
        Self::Parameterized(Arc::new(configure))
    }
}

impl<O> From<FactoryConfig> for FactoryDeclaration<O> {
    fn from(config: FactoryConfig) -> Self {
        Self::Fixed(config)
    }
}

/// Turn a declaration into a builder
///
/// Nothing is evaluated until the builder is invoked.
pub fn create_service_factory<O: 'static>(
    declaration: FactoryDeclaration<O>,
) -> ServiceFactoryBuilder<O> {
    let configure: ConfigureFn<O> = match declaration {
        FactoryDeclaration::Fixed(config) => Arc::new(move |_: Option<O>| config.clone()),
        FactoryDeclaration::Parameterized(configure) => configure,
    };
    ServiceFactoryBuilder { configure }
}

/// Builder producing descriptors from a declaration
pub struct ServiceFactoryBuilder<O = ()> {
    configure: ConfigureFn<O>,
}

impl<O> ServiceFactoryBuilder<O> {
    /// Build without caller options
    pub fn build(&self) -> Result<ServiceFactory> {
        self.build_with_options(None)
    }

    /// Build with caller options
    pub fn build_with(&self, options: O) -> Result<ServiceFactory> {
        self.build_with_options(Some(options))
    }

    /// Build with optional caller options
    pub fn build_with_options(&self, options: Option<O>) -> Result<ServiceFactory> {
        normalize((self.configure)(options))
    }

    /// Discriminant tag of factories
    pub fn kind(&self) -> &'static str {
        FACTORY_KIND
    }
}

impl<O> Clone for ServiceFactoryBuilder<O> {
    fn clone(&self) -> Self {
        Self {
            configure: Arc::clone(&self.configure),
        }
    }
}

impl<O> fmt::Debug for ServiceFactoryBuilder<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFactoryBuilder")
            .field("options", &std::any::type_name::<O>())
            .finish_non_exhaustive()
    }
}

fn normalize(config: FactoryConfig) -> Result<ServiceFactory> {
    validate_declaration(&config)?;

    let (service, dependencies, initialization, body) = config.into_parts();
    let initialization: InitializationStrategy =
        initialization.unwrap_or_else(|| service.scope().default_initialization());

    let (create_root_context, factory) = match body {
        FactoryBody::Root { factory } => (None, factory),
        FactoryBody::Plugin {
            create_root_context,
            factory,
        } => (create_root_context, factory),
    };

    debug!(
        service = service.id(),
        scope = %service.scope(),
        initialization = %initialization,
        dependencies = dependencies.len(),
        root_context = create_root_context.is_some(),
        "Built service factory"
    );

    Ok(ServiceFactory::new(
        service,
        dependencies,
        initialization,
        create_root_context,
        factory,
    ))
}

/// Builder with its option type erased
pub trait ErasedFactoryBuilder: Send + Sync {
    /// Build without caller options
    fn build_default(&self) -> Result<ServiceFactory>;
}

impl<O: 'static> ErasedFactoryBuilder for ServiceFactoryBuilder<O> {
    fn build_default(&self) -> Result<ServiceFactory> {
        self.build()
    }
}

/// Either a descriptor or a builder still to be invoked
#[derive(Clone)]
pub enum ServiceFactoryOrBuilder {
    /// Ready descriptor
    Factory(ServiceFactory),
    /// Builder invoked without options when the descriptor is needed
    Builder(Arc<dyn ErasedFactoryBuilder>),
}

impl ServiceFactoryOrBuilder {
    /// Obtain the descriptor, invoking a builder with no options
    pub fn into_factory(self) -> Result<ServiceFactory> {
        match self {
            Self::Factory(factory) => Ok(factory),
            Self::Builder(builder) => builder.build_default(),
        }
    }

    /// Whether this still needs to be built
    pub fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }
}

impl fmt::Debug for ServiceFactoryOrBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(factory) => f.debug_tuple("Factory").field(factory).finish(),
            Self::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

impl From<ServiceFactory> for ServiceFactoryOrBuilder {
    fn from(factory: ServiceFactory) -> Self {
        Self::Factory(factory)
    }
}

impl<O: 'static> From<ServiceFactoryBuilder<O>> for ServiceFactoryOrBuilder {
    fn from(builder: ServiceFactoryBuilder<O>) -> Self {
        Self::Builder(Arc::new(builder))
    }
}
