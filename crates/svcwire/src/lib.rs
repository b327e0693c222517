//! # svcwire
//!
//! Typed service registry for hosts that load plugins. Services are named by
//! tokens, declared through factories and resolved per plugin or once for
//! the whole process.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::{Arc, LazyLock};
//! use svcwire::prelude::*;
//!
//! static DATABASE: LazyLock<ServiceToken<Pool, Root>> =
//!     LazyLock::new(|| ServiceToken::new("db"));
//! static LOGGER: LazyLock<ServiceToken<PluginLogger>> =
//!     LazyLock::new(|| ServiceToken::new("logger"));
//!
//! let db = create_service_factory::<()>(
//!     FactoryConfig::root(&DATABASE, (), |()| async { Ok(Arc::new(Pool::connect()?)) }).into(),
//! );
//! let logger = create_service_factory::<()>(
//!     FactoryConfig::plugin_with_root_context(
//!         &LOGGER,
//!         (dep("meta", plugin_metadata()),),
//!         |(_,)| async { Ok(Arc::new(LogSink::open()?)) },
//!         |(meta,), sink| async move { Ok(Arc::new(PluginLogger::new(sink, meta.plugin_id()))) },
//!     )
//!     .into(),
//! );
//!
//! let registry = ServiceRegistry::new([db.into(), logger.into()])?;
//! registry.initialize_root_services().await?;
//! let log = registry.get(&LOGGER, "my-plugin").await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - scopes, erased values and the error taxonomy
//! - `application` - tokens, dependency projection and factory declarations
//! - `infrastructure` - resolution engine, configuration and logging

/// Domain layer - scopes, erased values and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use svcwire_domain::*;
}

/// Application layer - tokens and factory declarations
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use svcwire_application::*;
}

/// Infrastructure layer - resolution engine, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use svcwire_infrastructure::*;
}

/// Compile-time registration of factories
///
/// Registering crates still depend on `linkme` themselves, since the
/// generated statics refer to it by path.
pub mod registration {
    pub use linkme::distributed_slice;
    pub use svcwire_application::ports::registry::{
        SERVICE_FACTORIES, ServiceFactoryEntry, list_registered_factories,
        registered_service_factories,
    };
}

/// Everything needed to declare and resolve services
pub mod prelude {
    pub use svcwire_application::core_services::{PluginMetadata, plugin_metadata};
    pub use svcwire_application::{
        AnyServiceToken, DependencySet, FactoryConfig, FactoryDeclaration, PluginScoped,
        ServiceFactory, ServiceFactoryBuilder, ServiceFactoryOrBuilder, ServiceToken,
        TokenOptions, create_service_factory, create_service_token, dep,
    };
    pub use svcwire_domain::{
        BoxError, Error, InitializationStrategy, Plugin, Result, Root, ServiceScope,
    };
    pub use svcwire_infrastructure::{AppConfig, ConfigLoader, ServiceRegistry, init_registry};
}

pub use domain::{Error, Result};
pub use infrastructure::ServiceRegistry;
