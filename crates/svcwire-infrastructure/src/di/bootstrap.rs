//! Registry bootstrap
//!
//! Composition root: collects the factories contributed through the
//! `linkme` slice, adds the ones passed explicitly, builds the registry and
//! runs eager initialization.
//!
//! ```text
//! AppConfig ──► RegistryInitializer ──► logging
//!                      │
//!                      ▼
//!   SERVICE_FACTORIES + explicit factories
//!                      │
//!                      ▼
//!   ServiceRegistry ──► initialize_root_services()
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let registry = init_registry(&config, vec![database_factory().into()]).await?;
//! registry.initialize_plugin_services("my-plugin").await?;
//! let logger = registry.get(&LOGGER, "my-plugin").await?;
//! ```

use svcwire_application::factory::ServiceFactoryOrBuilder;
use svcwire_application::ports::registry::{
    list_registered_factories, registered_service_factories,
};
use svcwire_domain::error::Result;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::di::registry::ServiceRegistry;
use crate::logging::{init_logging, parse_log_level};

/// Build a registry from registered and explicit factories, then construct
/// every eager root service
pub async fn init_registry(
    config: &AppConfig,
    factories: Vec<ServiceFactoryOrBuilder>,
) -> Result<ServiceRegistry> {
    let registered = list_registered_factories();
    for (name, description) in &registered {
        debug!(name, description, "Found registered service factory");
    }
    info!(
        registered = registered.len(),
        explicit = factories.len(),
        "Collecting service factories"
    );

    let mut all = registered_service_factories();
    all.extend(factories);

    let registry = ServiceRegistry::with_config(all, config.registry)?;
    registry.initialize_root_services().await?;
    Ok(registry)
}

/// Application-level initializer owning the loaded configuration
#[derive(Debug, Clone)]
pub struct RegistryInitializer {
    config: AppConfig,
}

impl RegistryInitializer {
    /// Initializer for `config`
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Install the logging subscriber, then build the registry
    ///
    /// A subscriber installed earlier by the host is kept.
    pub async fn initialize(
        &self,
        factories: Vec<ServiceFactoryOrBuilder>,
    ) -> Result<ServiceRegistry> {
        parse_log_level(&self.config.logging.level)?;
        if let Err(err) = init_logging(self.config.logging.clone()) {
            warn!(error = %err, "Keeping the existing logging subscriber");
        }
        init_registry(&self.config, factories).await
    }
}
