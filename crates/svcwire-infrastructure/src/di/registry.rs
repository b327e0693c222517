//! Reference resolution engine
//!
//! Holds the registered descriptors and resolves tokens into instances.
//!
//! ```text
//! get(token, plugin)
//!        │
//!        ├── plugin metadata? ── built in, cached per plugin
//!        │
//!        ▼
//! registered factory ── or ── token default factory (loaded once)
//!        │
//!        ├── root scope:   one instance, built under the root plugin id
//!        │
//!        └── plugin scope: root context (once per token, root deps only)
//!                          then one instance per plugin id
//! ```
//!
//! Every cache slot is a [`OnceCell`], so concurrent requests for the same
//! slot share one construction. A failed construction leaves the slot empty
//! and the next request retries. Dependency cycles are not detected.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use svcwire_application::core_services::{PluginMetadata, plugin_metadata};
use svcwire_application::dependencies::ResolvedDependencies;
use svcwire_application::factory::validation::validate_scope_constraints;
use svcwire_application::factory::{ServiceFactory, ServiceFactoryOrBuilder};
use svcwire_application::token::{AnyServiceToken, ServiceToken, TokenKey};
use svcwire_domain::constants::ROOT_PLUGIN_ID;
use svcwire_domain::error::{ConstructionPhase, Error, Result};
use svcwire_domain::value_objects::{
    InitializationStrategy, RootContextValue, ScopeMarker, ServiceInstance, ServiceScope,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;

type Slot<T> = Arc<OnceCell<T>>;

/// Service registry resolving tokens for root and plugin consumers
pub struct ServiceRegistry {
    settings: RegistryConfig,
    factories: HashMap<TokenKey, Arc<ServiceFactory>>,
    token_ids: DashMap<String, TokenKey>,
    default_factories: DashMap<TokenKey, Slot<Arc<ServiceFactory>>>,
    root_instances: DashMap<TokenKey, Slot<ServiceInstance>>,
    root_contexts: DashMap<TokenKey, Slot<RootContextValue>>,
    plugin_instances: DashMap<(TokenKey, String), Slot<ServiceInstance>>,
}

impl ServiceRegistry {
    /// Registry with default settings
    pub fn new<I>(factories: I) -> Result<Self>
    where
        I: IntoIterator<Item = ServiceFactoryOrBuilder>,
    {
        Self::with_config(factories, RegistryConfig::default())
    }

    /// Registry with explicit settings
    ///
    /// Builders are invoked without options. Fails when two factories target
    /// the same token, when two distinct tokens share an id, when a root
    /// factory depends on a plugin scoped token, or when a factory targets
    /// the built-in plugin metadata token.
    pub fn with_config<I>(factories: I, settings: RegistryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = ServiceFactoryOrBuilder>,
    {
        let token_ids = DashMap::new();
        let metadata = plugin_metadata().as_any();
        register_token_id(&token_ids, metadata)?;

        let mut by_token: HashMap<TokenKey, Arc<ServiceFactory>> = HashMap::new();
        for entry in factories {
            let factory = entry.into_factory()?;
            let service = factory.service();

            if service == metadata {
                return Err(Error::configuration_for(
                    service.id(),
                    format!("{service} is provided by the registry and cannot be overridden"),
                ));
            }
            validate_scope_constraints(service, factory.dependencies())?;
            register_token_id(&token_ids, service)?;
            for dependency in factory.dependencies().tokens() {
                register_token_id(&token_ids, dependency)?;
            }
            if by_token.contains_key(&service.key()) {
                return Err(Error::configuration_for(
                    service.id(),
                    format!("Duplicate service implementations provided for {service}"),
                ));
            }

            debug!(
                service = service.id(),
                scope = %service.scope(),
                initialization = %factory.initialization(),
                "Registered service factory"
            );
            by_token.insert(service.key(), Arc::new(factory));
        }

        info!(factories = by_token.len(), "Service registry created");
        Ok(Self {
            settings,
            factories: by_token,
            token_ids,
            default_factories: DashMap::new(),
            root_instances: DashMap::new(),
            root_contexts: DashMap::new(),
            plugin_instances: DashMap::new(),
        })
    }

    /// Active settings
    pub fn settings(&self) -> &RegistryConfig {
        &self.settings
    }

    /// Whether a factory was registered for `token`
    ///
    /// Default factories are not counted.
    pub fn has_factory(&self, token: &AnyServiceToken) -> bool {
        self.factories.contains_key(&token.key())
    }

    /// Registered descriptor for `token`
    pub fn factory(&self, token: &AnyServiceToken) -> Option<&ServiceFactory> {
        self.factories.get(&token.key()).map(Arc::as_ref)
    }

    /// Tokens with a registered factory, ordered by id
    pub fn registered_tokens(&self) -> Vec<AnyServiceToken> {
        let mut tokens: Vec<AnyServiceToken> = self
            .factories
            .values()
            .map(|factory| factory.service().clone())
            .collect();
        tokens.sort_by(|a, b| a.id().cmp(b.id()));
        tokens
    }

    /// Resolve `token` for `plugin_id`
    ///
    /// Root scoped services ignore `plugin_id` and are shared by everyone.
    pub async fn get<T, S>(&self, token: &ServiceToken<T, S>, plugin_id: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
        S: ScopeMarker,
    {
        let instance = self.get_erased(token.as_any(), plugin_id).await?;
        instance.downcast::<T>().ok_or_else(|| {
            Error::internal(format!(
                "{token} resolved to {}, expected {}",
                instance.type_name(),
                type_name::<T>()
            ))
        })
    }

    /// Resolve an erased token for `plugin_id`
    pub fn get_erased<'a>(
        &'a self,
        token: &'a AnyServiceToken,
        plugin_id: &'a str,
    ) -> BoxFuture<'a, Result<ServiceInstance>> {
        async move {
            register_token_id(&self.token_ids, token)?;
            if token == plugin_metadata().as_any() {
                return self.plugin_metadata_instance(plugin_id).await;
            }

            let factory = self
                .resolve_factory(token)
                .await?
                .ok_or_else(|| Error::missing_service(token.id(), plugin_id))?;
            match factory.scope() {
                ServiceScope::Root => self.root_instance(&factory).await,
                ServiceScope::Plugin => self.plugin_instance(&factory, plugin_id).await,
            }
        }
        .boxed()
    }

    /// Construct every root service marked `always`
    ///
    /// Does nothing when eager initialization is disabled.
    pub async fn initialize_root_services(&self) -> Result<()> {
        if !self.settings.eager_initialization {
            debug!("Eager initialization disabled, root services stay lazy");
            return Ok(());
        }

        let eager = self.eager_factories(ServiceScope::Root);
        for factory in &eager {
            self.root_instance(factory).await?;
        }
        info!(services = eager.len(), "Initialized root services");
        Ok(())
    }

    /// Construct every plugin service marked `always` for `plugin_id`
    ///
    /// Does nothing when eager initialization is disabled.
    pub async fn initialize_plugin_services(&self, plugin_id: &str) -> Result<()> {
        if !self.settings.eager_initialization {
            debug!(plugin_id, "Eager initialization disabled, plugin services stay lazy");
            return Ok(());
        }

        let eager = self.eager_factories(ServiceScope::Plugin);
        for factory in &eager {
            self.plugin_instance(factory, plugin_id).await?;
        }
        info!(plugin_id, services = eager.len(), "Initialized plugin services");
        Ok(())
    }

    fn eager_factories(&self, scope: ServiceScope) -> Vec<Arc<ServiceFactory>> {
        let mut eager: Vec<Arc<ServiceFactory>> = self
            .factories
            .values()
            .filter(|factory| {
                factory.scope() == scope
                    && factory.initialization() == InitializationStrategy::Always
            })
            .cloned()
            .collect();
        eager.sort_by(|a, b| a.service().id().cmp(b.service().id()));
        eager
    }

    async fn plugin_metadata_instance(&self, plugin_id: &str) -> Result<ServiceInstance> {
        let key = (plugin_metadata().key(), plugin_id.to_string());
        let slot = self.plugin_instances.entry(key).or_default().clone();
        let instance = slot
            .get_or_init(|| async move {
                ServiceInstance::new(Arc::new(PluginMetadata::new(plugin_id)))
            })
            .await;
        Ok(instance.clone())
    }

    async fn resolve_factory(&self, token: &AnyServiceToken) -> Result<Option<Arc<ServiceFactory>>> {
        if let Some(factory) = self.factories.get(&token.key()) {
            return Ok(Some(Arc::clone(factory)));
        }
        if !self.settings.use_default_factories || !token.has_default_factory() {
            return Ok(None);
        }

        let slot = self.default_factories.entry(token.key()).or_default().clone();
        let factory = slot
            .get_or_try_init(move || self.load_default_factory(token))
            .await?;
        Ok(Some(Arc::clone(factory)))
    }

    async fn load_default_factory(&self, token: &AnyServiceToken) -> Result<Arc<ServiceFactory>> {
        let produced = token
            .resolve_default_factory()
            .await
            .ok_or_else(|| Error::internal(format!("{token} has no default factory")))?
            .map_err(|source| {
                Error::construction(token.id(), ConstructionPhase::DefaultFactory, source)
            })?;

        let factory = produced.into_factory()?;
        if factory.service() != token {
            return Err(Error::configuration_for(
                token.id(),
                format!(
                    "default factory of {token} provides {} instead",
                    factory.service()
                ),
            ));
        }
        validate_scope_constraints(token, factory.dependencies())?;
        for dependency in factory.dependencies().tokens() {
            register_token_id(&self.token_ids, dependency)?;
        }

        debug!(service = token.id(), "Loaded default factory");
        Ok(Arc::new(factory))
    }

    async fn root_instance(&self, factory: &Arc<ServiceFactory>) -> Result<ServiceInstance> {
        let service = factory.service();
        let slot = self.root_instances.entry(service.key()).or_default().clone();
        let instance = slot
            .get_or_try_init(|| async move {
                let dependencies = self
                    .resolve_dependencies(factory, ROOT_PLUGIN_ID, false)
                    .await?;
                debug!(service = service.id(), "Constructing root service");
                factory
                    .create_instance(dependencies, RootContextValue::Absent)
                    .await
            })
            .await
            .inspect_err(|err| warn!(service = service.id(), error = %err, "Root service failed"))?;
        Ok(instance.clone())
    }

    async fn plugin_instance(
        &self,
        factory: &Arc<ServiceFactory>,
        plugin_id: &str,
    ) -> Result<ServiceInstance> {
        let service = factory.service();
        let key = (service.key(), plugin_id.to_string());
        let slot = self.plugin_instances.entry(key).or_default().clone();
        let instance = slot
            .get_or_try_init(|| async move {
                let context = self.root_context(factory).await?;
                let dependencies = self.resolve_dependencies(factory, plugin_id, false).await?;
                debug!(service = service.id(), plugin_id, "Constructing plugin service");
                factory.create_instance(dependencies, context).await
            })
            .await
            .inspect_err(|err| {
                warn!(service = service.id(), plugin_id, error = %err, "Plugin service failed");
            })?;
        Ok(instance.clone())
    }

    async fn root_context(&self, factory: &Arc<ServiceFactory>) -> Result<RootContextValue> {
        if factory.root_context_constructor().is_none() {
            return Ok(RootContextValue::Absent);
        }

        let service = factory.service();
        let slot = self.root_contexts.entry(service.key()).or_default().clone();
        let context = slot
            .get_or_try_init(|| async move {
                let dependencies = self
                    .resolve_dependencies(factory, ROOT_PLUGIN_ID, true)
                    .await?;
                debug!(service = service.id(), "Constructing root context");
                factory.create_root_context(dependencies).await
            })
            .await?;
        Ok(context.clone())
    }

    /// Resolve the declared dependencies of `factory`
    ///
    /// With `root_only`, plugin scoped dependencies are skipped.
    async fn resolve_dependencies(
        &self,
        factory: &ServiceFactory,
        plugin_id: &str,
        root_only: bool,
    ) -> Result<ResolvedDependencies> {
        self.ensure_dependencies_available(factory, plugin_id)?;

        let pending = factory
            .dependencies()
            .iter()
            .filter(|(_, token)| !root_only || token.scope() == ServiceScope::Root)
            .map(|(name, token)| async move {
                let instance = self.get_erased(token, plugin_id).await?;
                Ok::<_, Error>((name, instance))
            });

        let mut resolved = ResolvedDependencies::new();
        for (name, instance) in try_join_all(pending).await? {
            resolved.insert(name, instance);
        }
        Ok(resolved)
    }

    /// Fail with every missing dependency listed at once
    fn ensure_dependencies_available(&self, factory: &ServiceFactory, plugin_id: &str) -> Result<()> {
        let missing: Vec<String> = factory
            .dependencies()
            .tokens()
            .filter(|token| !self.can_resolve(token))
            .map(|token| format!("'{}'", token.id()))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        let service = factory.service();
        Err(Error::configuration_for(
            service.id(),
            format!(
                "Failed to instantiate service '{}' for '{plugin_id}' because the following dependent services are missing: {}",
                service.id(),
                missing.join(", ")
            ),
        ))
    }

    fn can_resolve(&self, token: &AnyServiceToken) -> bool {
        token == plugin_metadata().as_any()
            || self.factories.contains_key(&token.key())
            || (self.settings.use_default_factories && token.has_default_factory())
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("settings", &self.settings)
            .field("factories", &self.factories.len())
            .field("root_instances", &self.root_instances.len())
            .field("plugin_instances", &self.plugin_instances.len())
            .finish_non_exhaustive()
    }
}

/// Record that `token` owns its id, rejecting a second token with the same id
fn register_token_id(ids: &DashMap<String, TokenKey>, token: &AnyServiceToken) -> Result<()> {
    match ids.entry(token.id().to_string()) {
        Entry::Occupied(entry) if *entry.get() != token.key() => Err(Error::configuration_for(
            token.id(),
            format!("Two distinct tokens use the id '{}'", token.id()),
        )),
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(entry) => {
            entry.insert(token.key());
            Ok(())
        }
    }
}
