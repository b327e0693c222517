//! Shared fixtures for registry tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use svcwire_application::core_services::{PluginMetadata, plugin_metadata};
use svcwire_application::dependencies::{PluginScoped, ResolvedDependencies, dep};
use svcwire_application::factory::{
    FactoryConfig, InstanceConstructor, ServiceFactoryBuilder, create_service_factory,
};
use svcwire_application::token::ServiceToken;
use svcwire_domain::error::Error;
use svcwire_domain::{Root, RootContextValue, ServiceInstance};

/// Shared connection pool, root scoped
#[derive(Debug)]
pub struct Pool {
    pub url: String,
}

/// Output target shared by every plugin logger
#[derive(Debug)]
pub struct Sink {
    pub id: usize,
    pub target: String,
}

/// Per-plugin logging contract
pub trait Logger: Send + Sync {
    fn plugin_id(&self) -> &str;
    fn sink(&self) -> &Sink;
}

struct PluginLogger {
    plugin_id: String,
    sink: Arc<Sink>,
}

impl Logger for PluginLogger {
    fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    fn sink(&self) -> &Sink {
        &self.sink
    }
}

/// Construction counter shared with a factory
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn db_token() -> ServiceToken<Pool, Root> {
    ServiceToken::new("db")
}

pub fn logger_token() -> ServiceToken<dyn Logger> {
    ServiceToken::new("logger")
}

/// Root pool factory counting its constructions
pub fn db_factory(token: &ServiceToken<Pool, Root>, built: &Counter) -> ServiceFactoryBuilder {
    let built = built.clone();
    create_service_factory(
        FactoryConfig::root(token, (), move |()| {
            built.bump();
            async { Ok(Arc::new(Pool { url: "postgres://localhost/app".to_string() })) }
        })
        .into(),
    )
}

/// Plugin logger factory with one shared sink as its root context
pub fn logger_factory(
    token: &ServiceToken<dyn Logger>,
    db: &ServiceToken<Pool, Root>,
    contexts: &Counter,
    instances: &Counter,
) -> ServiceFactoryBuilder {
    let contexts = contexts.clone();
    let instances = instances.clone();
    create_service_factory(
        FactoryConfig::plugin_with_root_context(
            token,
            (dep("db", db), dep("meta", plugin_metadata())),
            move |(pool, _): (Arc<Pool>, PluginScoped)| {
                let id = contexts.bump();
                async move {
                    Ok(Arc::new(Sink {
                        id,
                        target: pool.url.clone(),
                    }))
                }
            },
            move |(_, meta): (Arc<Pool>, Arc<PluginMetadata>), sink: Arc<Sink>| {
                instances.bump();
                async move {
                    let logger: Arc<dyn Logger> = Arc::new(PluginLogger {
                        plugin_id: meta.plugin_id().to_string(),
                        sink,
                    });
                    Ok(logger)
                }
            },
        )
        .into(),
    )
}

/// Erased constructor returning a fixed byte
pub fn byte_constructor(value: u8) -> InstanceConstructor {
    Arc::new(move |_: ResolvedDependencies, _: RootContextValue| {
        async move { Ok::<_, Error>(ServiceInstance::new(Arc::new(value))) }.boxed()
    })
}
