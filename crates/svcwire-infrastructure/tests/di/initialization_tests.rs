//! Eager initialization tests

use std::sync::Arc;

use svcwire_application::core_services::{PluginMetadata, plugin_metadata};
use svcwire_application::dependencies::dep;
use svcwire_application::factory::{
    FactoryConfig, ServiceFactoryBuilder, ServiceFactoryOrBuilder, create_service_factory,
};
use svcwire_application::token::ServiceToken;
use svcwire_domain::InitializationStrategy;
use svcwire_infrastructure::config::RegistryConfig;
use svcwire_infrastructure::di::ServiceRegistry;

use crate::test_utils::{Counter, db_factory, db_token};

fn session_factory(
    token: &ServiceToken<String>,
    built: &Counter,
    initialization: InitializationStrategy,
) -> ServiceFactoryBuilder {
    let built = built.clone();
    create_service_factory(
        FactoryConfig::plugin(
            token,
            (dep("meta", plugin_metadata()),),
            move |(meta,): (Arc<PluginMetadata>,)| {
                built.bump();
                async move { Ok(Arc::new(format!("session-{}", meta.plugin_id()))) }
            },
        )
        .with_initialization(initialization)
        .into(),
    )
}

#[tokio::test]
async fn test_always_root_services_are_built_up_front() {
    let built = Counter::default();
    let db = db_token();
    let registry =
        ServiceRegistry::new(vec![ServiceFactoryOrBuilder::from(db_factory(&db, &built))])
            .unwrap();
    assert_eq!(built.get(), 0);

    registry.initialize_root_services().await.unwrap();
    assert_eq!(built.get(), 1);

    registry.get(&db, "plugin-a").await.unwrap();
    assert_eq!(built.get(), 1);
}

#[tokio::test]
async fn test_lazy_root_services_wait_for_a_request() {
    let built = Counter::default();
    let cache: ServiceToken<u32, svcwire_domain::Root> = ServiceToken::new("cache");
    let seen = built.clone();
    let factory = create_service_factory::<()>(
        FactoryConfig::root(&cache, (), move |()| {
            seen.bump();
            async { Ok(Arc::new(0u32)) }
        })
        .with_initialization(InitializationStrategy::Lazy)
        .into(),
    );
    let registry = ServiceRegistry::new(vec![ServiceFactoryOrBuilder::from(factory)]).unwrap();

    registry.initialize_root_services().await.unwrap();
    assert_eq!(built.get(), 0);

    registry.get(&cache, "plugin-a").await.unwrap();
    assert_eq!(built.get(), 1);
}

#[tokio::test]
async fn test_disabled_eager_initialization_keeps_everything_lazy() {
    let built = Counter::default();
    let db = db_token();
    let registry = ServiceRegistry::with_config(
        vec![ServiceFactoryOrBuilder::from(db_factory(&db, &built))],
        RegistryConfig {
            eager_initialization: false,
            ..RegistryConfig::default()
        },
    )
    .unwrap();

    registry.initialize_root_services().await.unwrap();
    assert_eq!(built.get(), 0);

    registry.get(&db, "plugin-a").await.unwrap();
    assert_eq!(built.get(), 1);
}

#[tokio::test]
async fn test_always_plugin_services_are_built_per_plugin() {
    let eager_built = Counter::default();
    let lazy_built = Counter::default();
    let eager: ServiceToken<String> = ServiceToken::new("eager-session");
    let lazy: ServiceToken<String> = ServiceToken::new("lazy-session");
    let registry = ServiceRegistry::new(vec![
        ServiceFactoryOrBuilder::from(session_factory(
            &eager,
            &eager_built,
            InitializationStrategy::Always,
        )),
        session_factory(&lazy, &lazy_built, InitializationStrategy::Lazy).into(),
    ])
    .unwrap();

    registry.initialize_root_services().await.unwrap();
    assert_eq!(eager_built.get(), 0);

    registry.initialize_plugin_services("plugin-a").await.unwrap();
    registry.initialize_plugin_services("plugin-b").await.unwrap();
    assert_eq!(eager_built.get(), 2);
    assert_eq!(lazy_built.get(), 0);

    let session = registry.get(&eager, "plugin-b").await.unwrap();
    assert_eq!(*session, "session-plugin-b");
    assert_eq!(eager_built.get(), 2);
}
