//! Service registry resolution tests

use std::sync::Arc;

use svcwire_application::core_services::plugin_metadata;
use svcwire_application::dependencies::dep;
use svcwire_application::factory::{FactoryConfig, ServiceFactoryOrBuilder, create_service_factory};
use svcwire_application::token::ServiceToken;
use svcwire_domain::error::{BoxError, ConstructionPhase, Error};
use svcwire_domain::Root;
use svcwire_infrastructure::di::ServiceRegistry;

use crate::test_utils::{
    Counter, Logger, Pool, db_factory, db_token, logger_factory, logger_token,
};

fn logger_registry(db_built: &Counter, contexts: &Counter, instances: &Counter) -> (
    ServiceRegistry,
    ServiceToken<Pool, Root>,
    ServiceToken<dyn Logger>,
) {
    let db = db_token();
    let logger = logger_token();
    let factories: Vec<ServiceFactoryOrBuilder> = vec![
        db_factory(&db, db_built).into(),
        logger_factory(&logger, &db, contexts, instances).into(),
    ];
    let registry = ServiceRegistry::new(factories).unwrap();
    (registry, db, logger)
}

#[tokio::test]
async fn test_plugins_share_root_context_but_not_instances() {
    let (db_built, contexts, instances) = (Counter::default(), Counter::default(), Counter::default());
    let (registry, _, logger) = logger_registry(&db_built, &contexts, &instances);

    let first = registry.get(&logger, "plugin-a").await.unwrap();
    let second = registry.get(&logger, "plugin-b").await.unwrap();
    let again = registry.get(&logger, "plugin-a").await.unwrap();

    assert_eq!(first.plugin_id(), "plugin-a");
    assert_eq!(second.plugin_id(), "plugin-b");
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &again));

    assert!(std::ptr::eq(first.sink(), second.sink()));
    assert_eq!(first.sink().target, "postgres://localhost/app");
    assert_eq!(contexts.get(), 1);
    assert_eq!(instances.get(), 2);
    assert_eq!(db_built.get(), 1);
}

#[tokio::test]
async fn test_root_services_are_shared_by_every_plugin() {
    let built = Counter::default();
    let db = db_token();
    let registry =
        ServiceRegistry::new(vec![ServiceFactoryOrBuilder::from(db_factory(&db, &built))])
            .unwrap();

    let from_a = registry.get(&db, "plugin-a").await.unwrap();
    let from_b = registry.get(&db, "plugin-b").await.unwrap();

    assert!(Arc::ptr_eq(&from_a, &from_b));
    assert_eq!(built.get(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_constructions() {
    let (db_built, contexts, instances) = (Counter::default(), Counter::default(), Counter::default());
    let (registry, _, logger) = logger_registry(&db_built, &contexts, &instances);
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let logger = logger.clone();
            let plugin = if i % 2 == 0 { "plugin-a" } else { "plugin-b" };
            tokio::spawn(async move { registry.get(&logger, plugin).await })
        })
        .collect();

    let mut loggers = Vec::new();
    for handle in handles {
        loggers.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(contexts.get(), 1);
    assert_eq!(instances.get(), 2);
    assert_eq!(db_built.get(), 1);
    assert!(loggers.iter().all(|l| l.sink().id == 0));
}

#[tokio::test]
async fn test_plugin_metadata_is_built_in() {
    let registry = ServiceRegistry::new(Vec::<ServiceFactoryOrBuilder>::new()).unwrap();

    let meta = registry.get(plugin_metadata(), "plugin-a").await.unwrap();
    let again = registry.get(plugin_metadata(), "plugin-a").await.unwrap();
    let other = registry.get(plugin_metadata(), "plugin-b").await.unwrap();

    assert_eq!(meta.plugin_id(), "plugin-a");
    assert_eq!(other.plugin_id(), "plugin-b");
    assert!(Arc::ptr_eq(&meta, &again));
}

#[tokio::test]
async fn test_unknown_token_is_a_missing_service() {
    let registry = ServiceRegistry::new(Vec::<ServiceFactoryOrBuilder>::new()).unwrap();
    let cache: ServiceToken<u8, Root> = ServiceToken::new("cache");

    let err = registry.get(&cache, "plugin-a").await.unwrap_err();

    assert!(matches!(
        err,
        Error::MissingService { ref token_id, ref plugin_id }
            if token_id == "cache" && plugin_id == "plugin-a"
    ));
}

#[tokio::test]
async fn test_missing_dependencies_are_reported_together() {
    let db = db_token();
    let cache: ServiceToken<u8, Root> = ServiceToken::new("cache");
    let report: ServiceToken<String, Root> = ServiceToken::new("report");

    let factory = create_service_factory::<()>(
        FactoryConfig::root(
            &report,
            (dep("db", &db), dep("cache", &cache)),
            |(pool, cache): (Arc<Pool>, Arc<u8>)| async move {
                Ok(Arc::new(format!("{} {cache}", pool.url)))
            },
        )
        .into(),
    );
    let registry = ServiceRegistry::new(vec![ServiceFactoryOrBuilder::from(factory)]).unwrap();

    let err = registry.get(&report, "plugin-a").await.unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(err.token_id(), Some("report"));
    let message = err.to_string();
    assert!(message.contains("'db'"));
    assert!(message.contains("'cache'"));
}

#[test]
fn test_duplicate_factories_are_rejected() {
    let built = Counter::default();
    let db = db_token();

    let err = ServiceRegistry::new(vec![
        ServiceFactoryOrBuilder::from(db_factory(&db, &built)),
        db_factory(&db, &built).into(),
    ])
    .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("Duplicate"));
}

#[test]
fn test_distinct_tokens_must_not_share_an_id() {
    let built = Counter::default();
    let first = db_token();
    let second = db_token();

    let err = ServiceRegistry::new(vec![
        ServiceFactoryOrBuilder::from(db_factory(&first, &built)),
        db_factory(&second, &built).into(),
    ])
    .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(err.token_id(), Some("db"));
}

#[tokio::test]
async fn test_failed_construction_is_retried() {
    let attempts = Counter::default();
    let flaky: ServiceToken<u32, Root> = ServiceToken::new("flaky");

    let seen = attempts.clone();
    let factory = create_service_factory::<()>(
        FactoryConfig::root(&flaky, (), move |()| {
            let attempt = seen.bump();
            async move {
                if attempt == 0 {
                    Err::<Arc<u32>, BoxError>("warming up".into())
                } else {
                    Ok(Arc::new(7))
                }
            }
        })
        .into(),
    );
    let registry = ServiceRegistry::new(vec![ServiceFactoryOrBuilder::from(factory)]).unwrap();

    let err = registry.get(&flaky, "plugin-a").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Construction {
            phase: ConstructionPhase::Instance,
            ..
        }
    ));

    assert_eq!(*registry.get(&flaky, "plugin-a").await.unwrap(), 7);
    assert_eq!(attempts.get(), 2);
}

#[test]
fn test_introspection() {
    let (db_built, contexts, instances) = (Counter::default(), Counter::default(), Counter::default());
    let (registry, db, logger) = logger_registry(&db_built, &contexts, &instances);
    let unknown: ServiceToken<u8> = ServiceToken::new("unknown");

    assert!(registry.has_factory(db.as_any()));
    assert!(registry.has_factory(logger.as_any()));
    assert!(!registry.has_factory(unknown.as_any()));
    assert!(!registry.has_factory(plugin_metadata().as_any()));

    let ids: Vec<String> = registry
        .registered_tokens()
        .iter()
        .map(|token| token.id().to_string())
        .collect();
    assert_eq!(ids, ["db", "logger"]);

    let descriptor = registry.factory(logger.as_any()).unwrap();
    assert!(descriptor.root_context_constructor().is_some());
}
