//! Bootstrap tests

use std::sync::{Arc, LazyLock};

use linkme::distributed_slice;
use svcwire_application::factory::{FactoryConfig, ServiceFactoryOrBuilder, create_service_factory};
use svcwire_application::ports::registry::{SERVICE_FACTORIES, ServiceFactoryEntry};
use svcwire_application::token::ServiceToken;
use svcwire_domain::Root;
use svcwire_infrastructure::config::{AppConfig, ConfigBuilder, LoggingConfig};
use svcwire_infrastructure::di::{RegistryInitializer, init_registry};

use crate::test_utils::{Counter, db_factory, db_token};

static BUILD_INFO: LazyLock<ServiceToken<String, Root>> =
    LazyLock::new(|| ServiceToken::new("build-info"));

fn build_info_factory() -> ServiceFactoryOrBuilder {
    create_service_factory::<()>(
        FactoryConfig::root(&*BUILD_INFO, (), |()| async {
            Ok(Arc::new(format!("svcwire {}", env!("CARGO_PKG_VERSION"))))
        })
        .into(),
    )
    .into()
}

#[distributed_slice(SERVICE_FACTORIES)]
static BUILD_INFO_FACTORY: ServiceFactoryEntry = ServiceFactoryEntry {
    name: "build-info",
    description: "Crate version string",
    factory: build_info_factory,
};

#[tokio::test]
async fn test_init_registry_combines_registered_and_explicit_factories() {
    let built = Counter::default();
    let db = db_token();

    let registry = init_registry(
        &AppConfig::default(),
        vec![ServiceFactoryOrBuilder::from(db_factory(&db, &built))],
    )
    .await
    .unwrap();

    assert!(registry.has_factory(BUILD_INFO.as_any()));
    assert!(registry.has_factory(db.as_any()));
    assert_eq!(built.get(), 1);

    let info = registry.get(&*BUILD_INFO, "plugin-a").await.unwrap();
    assert!(info.starts_with("svcwire "));
}

#[tokio::test]
async fn test_explicit_factory_cannot_duplicate_a_registered_one() {
    let err = init_registry(&AppConfig::default(), vec![build_info_factory()])
        .await
        .unwrap_err();

    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_initializer_rejects_invalid_log_level() {
    let config = ConfigBuilder::new()
        .with_logging(LoggingConfig {
            level: "chatty".to_string(),
            json_format: false,
        })
        .build();

    let err = RegistryInitializer::new(config)
        .initialize(Vec::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("chatty"));
}

#[tokio::test]
async fn test_initializer_builds_the_registry() {
    let initializer = RegistryInitializer::new(AppConfig::default());

    let registry = initializer.initialize(Vec::new()).await.unwrap();

    assert_eq!(initializer.config(), &AppConfig::default());
    assert!(registry.has_factory(BUILD_INFO.as_any()));
}
