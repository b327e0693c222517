//! Runtime scope and shape checks
//!
//! Typed constructors already enforce these rules at compile time. Configs
//! assembled from erased parts, and descriptors handed to the engine, go
//! through the same checks at runtime.

use svcwire_domain::error::{Error, Result};
use svcwire_domain::value_objects::ServiceScope;

use crate::dependencies::DependencyMap;
use crate::factory::config::{FactoryBody, FactoryConfig};
use crate::token::AnyServiceToken;

/// Reject dependencies a service of this scope may not have
///
/// Root services may only depend on root tokens; plugin services may depend
/// on tokens of either scope.
pub fn validate_scope_constraints(
    service: &AnyServiceToken,
    dependencies: &DependencyMap,
) -> Result<()> {
    let offending: Vec<String> = dependencies
        .iter()
        .filter(|(_, token)| !service.scope().may_depend_on(token.scope()))
        .map(|(name, token)| format!("'{name}' ({token}, {} scoped)", token.scope()))
        .collect();

    if offending.is_empty() {
        return Ok(());
    }
    Err(Error::configuration_for(
        service.id(),
        format!(
            "{} scoped service {service} may only depend on root scoped services, but depends on {}",
            service.scope(),
            offending.join(", ")
        ),
    ))
}

/// Check a config before it is normalized into a descriptor
pub fn validate_declaration(config: &FactoryConfig) -> Result<()> {
    let service = config.service();
    if service.id().trim().is_empty() {
        return Err(Error::configuration_for(
            service.id(),
            "service token id must not be empty",
        ));
    }

    if let Some((name, _)) = config
        .dependencies()
        .iter()
        .find(|(name, token)| name.trim().is_empty() || token.id().trim().is_empty())
    {
        return Err(Error::configuration_for(
            service.id(),
            format!("{service} declares dependency '{name}' with an empty name or token id"),
        ));
    }

    let duplicates = config.dependencies().duplicate_names();
    if !duplicates.is_empty() {
        return Err(Error::configuration_for(
            service.id(),
            format!(
                "{service} declares duplicate dependency name(s): {}",
                duplicates.join(", ")
            ),
        ));
    }

    match (service.scope(), config.body()) {
        (ServiceScope::Root, FactoryBody::Root { .. })
        | (ServiceScope::Plugin, FactoryBody::Plugin { .. }) => {}
        (scope, FactoryBody::Root { .. }) => {
            return Err(Error::configuration_for(
                service.id(),
                format!("{scope} scoped service {service} was declared with a root factory body"),
            ));
        }
        (scope, FactoryBody::Plugin { .. }) => {
            return Err(Error::configuration_for(
                service.id(),
                format!("{scope} scoped service {service} was declared with a plugin factory body"),
            ));
        }
    }

    validate_scope_constraints(service, config.dependencies())
}
