//! # Application Layer
//!
//! The service registry contract: tokens, dependency projection, factory
//! declarations and the normalized descriptors a resolution engine consumes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`token`] | Typed service tokens and their erased form |
//! | [`dependencies`] | Dependency tuples and their compile-time projection |
//! | [`factory`] | Declaration builder, descriptor, scope validation |
//! | [`ports`] | Compile-time factory registration |
//! | [`core_services`] | Services provided by every registry |

pub mod core_services;
pub mod dependencies;
pub mod factory;
pub mod ports;
pub mod token;

pub use dependencies::{
    Dependency, DependencyMap, DependencySet, PluginScoped, ResolvedDependencies,
    RootDependencySet, dep,
};
pub use factory::{
    FactoryBody, FactoryConfig, FactoryDeclaration, ServiceFactory, ServiceFactoryBuilder,
    ServiceFactoryOrBuilder, create_service_factory,
};
pub use token::{
    AnyServiceToken, ServiceToken, TokenContract, TokenKey, TokenOptions, create_service_token,
};
