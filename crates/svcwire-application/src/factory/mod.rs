//! Factory declarations and descriptors
//!
//! ```text
//! FactoryDeclaration (fixed | parameterized)
//!          │ create_service_factory()
//!          ▼
//! ServiceFactoryBuilder ── build(options?) ──► ServiceFactory (descriptor)
//!                                                   │
//!                                                   ▼
//!                                          resolution engine
//! ```

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod validation;

pub use builder::{
    ErasedFactoryBuilder, FactoryDeclaration, ServiceFactoryBuilder, ServiceFactoryOrBuilder,
    create_service_factory,
};
pub use config::{FactoryBody, FactoryConfig};
pub use descriptor::{InstanceConstructor, RootContextConstructor, ServiceFactory};
pub use validation::{validate_declaration, validate_scope_constraints};
