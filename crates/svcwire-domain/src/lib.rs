//! # Domain Layer
//!
//! Scopes, type-erased service values and the error taxonomy shared by the
//! application and infrastructure layers of svcwire.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Configuration, contract misuse and construction errors |
//! | [`value_objects`] | Scopes, initialization strategy, erased instances |
//! | [`constants`] | Well-known ids and discriminant tags |

pub mod constants;
pub mod error;
pub mod value_objects;

pub use error::{BoxError, ConstructionPhase, Error, Result};
pub use value_objects::*;
