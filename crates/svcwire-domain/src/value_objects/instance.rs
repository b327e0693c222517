//! Type-erased service values
//!
//! Constructed services and root contexts travel through the resolution
//! engine without their concrete types. Both are stored as an `Arc<T>` boxed
//! behind `dyn Any`, which keeps trait-object contracts (`T = dyn Trait`)
//! downcastable.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared value with its concrete type erased
#[derive(Clone)]
pub struct ErasedValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// A constructed service instance
pub type ServiceInstance = ErasedValue;

/// A value produced by a root context constructor
pub type ContextValue = ErasedValue;

impl ErasedValue {
    /// Erase a shared value
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Recover the shared value, `None` when `T` is not the erased type
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Name of the erased type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles point at the same erased value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Root context handed to a plugin scoped instance constructor
///
/// `Absent` means the factory declared no root context constructor at all.
/// A declared constructor always yields `Provided`, even when the value it
/// produced is itself empty (an `Option::None` for example).
#[derive(Debug, Clone, Default)]
pub enum RootContextValue {
    /// No root context constructor was declared
    #[default]
    Absent,
    /// Value produced by the declared root context constructor
    Provided(ContextValue),
}

impl RootContextValue {
    /// Whether no root context constructor was declared
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The provided context value, if any
    pub fn as_provided(&self) -> Option<&ContextValue> {
        match self {
            Self::Absent => None,
            Self::Provided(value) => Some(value),
        }
    }
}
