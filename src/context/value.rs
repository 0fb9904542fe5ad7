//! Keys and type-erased values carried by a context chain.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Lookup key for a context value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Name(Arc<str>),
    Index(u64),
    /// Keyed by a Rust type; the name is kept for display only.
    Typed(TypeId, &'static str),
}

impl ContextKey {
    /// Key identified by the type `T`.
    ///
    /// A private zero-sized marker type gives a key no other crate can construct.
    pub fn of<T: ?Sized + 'static>() -> Self {
        ContextKey::Typed(TypeId::of::<T>(), std::any::type_name::<T>())
    }
}

impl From<&str> for ContextKey {
    fn from(name: &str) -> Self {
        ContextKey::Name(Arc::from(name))
    }
}

impl From<String> for ContextKey {
    fn from(name: String) -> Self {
        ContextKey::Name(Arc::from(name))
    }
}

impl From<u64> for ContextKey {
    fn from(index: u64) -> Self {
        ContextKey::Index(index)
    }
}

impl From<u32> for ContextKey {
    fn from(index: u32) -> Self {
        ContextKey::Index(u64::from(index))
    }
}

impl From<usize> for ContextKey {
    fn from(index: usize) -> Self {
        ContextKey::Index(index as u64)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKey::Name(name) => write!(f, "key '{}'", name),
            ContextKey::Index(index) => write!(f, "key #{}", index),
            ContextKey::Typed(_, name) => write!(f, "key <{}>", name),
        }
    }
}

/// Shared, type-erased value.
#[derive(Clone)]
pub struct ContextValue(Arc<dyn Any + Send + Sync>);

impl ContextValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ContextValue(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContextValue(..)")
    }
}
