//! Request context carried by entries and handed to hooks
//!
//! A [`Context`] is an immutable chain of typed values. Deriving a new
//! context never changes the one it was derived from, so a context can be
//! shared freely between entries and threads.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

struct Node {
    key: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Typed value bag attached to an entry with `with_context`.
///
/// Values are keyed by their type: use a dedicated newtype per value so
/// that unrelated code cannot collide on the same key.
///
/// # Example
///
/// ```
/// use rust_log_facade::Context;
///
/// #[derive(Clone)]
/// struct RequestId(String);
///
/// let ctx = Context::new().with_value(RequestId("req-42".into()));
/// assert_eq!(ctx.value::<RequestId>().map(|r| r.0.as_str()), Some("req-42"));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// An empty context
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Derive a context that additionally carries `value`.
    ///
    /// A value of the same type already present is shadowed, not replaced.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Most recently attached value of type `T`.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        let key = TypeId::of::<T>();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if current.key == key {
                return current.value.downcast_ref::<T>();
            }
            node = current.parent.as_deref();
        }
        None
    }

    /// Whether no values have been attached
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Whether both handles refer to the same chain of values.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            names.push(current.type_name);
            node = current.parent.as_deref();
        }
        f.debug_struct("Context").field("values", &names).finish()
    }
}
