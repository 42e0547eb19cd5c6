use std::fmt::Debug;

/// A trait for types that can be stored in the context.
/// Any type that is Clone, Send, Sync and 'static can be stored in the context.
pub trait ContextValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> ContextValue for T {}

/// The per-request context handed to hooks, wrapping `http::Extensions`.
///
/// A `Context` is built from the extensions of the incoming HTTP request, so any
/// value an enclosing middleware stored there (authentication claims, a request id,
/// ...) is visible to the `on_request` and `on_result` hooks. The service stores the
/// context back into the extensions of the HTTP response it produces.
///
/// ```rust
/// use graphql_service::Context;
///
/// let mut context = Context::default();
/// context.insert("test_value".to_string());
/// context.insert(42i32);
///
/// assert_eq!(context.get::<String>(), Some("test_value".to_string()));
/// assert_eq!(context.get::<i32>(), Some(42));
/// ```
///
/// Values are cloned when retrieved. For types that are expensive to clone,
/// wrap them in an `Arc` before storing them.
#[derive(Clone, Default)]
pub struct Context {
    inner: http::Extensions,
}

impl Context {
    /// Creates a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value from the context by type.
    /// The value is cloned when retrieved.
    pub fn get<T: ContextValue>(&self) -> Option<T> {
        self.inner.get::<T>().cloned()
    }

    /// Returns true if a value of type `T` is present.
    pub fn contains<T: ContextValue>(&self) -> bool {
        self.inner.get::<T>().is_some()
    }

    /// Inserts a value into the context.
    /// If a value of the same type already exists, it will be overwritten.
    pub fn insert<T: ContextValue>(&mut self, value: T) {
        self.inner.insert(value);
    }

    /// Removes a value from the context by type.
    /// Returns the removed value if it existed.
    pub fn remove<T: ContextValue>(&mut self) -> Option<T> {
        self.inner.remove::<T>()
    }
}

impl From<Context> for http::Extensions {
    fn from(context: Context) -> Self {
        context.inner
    }
}

impl From<http::Extensions> for Context {
    fn from(extensions: http::Extensions) -> Self {
        Self { inner: extensions }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("inner", &"http::Extensions")
            .finish()
    }
}
