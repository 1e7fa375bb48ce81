//! Context fold engine.
//!
//! Applies named reducers across all pages in traversal order, building an
//! accumulated context value. Each reducer owns exactly one context key and
//! never observes another key's value, so reducers cannot couple to each
//! other. Reducers may be sync or async; each application is awaited before
//! the next, so fold order equals input order regardless of asynchrony.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

/// The fold's running aggregate: one slot per reducer key.
///
/// Created from the seed at the start of a run, replaced slot-by-slot as
/// reducers apply, and returned by value (frozen) once all items are folded.
pub type ContextMap = Map<String, Value>;

/// Errors that can occur while folding the context.
#[derive(thiserror::Error, Debug)]
pub enum FoldError {
    #[error("reducer '{key}' failed: {message}")]
    Reducer { key: String, message: String },

    #[error("failed to serialize item into the context: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FoldError {
    /// Create a reducer-specific error.
    pub fn reducer(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reducer {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A named reducer folding one item into one context field.
pub trait Reduce<T>: Send + Sync {
    /// The context key this reducer owns.
    fn key(&self) -> &str;

    /// Fold one item into the previous value of this reducer's field.
    ///
    /// `previous` is an owned clone of the slot: reducers return the next
    /// value rather than mutating shared state, so the accumulator is never
    /// aliased between applications.
    fn reduce<'a>(&'a self, item: &'a T, previous: Value) -> BoxFuture<'a, Result<Value, FoldError>>;
}

/// An ordered set of reducers applied to every folded item.
pub struct Fold<T> {
    reducers: Vec<Box<dyn Reduce<T>>>,
}

impl<T> Fold<T> {
    /// Create a fold with no reducers.
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Register a reducer.
    pub fn with(mut self, reducer: impl Reduce<T> + 'static) -> Self {
        self.reducers.push(Box::new(reducer));
        self
    }

    /// Fold a single item into the context.
    ///
    /// Every reducer is applied to its own key slot, in registration order,
    /// each awaited before the next. A slot that is absent from the context
    /// starts from `Value::Null`; seeds provide starting values by being the
    /// context's initial state.
    pub async fn step(&self, item: &T, context: &mut ContextMap) -> Result<(), FoldError> {
        for reducer in &self.reducers {
            let key = reducer.key();
            let previous = context.get(key).cloned().unwrap_or(Value::Null);
            let next = reducer.reduce(item, previous).await?;
            context.insert(key.to_string(), next);
        }
        Ok(())
    }

    /// Fold all items, in order, starting from the seed.
    ///
    /// With no reducers registered the result equals the seed. A reducer
    /// failure aborts the fold; the partial context is discarded.
    pub async fn run(&self, items: &[T], seed: ContextMap) -> Result<ContextMap, FoldError> {
        let mut context = seed;
        for item in items {
            self.step(item, &mut context).await?;
        }
        Ok(context)
    }
}

impl<T> Default for Fold<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapt a plain synchronous function into a named reducer.
pub fn reducer<T, F>(key: impl Into<String>, f: F) -> FnReducer<F>
where
    T: Sync,
    F: Fn(&T, Value) -> Result<Value, FoldError> + Send + Sync,
{
    FnReducer { key: key.into(), f }
}

/// A reducer backed by a synchronous function. See [`reducer`].
pub struct FnReducer<F> {
    key: String,
    f: F,
}

impl<T, F> Reduce<T> for FnReducer<F>
where
    T: Sync,
    F: Fn(&T, Value) -> Result<Value, FoldError> + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn reduce<'a>(&'a self, item: &'a T, previous: Value) -> BoxFuture<'a, Result<Value, FoldError>> {
        Box::pin(std::future::ready((self.f)(item, previous)))
    }
}
