//! Stage combinator for page transforms.
//!
//! A pipe chains transform stages, sync or async, into one awaitable
//! transform. Stages run strictly in sequence: each stage's result is
//! awaited before the next stage starts, so ordering is deterministic
//! no matter which stages suspend.

use futures_util::future::BoxFuture;

use super::context::PressContext;

/// Errors that can occur while applying transform stages.
#[derive(thiserror::Error, Debug)]
pub enum PipeError {
    #[error("template error: {0}")]
    Template(#[from] crate::pipeables::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipeError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

pub type StageResult<T> = Result<T, PipeError>;

/// A single transform stage in a pipe.
///
/// A stage takes the current value and the shared read-only context and
/// produces a new value. "Async" means deferred completion, not
/// concurrency: the pipe awaits each stage before running the next.
pub trait Pipeable<T>: Send + Sync {
    /// Stage name, used in failure diagnostics.
    fn name(&self) -> &'static str;

    /// Transform the value. The context is the same for every stage.
    fn apply<'a>(&'a self, value: T, ctx: &'a PressContext) -> BoxFuture<'a, StageResult<T>>;
}

/// An ordered chain of transform stages composed into one.
///
/// A pipe with no stages is the identity transform. A stage failure
/// aborts the whole pipe: the error propagates and no later stage runs.
pub struct Pipe<T> {
    stages: Vec<Box<dyn Pipeable<T>>>,
}

impl<T: Send> Pipe<T> {
    /// Create an empty pipe.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the pipe.
    pub fn then(mut self, stage: impl Pipeable<T> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run the value through every stage in order.
    pub async fn run(&self, value: T, ctx: &PressContext) -> StageResult<T> {
        let mut value = value;
        for stage in &self.stages {
            value = stage.apply(value, ctx).await?;
        }
        Ok(value)
    }
}

impl<T: Send> Default for Pipe<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A pipe is itself a stage, so pipes nest: chaining `[a, b, c]` is
/// equivalent to chaining `[a]` with a nested pipe of `[b, c]`.
impl<T: Send + 'static> Pipeable<T> for Pipe<T> {
    fn name(&self) -> &'static str {
        "pipe"
    }

    fn apply<'a>(&'a self, value: T, ctx: &'a PressContext) -> BoxFuture<'a, StageResult<T>> {
        Box::pin(self.run(value, ctx))
    }
}

/// Adapt a plain synchronous function into a named stage.
pub fn stage<T, F>(name: &'static str, f: F) -> FnStage<F>
where
    T: Send + 'static,
    F: Fn(T, &PressContext) -> StageResult<T> + Send + Sync,
{
    FnStage { name, f }
}

/// A stage backed by a synchronous function. See [`stage`].
pub struct FnStage<F> {
    name: &'static str,
    f: F,
}

impl<T, F> Pipeable<T> for FnStage<F>
where
    T: Send + 'static,
    F: Fn(T, &PressContext) -> StageResult<T> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply<'a>(&'a self, value: T, ctx: &'a PressContext) -> BoxFuture<'a, StageResult<T>> {
        Box::pin(std::future::ready((self.f)(value, ctx)))
    }
}
