//! Press orchestrator: walk, transform, fold.

use std::path::Path;

use serde_json::Value;

use crate::pipeables::{MdHtml, MdMeta, TemplateDeps};
use crate::reducers::TagIndex;

use super::context::PressContext;
use super::fold::{ContextMap, Fold, FoldError, Reduce};
use super::page::Page;
use super::pipe::{Pipe, PipeError, Pipeable};
use super::walk::{WalkError, walk};

/// Errors that can abort a press run.
///
/// Any of these surfaces to the caller with no partial result: a failing
/// press run produces no pages and no context, and rerunning it has no side
/// effects to undo.
#[derive(thiserror::Error, Debug)]
pub enum PressError {
    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("stage error: {0}")]
    Stage(#[from] PipeError),

    #[error("reducer error: {0}")]
    Fold(#[from] FoldError),
}

/// Result of a press run: the final pages in walker order, and the
/// finalized context.
#[derive(Debug)]
pub struct Pressed {
    pub pages: Vec<Page>,
    pub context: ContextMap,
}

/// The top-level entry point for a press run.
///
/// A press carries the stage context, an item pipe, a reducer set, and the
/// context seed. `run` drives them: walk the content tree, then for each
/// page in walker order apply the pipe and fold the transformed page into
/// the accumulated context before moving to the next page.
pub struct Press {
    context: PressContext,
    pipe: Pipe<Page>,
    fold: Fold<Page>,
    seed: ContextMap,
}

impl Press {
    /// Create a press with no transforms and no reducers.
    ///
    /// Running it passes pages through unchanged and finalizes the context
    /// equal to the seed (empty unless [`Press::seed`] is called).
    pub fn new(context: PressContext) -> Self {
        Self {
            context,
            pipe: Pipe::new(),
            fold: Fold::new(),
            seed: ContextMap::new(),
        }
    }

    /// Create the standard press pipeline.
    ///
    /// Stages: md-meta → md-html → template-deps, with the tag index reducer
    /// folding a `tags` grouping seeded with an empty index.
    pub fn default_pipeline(context: PressContext) -> Self {
        let mut seed = ContextMap::new();
        seed.insert("tags".to_string(), Value::Object(Default::default()));

        Self::new(context)
            .transform(MdMeta)
            .transform(MdHtml)
            .transform(TemplateDeps)
            .seed(seed)
            .reduce(TagIndex)
    }

    /// Append a transform stage to the item pipe.
    pub fn transform(mut self, stage: impl Pipeable<Page> + 'static) -> Self {
        self.pipe = self.pipe.then(stage);
        self
    }

    /// Set the context seed.
    pub fn seed(mut self, seed: ContextMap) -> Self {
        self.seed = seed;
        self
    }

    /// Register a context reducer.
    pub fn reduce(mut self, reducer: impl Reduce<Page> + 'static) -> Self {
        self.fold = self.fold.with(reducer);
        self
    }

    /// Run the press over a content tree.
    ///
    /// 1. Walk the tree into raw pages.
    /// 2. Per page, in walker order: apply the pipe, then fold the final
    ///    transformed page (not the raw one) into the context.
    ///
    /// Any stage or reducer failure aborts the run and surfaces here.
    pub async fn run(&self, content_root: &Path) -> Result<Pressed, PressError> {
        let raw = walk(content_root)?;

        let mut pages = Vec::with_capacity(raw.len());
        let mut context = self.seed.clone();

        for page in raw {
            let page = self.pipe.run(page, &self.context).await?;
            self.fold.step(&page, &mut context).await?;
            pages.push(page);
        }

        Ok(Pressed { pages, context })
    }
}
