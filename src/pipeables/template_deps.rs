//! Template dependency resolution stage.
//!
//! Follows a template's `extends` declarations to build the complete
//! ancestor chain for incremental-rebuild invalidation. Only template
//! *names* are resolved here; rendering them is a downstream concern.

use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;

use crate::press::{Page, Pipeable, PressContext, StageResult};

/// Template used when a page's metadata names none.
pub const DEFAULT_TEMPLATE: &str = "page.html";

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    NotFound { path: PathBuf, source: io::Error },

    #[error("cyclic template chain: {path} appears twice in its own ancestry")]
    Cycle { path: PathBuf },
}

/// Stage that resolves a page's template and its ancestor chain.
///
/// The template name comes from the page's `template` metadata, falling
/// back to [`DEFAULT_TEMPLATE`], and resolves against the context's
/// templates root. The page gains a `template` field and its
/// `dependencies` grow by the whole ancestor chain, nearest first.
/// Existing dependency entries are never dropped or reordered.
pub struct TemplateDeps;

impl Pipeable<Page> for TemplateDeps {
    fn name(&self) -> &'static str {
        "template-deps"
    }

    fn apply<'a>(&'a self, page: Page, ctx: &'a PressContext) -> BoxFuture<'a, StageResult<Page>> {
        Box::pin(std::future::ready(resolve(page, ctx)))
    }
}

fn resolve(mut page: Page, ctx: &PressContext) -> StageResult<Page> {
    let template = ctx
        .templates
        .join(page.template_name().unwrap_or(DEFAULT_TEMPLATE));

    let chain = ancestor_chain(&template)?;
    page.template = Some(template);
    page.dependencies.extend(chain);
    Ok(page)
}

/// Follow `extends` declarations from `start`, returning the chain ordered
/// from the starting template to the most distant ancestor.
///
/// An unreadable template is fatal ([`TemplateError::NotFound`]) rather
/// than a silently truncated chain. A path that reappears while resolving
/// is a configuration loop ([`TemplateError::Cycle`]); the chain itself is
/// the visited set.
fn ancestor_chain(start: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let mut chain: Vec<PathBuf> = Vec::new();
    let mut current = start.to_path_buf();

    loop {
        let source = std::fs::read_to_string(&current).map_err(|e| TemplateError::NotFound {
            path: current.clone(),
            source: e,
        })?;
        chain.push(current.clone());

        let Some(parent) = parent_template(&source) else {
            return Ok(chain);
        };

        // Parents resolve against the current template's directory, not the
        // templates root
        let parent = current.parent().unwrap_or(Path::new("")).join(parent);
        if chain.contains(&parent) {
            return Err(TemplateError::Cycle { path: parent });
        }
        current = parent;
    }
}

/// Scan template source for a `{% extends "…" %}` declaration line.
///
/// Accepts `{%-` trimming and single or double quotes. Returns the quoted
/// parent name of the first declaration found.
fn parent_template(source: &str) -> Option<String> {
    for line in source.lines() {
        let rest = line.trim_start();
        let Some(rest) = rest.strip_prefix("{%") else {
            continue;
        };
        let rest = rest.strip_prefix('-').unwrap_or(rest).trim_start();
        let Some(rest) = rest.strip_prefix("extends") else {
            continue;
        };
        let rest = rest.trim_start();

        let mut chars = rest.chars();
        let quote = match chars.next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let rest = chars.as_str();
        if let Some(end) = rest.find(quote) {
            return Some(rest[..end].to_string());
        }
    }
    None
}
