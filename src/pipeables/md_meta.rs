//! Frontmatter extraction stage.

use futures_util::future::BoxFuture;

use crate::press::{Page, Pipeable, PressContext, StageResult, parse_front_matter};

/// Stage that parses YAML frontmatter into the page's metadata bag.
///
/// Only `meta` is populated; the raw markdown on the page stays untouched.
/// Stages that need the body without the frontmatter block (like `MdHtml`)
/// run the scan themselves.
pub struct MdMeta;

impl Pipeable<Page> for MdMeta {
    fn name(&self) -> &'static str {
        "md-meta"
    }

    fn apply<'a>(&'a self, mut page: Page, _ctx: &'a PressContext) -> BoxFuture<'a, StageResult<Page>> {
        page.meta = parse_front_matter(&page.md).meta;
        Box::pin(std::future::ready(Ok(page)))
    }
}
