//! Markdown rendering stage.

use futures_util::future::BoxFuture;
use pulldown_cmark::{Options, Parser, html};

use crate::press::{Page, Pipeable, PressContext, StageResult, parse_front_matter};

/// Stage that renders each page's markdown body to HTML.
///
/// The frontmatter block is stripped before rendering so metadata never
/// leaks into the output. The rendered fragment lands in `html`; `md` and
/// `dependencies` are untouched.
pub struct MdHtml;

impl Pipeable<Page> for MdHtml {
    fn name(&self) -> &'static str {
        "md-html"
    }

    fn apply<'a>(&'a self, mut page: Page, _ctx: &'a PressContext) -> BoxFuture<'a, StageResult<Page>> {
        let body = parse_front_matter(&page.md).body;

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(&body, options);
        let mut rendered = String::new();
        html::push_html(&mut rendered, parser);

        page.html = Some(rendered);
        Box::pin(std::future::ready(Ok(page)))
    }
}
