//! Built-in transform stages.
//!
//! The standard press pipeline consists of:
//!
//! 1. **MdMeta** - Parse frontmatter into each page's metadata bag
//! 2. **MdHtml** - Render each page's markdown body to HTML
//! 3. **TemplateDeps** - Resolve the template ancestor chain into dependencies

mod md_html;
mod md_meta;
mod template_deps;

pub use md_html::MdHtml;
pub use md_meta::MdMeta;
pub use template_deps::{DEFAULT_TEMPLATE, TemplateDeps, TemplateError};
