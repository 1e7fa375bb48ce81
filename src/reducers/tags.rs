//! Tag index reducer: groups pages by their tag metadata.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::press::{FoldError, Page, Reduce};

/// Reducer that groups pages under the `tags` context key.
///
/// Each folded page is appended to the list for every string tag it
/// carries, creating the list on first encounter, in fold order. Missing
/// or malformed tag metadata contributes nothing rather than failing the
/// run; non-string entries in a tag list are skipped.
pub struct TagIndex;

impl Reduce<Page> for TagIndex {
    fn key(&self) -> &str {
        "tags"
    }

    fn reduce<'a>(&'a self, page: &'a Page, previous: Value) -> BoxFuture<'a, Result<Value, FoldError>> {
        Box::pin(std::future::ready(index_page(page, previous)))
    }
}

fn index_page(page: &Page, previous: Value) -> Result<Value, FoldError> {
    // A missing or non-object slot starts a fresh index
    let mut index = match previous {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let tags = page.tags();
    if tags.is_empty() {
        return Ok(Value::Object(index));
    }

    let entry = serde_json::to_value(page)?;
    for tag in tags {
        let slot = index
            .entry(tag.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(pages) => pages.push(entry.clone()),
            other => *other = Value::Array(vec![entry.clone()]),
        }
    }

    Ok(Value::Object(index))
}
