use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// Opaque frontmatter bag attached to a page.
///
/// The engine only reads the well-known optional keys `template` and `tags`;
/// everything else passes through untouched for downstream consumers.
pub type MdMeta = BTreeMap<String, serde_yaml::Value>;

/// One unit of content, derived from a directory in the content tree.
///
/// Pages are created once by the walker and then re-created by each transform
/// stage: a stage takes the page by value and returns a new one layered on
/// top of it, so no stage ever observes a half-written page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Identifier derived from the directory segment; the root page is ""
    pub name: String,
    /// URL-style path with a trailing separator; the root page is "/"
    pub path: String,
    /// Raw markdown source, never modified by the engine
    pub md: String,
    /// Frontmatter metadata, populated by the md-meta stage
    pub meta: MdMeta,
    /// File paths this page depends on, e.g. its template chain.
    ///
    /// Append-only: stages concatenate onto it and must never drop or
    /// reorder entries an earlier stage added.
    pub dependencies: Vec<PathBuf>,
    /// Resolved template path, set by the template-deps stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Rendered HTML, set by the md-html stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Extension slots for stages the engine doesn't know about
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Page {
    /// Create a raw page as the walker discovers it: source only, no
    /// metadata, no dependencies.
    pub fn raw(name: impl Into<String>, path: impl Into<String>, md: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            md: md.into(),
            meta: MdMeta::new(),
            dependencies: Vec::new(),
            template: None,
            html: None,
            extra: BTreeMap::new(),
        }
    }

    /// The template name from metadata, if one is set.
    pub fn template_name(&self) -> Option<&str> {
        self.meta.get("template").and_then(|value| value.as_str())
    }

    /// The page's tags from metadata.
    ///
    /// A missing `tags` key, a non-list value, or non-string list entries are
    /// treated as "no tags" rather than an error; metadata shape is an
    /// external concern and one malformed page must not abort a build.
    pub fn tags(&self) -> Vec<&str> {
        match self.meta.get("tags") {
            Some(serde_yaml::Value::Sequence(entries)) => {
                entries.iter().filter_map(|entry| entry.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Result of scanning a page source for frontmatter.
#[derive(Debug)]
pub struct ParsedSource {
    /// The parsed frontmatter (empty if none found)
    pub meta: MdMeta,
    /// The markdown content without the frontmatter block
    pub body: String,
}

/// Parse frontmatter from markdown source.
///
/// Frontmatter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// template: home.html
/// tags:
///   - vessel
/// ---
///
/// # Content starts here
/// ```
///
/// Returns the parsed metadata and the remaining content. Malformed YAML
/// warns on stderr and yields an empty bag; the page is still pressed.
pub fn parse_front_matter(source: &str) -> ParsedSource {
    let source = source.trim_start();

    if !source.starts_with("---") {
        return ParsedSource {
            meta: MdMeta::new(),
            body: source.to_string(),
        };
    }

    // Find the closing delimiter
    let after_opening = &source[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        // No closing delimiter, treat the entire source as markdown
        return ParsedSource {
            meta: MdMeta::new(),
            body: source.to_string(),
        };
    };

    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    // Skip past the closing delimiter and its newline
    let body_start = 3 + closing_pos + 4;
    let body = if body_start < source.len() {
        source[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let meta = match serde_yaml::from_str(yaml_content) {
        Ok(meta) => meta,
        Err(e) => {
            eprintln!("Warning: failed to parse frontmatter: {}", e);
            MdMeta::new()
        }
    };

    ParsedSource { meta, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter_basic() {
        let source = "---\ntemplate: 'home.html'\n---\n\n# Beverage vessels\n\nWelcome!";
        let parsed = parse_front_matter(source);
        assert_eq!(
            parsed.meta.get("template"),
            Some(&serde_yaml::Value::String("home.html".to_string()))
        );
        assert_eq!(parsed.body, "# Beverage vessels\n\nWelcome!");
    }

    #[test]
    fn test_parse_front_matter_tags() {
        let source = "---\nheadline: French press\ntags:\n - vessel\n---\n\n# French press";
        let parsed = parse_front_matter(source);
        assert!(parsed.meta.contains_key("headline"));
        assert!(parsed.meta.contains_key("tags"));
        assert!(parsed.body.starts_with("# French press"));
    }

    #[test]
    fn test_parse_front_matter_none() {
        let source = "# Just Markdown\n\nNo frontmatter here.";
        let parsed = parse_front_matter(source);
        assert!(parsed.meta.is_empty());
        assert!(parsed.body.starts_with("# Just Markdown"));
    }

    #[test]
    fn test_parse_front_matter_empty() {
        let source = "---\n---\n\n# Content";
        let parsed = parse_front_matter(source);
        assert!(parsed.meta.is_empty());
        assert!(parsed.body.starts_with("# Content"));
    }

    #[test]
    fn test_parse_front_matter_malformed_yaml_recovers() {
        let source = "---\n[not: valid: yaml\n---\n\n# Content";
        let parsed = parse_front_matter(source);
        assert!(parsed.meta.is_empty());
        assert!(parsed.body.starts_with("# Content"));
    }

    #[test]
    fn test_template_name() {
        let mut page = Page::raw("", "/", "");
        assert_eq!(page.template_name(), None);
        page.meta.insert(
            "template".to_string(),
            serde_yaml::Value::String("home.html".to_string()),
        );
        assert_eq!(page.template_name(), Some("home.html"));
    }

    #[test]
    fn test_tags_filters_non_strings() {
        let source = "---\ntags:\n - vessel\n - 3\n - kettle\n---\n";
        let mut page = Page::raw("tea-pot", "/tea-pot/", source);
        page.meta = parse_front_matter(source).meta;
        assert_eq!(page.tags(), vec!["vessel", "kettle"]);
    }

    #[test]
    fn test_tags_malformed_is_empty() {
        let mut page = Page::raw("tea-pot", "/tea-pot/", "");
        page.meta.insert(
            "tags".to_string(),
            serde_yaml::Value::String("vessel".to_string()),
        );
        assert!(page.tags().is_empty());
    }
}
