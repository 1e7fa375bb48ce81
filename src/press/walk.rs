//! Content tree discovery.

use std::io;
use std::path::{Path, PathBuf};

use super::page::Page;

/// The file a page-bearing directory is read from.
pub const PAGE_SOURCE: &str = "index.md";

#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    #[error("content root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("content root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry { path: PathBuf, source: io::Error },

    #[error("failed to read page source {path}: {source}")]
    ReadPage { path: PathBuf, source: io::Error },
}

/// Walk a content tree and produce one raw page per page-bearing directory.
///
/// A directory bears a page iff it contains an `index.md`; other files are
/// ignored and subdirectories are always recursed into. The root directory
/// maps to `name = ""` and `path = "/"`; every other directory maps to its
/// segment and the `/`-joined ancestor chain with a trailing separator.
///
/// Ordering contract: depth-first, a directory before its children, siblings
/// in lexical order. The fold engine and any order-sensitive reducer depend
/// on this being stable.
pub fn walk(root: &Path) -> Result<Vec<Page>, WalkError> {
    if !root.exists() {
        return Err(WalkError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()));
    }

    let mut pages = Vec::new();
    walk_directory(root, "", "/", &mut pages)?;
    Ok(pages)
}

/// Recursively walk a directory, collecting pages in traversal order.
fn walk_directory(
    dir: &Path,
    name: &str,
    url_path: &str,
    pages: &mut Vec<Page>,
) -> Result<(), WalkError> {
    let source = dir.join(PAGE_SOURCE);
    if source.is_file() {
        let md = std::fs::read_to_string(&source).map_err(|e| WalkError::ReadPage {
            path: source.clone(),
            source: e,
        })?;
        pages.push(Page::raw(name, url_path, md));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| WalkError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WalkError::ReadEntry {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let segment = entry.file_name().to_string_lossy().to_string();

        // Skip hidden directories
        if segment.starts_with('.') {
            continue;
        }

        if entry.path().is_dir() {
            children.push((segment, entry.path()));
        }
    }

    // read_dir order is platform-dependent; lexical sibling order keeps the
    // walk deterministic
    children.sort();

    for (segment, path) in children {
        let child_path = format!("{url_path}{segment}/");
        walk_directory(&path, &segment, &child_path, pages)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("index.md"),
            "---\ntemplate: 'home.html'\n---\n\n# Beverage vessels\n\nWelcome!",
        )
        .unwrap();

        let french_press = dir.path().join("french-press");
        std::fs::create_dir(&french_press).unwrap();
        std::fs::write(
            french_press.join("index.md"),
            "---\nheadline: French press\ntags:\n - vessel\n---\n\n# French press",
        )
        .unwrap();

        let tea_pot = dir.path().join("tea-pot");
        std::fs::create_dir(&tea_pot).unwrap();
        std::fs::write(
            tea_pot.join("index.md"),
            "---\nheadline: Tea pot\ntags:\n - vessel\n---\n\n# Tea pot",
        )
        .unwrap();

        dir
    }

    #[test]
    fn test_walk_discovers_each_directory_in_order() {
        let dir = fixture();
        let pages = walk(dir.path()).unwrap();

        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["", "french-press", "tea-pot"]);

        let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/french-press/", "/tea-pot/"]);
    }

    #[test]
    fn test_walk_produces_raw_pages() {
        let dir = fixture();
        let pages = walk(dir.path()).unwrap();

        assert!(pages[1].md.contains("# French press"));
        for page in &pages {
            assert!(page.meta.is_empty());
            assert!(page.dependencies.is_empty());
            assert!(page.html.is_none());
        }
    }

    #[test]
    fn test_walk_nested_paths_keep_trailing_separator() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("brewing").join("cold-brew");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("index.md"), "# Cold brew").unwrap();

        let pages = walk(dir.path()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "cold-brew");
        assert_eq!(pages[0].path, "/brewing/cold-brew/");
    }

    #[test]
    fn test_walk_skips_directories_without_a_page_source() {
        let dir = fixture();
        std::fs::create_dir(dir.path().join("assets")).unwrap();

        let pages = walk(dir.path()).unwrap();
        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["", "french-press", "tea-pot"]);
    }

    #[test]
    fn test_walk_skips_hidden_directories() {
        let dir = fixture();
        let drafts = dir.path().join(".drafts");
        std::fs::create_dir(&drafts).unwrap();
        std::fs::write(drafts.join("index.md"), "# Draft").unwrap();

        let pages = walk(dir.path()).unwrap();
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_walk_missing_root_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = walk(&missing).unwrap_err();
        assert!(matches!(err, WalkError::RootNotFound(_)));
    }
}
