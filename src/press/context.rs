//! Shared read-only context for transform stages.

use std::path::PathBuf;

/// Per-run configuration threaded to every stage.
///
/// This is process configuration, not build state: stages read it and never
/// write it. The accumulated fold context is a separate value owned by the
/// fold engine.
#[derive(Debug, Clone, Default)]
pub struct PressContext {
    /// Root directory template names are resolved against
    pub templates: PathBuf,
}

impl PressContext {
    /// Create a context with the given templates root.
    pub fn new(templates: impl Into<PathBuf>) -> Self {
        Self {
            templates: templates.into(),
        }
    }
}
