//! Render pipeline error taxonomy.
//!
//! Every failure a single render request can hit maps to one variant here.
//! Environment errors (no usable Node.js) are not represented: they abort the
//! process before any render starts, see `node::require_node`.

use std::path::PathBuf;
use thiserror::Error;

/// Number of source characters included in build-failure diagnostics.
const SOURCE_PREVIEW_LEN: usize = 300;

/// Errors raised by the render pipeline.
///
/// All variants are caught once, in the top-level orchestrator, and converted
/// into an error-shaped [`RenderResult`](crate::pipeline::RenderResult).
/// Nothing below the orchestrator swallows them.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Structural validation failed; all issues are reported jointly.
    #[error("component validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// One of the two bundle builds failed.
    #[error(
        "bundle build failed: {message}\ncomponent dir: {}\nsource preview:\n{source_preview}",
        .component_dir.display()
    )]
    Build {
        message: String,
        component_dir: PathBuf,
        source_preview: String,
    },

    /// The server bundle loaded but exports no `render` function.
    #[error("server bundle at {} has no render export", .0.display())]
    MissingRenderExport(PathBuf),

    /// The render call itself threw inside the server bundle.
    #[error("render execution failed: {message}")]
    RenderFailed {
        message: String,
        stack: Option<String>,
    },

    /// The built client bundle was missing at publish time.
    #[error("client bundle not found at {}", .0.display())]
    BundleNotFound(PathBuf),

    /// Filesystem failure in the pipeline itself (cache dir, entry writes).
    #[error("pipeline i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Build-failure constructor that truncates the source for the preview.
    pub fn build(message: impl Into<String>, component_dir: PathBuf, source: &str) -> Self {
        Self::Build {
            message: message.into(),
            component_dir,
            source_preview: source_preview(source),
        }
    }

    /// Stack trace carried by the error, when the failing side produced one.
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::RenderFailed { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }
}

/// First portion of the component source, for build diagnostics.
fn source_preview(source: &str) -> String {
    if source.len() <= SOURCE_PREVIEW_LEN {
        return source.to_string();
    }
    // Truncate on a char boundary
    let mut end = SOURCE_PREVIEW_LEN;
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &source[..end])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_joins_issues() {
        let err = RenderError::Validation(vec![
            "Unclosed tag: <div>".into(),
            "Unmatched closing tag: </span>".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Unclosed tag: <div>"));
        assert!(msg.contains("Unmatched closing tag: </span>"));
    }

    #[test]
    fn test_build_error_carries_preview() {
        let err = RenderError::build(
            "vite exited with status 1",
            PathBuf::from("/apps/demo/www"),
            "<template><p>hello</p></template>",
        );
        let msg = err.to_string();
        assert!(msg.contains("/apps/demo/www"));
        assert!(msg.contains("<template><p>hello</p></template>"));
    }

    #[test]
    fn test_source_preview_truncates_long_source() {
        let source = "x".repeat(1000);
        let preview = source_preview(&source);
        assert!(preview.len() < source.len());
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_source_preview_char_boundary() {
        // Multi-byte chars around the cut point must not panic
        let source = "é".repeat(400);
        let preview = source_preview(&source);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_stack_accessor() {
        let err = RenderError::RenderFailed {
            message: "boom".into(),
            stack: Some("at render (server.mjs:3:1)".into()),
        };
        assert_eq!(err.stack(), Some("at render (server.mjs:3:1)"));
        assert!(RenderError::Validation(vec![]).stack().is_none());
    }
}
