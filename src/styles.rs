//! Style extraction from component source.
//!
//! Styles are delivered inline by the caller, so this module only collects
//! the raw `<style>` block bodies in source order. Extraction is best-effort:
//! a component that cannot be re-read yields an empty style string and a
//! warning, never a failed render.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Extract and concatenate all `<style>` block bodies from a component.
///
/// Attributes on the opening tag (`scoped`, `lang`, ...) are ignored. Each
/// body is trimmed, empty blocks are dropped, and the remainder is joined
/// with a blank line.
pub async fn extract_styles(component_path: &Path) -> String {
    let source = match tokio::fs::read_to_string(component_path).await {
        Ok(source) => source,
        Err(e) => {
            crate::log!("warn"; "could not read {} for style extraction: {}", component_path.display(), e);
            return String::new();
        }
    };

    extract_from_source(&source)
}

/// Collect style bodies from raw SFC source.
pub fn extract_from_source(source: &str) -> String {
    static STYLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = STYLE_RE
        .get_or_init(|| Regex::new(r"(?s)<style[^>]*>(.*?)</style>").expect("valid regex"));

    let blocks: Vec<&str> = re
        .captures_iter(source)
        .map(|c| c.get(1).map_or("", |m| m.as_str()).trim())
        .filter(|body| !body.is_empty())
        .collect();

    blocks.join("\n\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blocks_joined_with_blank_line() {
        let source = "<template><p>x</p></template>\
                      <style>a{color:red}</style>\
                      <style scoped>b{color:blue}</style>";
        assert_eq!(
            extract_from_source(source),
            "a{color:red}\n\nb{color:blue}"
        );
    }

    #[test]
    fn test_attributes_on_opening_tag_ignored() {
        let source = "<style lang=\"scss\" scoped>\n.page { margin: 0 }\n</style>";
        assert_eq!(extract_from_source(source), ".page { margin: 0 }");
    }

    #[test]
    fn test_empty_blocks_discarded() {
        let source = "<style></style><style>  \n </style><style>p{}</style>";
        assert_eq!(extract_from_source(source), "p{}");
    }

    #[test]
    fn test_no_styles_yields_empty() {
        assert_eq!(extract_from_source("<template><p>x</p></template>"), "");
    }

    #[tokio::test]
    async fn test_unreadable_file_yields_empty() {
        let styles = extract_styles(Path::new("/nonexistent/component.vue")).await;
        assert_eq!(styles, "");
    }

    #[tokio::test]
    async fn test_extract_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styled.vue");
        std::fs::write(
            &path,
            "<template><p>x</p></template><style>p { color: teal }</style>",
        )
        .unwrap();
        assert_eq!(extract_styles(&path).await, "p { color: teal }");
    }
}
