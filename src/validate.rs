//! Static component validation.
//!
//! Lightweight structural checks on raw SFC source before any build is
//! attempted: section presence and a heuristic tag-balance scan. This is
//! deliberately not an HTML parser; it exists to catch gross structural
//! errors with a readable message instead of a bundler stack trace.

use regex::Regex;
use std::sync::OnceLock;

/// Void elements that never take a closing tag.
#[inline]
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Validate raw SFC source, returning all issues found.
///
/// Never fails; an empty list means the component is structurally sound
/// enough to hand to the bundler. A non-empty list aborts the build and all
/// issues are surfaced jointly.
pub fn validate(source: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let template = section_body(source, "template");
    let has_script = has_section(source, "script");

    if template.is_none() && !has_script {
        issues.push("Missing <template> or <script> section".to_string());
        return issues;
    }

    if let Some(body) = template {
        scan_tag_balance(body, &mut issues);
    }

    issues
}

/// Extract a section body via tag-boundary matching.
///
/// Greedy to the last closing tag, so nested `<template>` elements inside the
/// body stay part of it.
fn section_body<'a>(source: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let open_at = source.find(&open)?;
    let body_start = source[open_at..].find('>').map(|i| open_at + i + 1)?;
    let body_end = source.rfind(&close)?;
    (body_end >= body_start).then(|| &source[body_start..body_end])
}

/// Check that both boundaries of a section are present.
fn has_section(source: &str, tag: &str) -> bool {
    section_body(source, tag).is_some()
}

/// Stack-based tag balance scan over template content.
fn scan_tag_balance(body: &str, issues: &mut Vec<String>) {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

    let comment_re =
        COMMENT_RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
    let tag_re = TAG_RE
        .get_or_init(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").expect("valid regex"));

    let body = comment_re.replace_all(body, "");
    let mut stack: Vec<String> = Vec::new();

    for captures in tag_re.captures_iter(&body) {
        let closing = !captures[1].is_empty();
        let tag = captures[2].to_ascii_lowercase();
        let self_closing = captures[3].trim_end().ends_with('/');

        if closing {
            let matches_top = stack.last().map(|top| *top == tag);
            match matches_top {
                Some(true) => {
                    stack.pop();
                }
                Some(false) => {
                    // Mismatch consumes the open tag so one typo yields one
                    // issue, not a cascade
                    issues.push(format!("Unmatched closing tag: </{tag}>"));
                    stack.pop();
                }
                None => issues.push(format!("Unmatched closing tag: </{tag}>")),
            }
        } else if !self_closing && !is_void_element(&tag) {
            stack.push(tag);
        }
    }

    // Anything still open never got closed
    for tag in stack.into_iter().rev() {
        issues.push(format!("Unclosed tag: <{tag}>"));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_template_passes() {
        let source = r#"<template>
  <div class="page">
    <p>{{ message }}</p>
    <img src="./logo.png">
    <input type="text" />
  </div>
</template>
<script setup>defineProps(['message'])</script>"#;
        assert!(validate(source).is_empty());
    }

    #[test]
    fn test_script_only_component_passes() {
        let source = "<script>export default { render: () => null }</script>";
        assert!(validate(source).is_empty());
    }

    #[test]
    fn test_missing_both_sections() {
        let issues = validate("<style>p { color: red }</style>");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Missing <template> or <script>"));
    }

    #[test]
    fn test_unmatched_closing_tag_reported_once() {
        let issues = validate("<template><div></span></template>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0], "Unmatched closing tag: </span>");
    }

    #[test]
    fn test_unclosed_tag_reported() {
        let issues = validate("<template><div><p>text</p></template>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0], "Unclosed tag: <div>");
    }

    #[test]
    fn test_void_elements_never_unclosed() {
        let issues = validate("<template><div><img src=\"a.png\"><br><hr></div></template>");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_self_closing_component_tags() {
        let issues = validate("<template><div><HelloChild :msg=\"m\" /></div></template>");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_closing_without_open() {
        let issues = validate("<template></div></template>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0], "Unmatched closing tag: </div>");
    }

    #[test]
    fn test_comments_ignored() {
        let issues = validate("<template><!-- <div> --><p>ok</p></template>");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_nested_template_element_kept_in_body() {
        let source = "<template><div><template v-if=\"x\"><p>a</p></template></div></template>";
        assert!(validate(source).is_empty());
    }
}
