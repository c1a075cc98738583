//! Generated entry-module sources.
//!
//! Each synthesized project gets the same five small modules; only the
//! component re-export varies (it embeds the absolute source path). The
//! bundler's own Vue transform handles SFC compilation — nothing here is
//! derived from the component source.

use crate::hydrate::SERVER_DATA_GLOBAL;
use serde_json::json;
use std::path::Path;

/// Dependency-injection key the entries provide server data under.
pub const PROVIDE_KEY: &str = "serverData";

/// Root element id the client entry mounts onto.
pub const MOUNT_SELECTOR: &str = "#app";

/// Project manifest: ES modules, plus the two runtime dependencies the
/// server build leaves external.
pub fn manifest() -> String {
    let manifest = json!({
        "name": "vue-ssr-build",
        "private": true,
        "type": "module",
        "dependencies": {
            "vue": "^3.4.0",
            "@vue/server-renderer": "^3.4.0"
        }
    });
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

/// Re-export module for the original `.vue` file.
///
/// Importing by absolute path keeps the component's own relative imports and
/// assets resolvable from its real directory.
pub fn component_reexport(component_path: &Path) -> String {
    format!(
        "export {{ default }} from \"{}\";\n",
        escape_js(&component_path.display().to_string())
    )
}

/// App-factory module wrapping the component in a server-hydratable app.
pub fn app_factory() -> String {
    r#"import { createSSRApp } from "vue";
import Component from "./component.js";

export function createApp(props = {}) {
  return createSSRApp(Component, props);
}
"#
    .to_string()
}

/// Server entry: async render function producing the HTML string.
pub fn server_entry() -> String {
    format!(
        r#"import {{ renderToString }} from "vue/server-renderer";
import {{ createApp }} from "./app.js";

export async function render(serverData = {{}}) {{
  const app = createApp();
  if (serverData && Object.keys(serverData).length > 0) {{
    app.provide("{PROVIDE_KEY}", serverData);
    app.config.globalProperties.$serverData = serverData;
  }}
  return await renderToString(app);
}}
"#
    )
}

/// Client entry: hydrates the server-rendered markup in place.
pub fn client_entry() -> String {
    format!(
        r#"import {{ createApp }} from "./app.js";

const serverData = window.{SERVER_DATA_GLOBAL} || {{}};
const app = createApp();

app.config.errorHandler = (err, _instance, info) => {{
  console.error("[hydration] error:", err, info);
}};
app.config.warnHandler = (msg, _instance, trace) => {{
  console.warn("[hydration]", msg, trace);
}};

if (Object.keys(serverData).length > 0) {{
  app.provide("{PROVIDE_KEY}", serverData);
  app.config.globalProperties.$serverData = serverData;
}}

try {{
  app.mount("{MOUNT_SELECTOR}");
  window.dispatchEvent(new CustomEvent("vue:hydrated"));
}} catch (err) {{
  console.error("[hydration] mount failed:", err);
  window.dispatchEvent(
    new CustomEvent("vue:hydration-failed", {{ detail: String(err) }})
  );
}}
"#
    )
}

/// Escape a path for embedding in a double-quoted JS string literal.
fn escape_js(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_declares_module_system_and_deps() {
        let manifest: serde_json::Value = serde_json::from_str(&manifest()).unwrap();
        assert_eq!(manifest["type"], "module");
        assert!(manifest["dependencies"]["vue"].is_string());
        assert!(manifest["dependencies"]["@vue/server-renderer"].is_string());
    }

    #[test]
    fn test_reexport_embeds_absolute_path() {
        let module = component_reexport(Path::new("/apps/demo/www/hello.vue"));
        assert_eq!(
            module,
            "export { default } from \"/apps/demo/www/hello.vue\";\n"
        );
    }

    #[test]
    fn test_reexport_escapes_backslashes() {
        let module = component_reexport(Path::new(r"C:\apps\hello.vue"));
        assert!(module.contains(r"C:\\apps\\hello.vue"));
    }

    #[test]
    fn test_server_entry_injects_both_channels() {
        let entry = server_entry();
        assert!(entry.contains("app.provide(\"serverData\", serverData)"));
        assert!(entry.contains("app.config.globalProperties.$serverData"));
        assert!(entry.contains("renderToString(app)"));
        assert!(entry.contains("export async function render"));
    }

    #[test]
    fn test_client_entry_reads_global_and_mounts() {
        let entry = client_entry();
        assert!(entry.contains("window.__SSR_DATA__"));
        assert!(entry.contains("app.mount(\"#app\")"));
        assert!(entry.contains("vue:hydrated"));
        assert!(entry.contains("vue:hydration-failed"));
        assert!(entry.contains("errorHandler"));
        assert!(entry.contains("warnHandler"));
    }
}
