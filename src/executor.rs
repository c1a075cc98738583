//! Server-bundle execution.
//!
//! The dynamic-load step is a narrow capability: one trait method taking a
//! bundle path and server data and returning HTML. Production loading runs a
//! constant ESM loader shim under Node; tests substitute their own loader.
//!
//! The shim imports the bundle through a `file://` URL with a cache-busting
//! query suffix, so the module loader never serves a stale copy across bundle
//! generations that share a file name.

use crate::ServerData;
use crate::error::RenderError;
use crate::exec::Cmd;
use serde::Deserialize;
use std::path::Path;
use std::process::Output;

/// Loader shim executed via `node --input-type=module -e`.
///
/// Success: `{"html": ...}` on stdout, exit 0.
/// Failure: `{"code", "error", "stack"}` on stderr, non-zero exit.
const LOADER_SCRIPT: &str = r#"import { pathToFileURL } from "node:url";

const [bundlePath, dataJson] = process.argv.slice(1);
const url = pathToFileURL(bundlePath).href + "?v=" + Date.now();

let mod;
try {
  mod = await import(url);
} catch (err) {
  process.stderr.write(JSON.stringify({
    code: "load-failed",
    error: String((err && err.message) || err),
    stack: err && err.stack,
  }));
  process.exit(1);
}

if (typeof mod.render !== "function") {
  process.stderr.write(JSON.stringify({ code: "missing-render-export" }));
  process.exit(3);
}

try {
  const html = await mod.render(JSON.parse(dataJson || "{}"));
  process.stdout.write(JSON.stringify({ html }));
} catch (err) {
  process.stderr.write(JSON.stringify({
    code: "render-failed",
    error: String((err && err.message) || err),
    stack: err && err.stack,
  }));
  process.exit(1);
}
"#;

/// The dynamic-load capability: bundle path plus server data to HTML.
pub trait BundleLoader: Send + Sync {
    fn load_and_render(
        &self,
        server_bundle: &Path,
        server_data: &ServerData,
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}

/// Production loader running the shim under the discovered Node command.
pub struct NodeLoader {
    node_cmd: String,
}

impl NodeLoader {
    pub fn new(node_cmd: String) -> Self {
        Self { node_cmd }
    }
}

impl BundleLoader for NodeLoader {
    async fn load_and_render(
        &self,
        server_bundle: &Path,
        server_data: &ServerData,
    ) -> Result<String, RenderError> {
        let data_json =
            serde_json::to_string(server_data).unwrap_or_else(|_| "{}".to_string());

        let output = Cmd::new(&self.node_cmd)
            .args(["--input-type=module", "-e", LOADER_SCRIPT])
            .arg(server_bundle)
            .arg(&data_json)
            .allow_failure()
            .run()
            .await
            .map_err(|e| RenderError::RenderFailed {
                message: format!("failed to spawn render process: {e:#}"),
                stack: None,
            })?;

        interpret_output(server_bundle, &output)
    }
}

// ============================================================================
// Shim output interpretation
// ============================================================================

#[derive(Deserialize)]
struct LoaderSuccess {
    html: String,
}

#[derive(Deserialize)]
struct LoaderFailure {
    code: Option<String>,
    error: Option<String>,
    stack: Option<String>,
}

/// Map the shim's process output onto the error taxonomy.
fn interpret_output(server_bundle: &Path, output: &Output) -> Result<String, RenderError> {
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let success: LoaderSuccess =
            serde_json::from_str(stdout.trim()).map_err(|e| RenderError::RenderFailed {
                message: format!("invalid render response: {e} (raw: {})", stdout.trim()),
                stack: None,
            })?;
        return Ok(success.html);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if let Ok(failure) = serde_json::from_str::<LoaderFailure>(stderr.trim()) {
        if failure.code.as_deref() == Some("missing-render-export") {
            return Err(RenderError::MissingRenderExport(
                server_bundle.to_path_buf(),
            ));
        }
        return Err(RenderError::RenderFailed {
            message: failure
                .error
                .unwrap_or_else(|| "render process failed".to_string()),
            stack: failure.stack,
        });
    }

    Err(RenderError::RenderFailed {
        message: format!("render process failed: {}", stderr.trim()),
        stack: None,
    })
}

// ============================================================================
// Tests
// ============================================================================
