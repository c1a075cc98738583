//! Render pipeline orchestration.
//!
//! One render request flows validator -> synthesizer -> dual build -> cache
//! -> render executor -> style extractor + asset publisher -> result. A cache
//! hit jumps straight to the executor. This module is also the single place
//! where pipeline errors are converted into an error-shaped result; below it
//! they only propagate.

use crate::ServerData;
use crate::build;
use crate::cache::{BuildCache, BundleInfo};
use crate::component::ComponentRef;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::executor::{BundleLoader, NodeLoader};
use crate::hydrate::server_data_script;
use crate::publish::{public_url, publish_client_bundle};
use crate::styles::extract_styles;
use crate::validate::validate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stylesheet shipped with error-shaped results.
const ERROR_STYLESHEET: &str = "\
.vue-ssr-error { background: #fee; border: 1px solid #f88; padding: 20px; \
border-radius: 4px; color: #c33; font-family: Arial, sans-serif; }
.vue-ssr-error pre { white-space: pre-wrap; margin: 8px 0 0; }";

/// The sole externally observed output of a render request.
///
/// Field names keep the original wire shape so an existing host's
/// consumption of the response keeps working.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub html: String,
    pub styles: String,
    pub client_bundle_path: Option<PathBuf>,
    pub client_bundle_url: Option<String>,
    pub server_data: ServerData,
    pub server_data_script: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Render orchestrator: owns the configuration, the cache handle and the
/// bundle-loading capability.
pub struct Renderer<L: BundleLoader = NodeLoader> {
    config: RendererConfig,
    cache: Arc<BuildCache>,
    loader: L,
    node_cmd: String,
}

impl Renderer<NodeLoader> {
    /// Production renderer executing bundles under the given Node command.
    pub fn new(config: RendererConfig, cache: Arc<BuildCache>, node_cmd: String) -> Self {
        let loader = NodeLoader::new(node_cmd.clone());
        Self {
            config,
            cache,
            loader,
            node_cmd,
        }
    }
}

impl<L: BundleLoader> Renderer<L> {
    /// Renderer with a custom bundle loader (test seam).
    pub fn with_loader(
        config: RendererConfig,
        cache: Arc<BuildCache>,
        loader: L,
        node_cmd: String,
    ) -> Self {
        Self {
            config,
            cache,
            loader,
            node_cmd,
        }
    }

    /// Render a component with request-scoped server data.
    ///
    /// Infallible shape: pipeline failures become an error-shaped result
    /// (`success = false`) rather than an `Err`.
    pub async fn render(&self, component_path: &Path, server_data: ServerData) -> RenderResult {
        match self.try_render(component_path, &server_data).await {
            Ok(result) => result,
            Err(e) => {
                crate::log!("error"; "render of {} failed: {e}", component_path.display());
                error_result(&e, server_data)
            }
        }
    }

    /// The fallible pipeline.
    async fn try_render(
        &self,
        component_path: &Path,
        server_data: &ServerData,
    ) -> Result<RenderResult, RenderError> {
        let component = ComponentRef::resolve(component_path)?;
        let key = component.cache_key();

        let bundles = match self.cache.get(&key) {
            Some(info) => {
                crate::debug!("cache"; "hit for `{}`", component.name);
                info
            }
            None => {
                let info = self.build_fresh(&component).await?;
                self.cache.put(key, info.clone());
                Arc::new(info)
            }
        };

        let html = self
            .loader
            .load_and_render(&bundles.server_bundle, server_data)
            .await?;

        let published =
            publish_client_bundle(&bundles.client_bundle, &component.name, &component.app).await?;
        let url = public_url(&published, &component.app);

        let styles = extract_styles(&component.path).await;

        crate::log!("render"; "`{}` rendered ({} bytes)", component.name, html.len());

        Ok(RenderResult {
            html,
            styles,
            client_bundle_path: Some(published),
            client_bundle_url: Some(url),
            server_data: server_data.clone(),
            server_data_script: server_data_script(server_data),
            success: true,
            error: None,
            stack: None,
        })
    }

    /// Cache-miss path: validate, synthesize, dual build.
    async fn build_fresh(&self, component: &ComponentRef) -> Result<BundleInfo, RenderError> {
        let source = component.read_source().await?;

        let issues = validate(&source);
        if !issues.is_empty() {
            return Err(RenderError::Validation(issues));
        }

        let work_dir = self.config.cache.root.join(component.work_dir_name());
        let project = crate::synth::write_project(component, &work_dir).await?;

        let base = self.config.base_build_config();
        build::build_bundles(
            component,
            &source,
            &project,
            &work_dir,
            base.as_ref(),
            &self.node_cmd,
        )
        .await
    }
}

// ============================================================================
// Error shaping
// ============================================================================

/// Convert a pipeline error into the uniform failure-shaped result.
fn error_result(error: &RenderError, server_data: ServerData) -> RenderResult {
    let message = error.to_string();
    let stack = error.stack().map(str::to_string);

    let mut html = format!(
        "<div class=\"vue-ssr-error\">\n<h2>Vue SSR Error</h2>\n<pre>{}</pre>",
        escape_html(&message)
    );
    if let Some(stack) = &stack {
        html.push_str(&format!("\n<pre>{}</pre>", escape_html(stack)));
    }
    html.push_str("\n</div>");

    RenderResult {
        html,
        styles: ERROR_STYLESHEET.to_string(),
        client_bundle_path: None,
        client_bundle_url: None,
        server_data_script: server_data_script(&server_data),
        server_data,
        success: false,
        error: Some(message),
        stack,
    }
}

/// Minimal HTML entity escaping for error fragments.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ============================================================================
// Tests
// ============================================================================
