//! On-demand Vue single-file-component server-side rendering.
//!
//! Given a `.vue` file on disk, this crate synthesizes a self-contained build
//! project, compiles two bundles (a server-executable module and a
//! self-executing client bundle), executes the server bundle to produce HTML,
//! publishes the client bundle for hydration, and caches the build keyed on
//! source freshness.
//!
//! The host framework constructs one [`BuildCache`] and one [`Renderer`] at
//! startup and calls [`Renderer::render`] per request:
//!
//! ```ignore
//! let cache = Arc::new(BuildCache::new());
//! let node = node::require_node(None).await?;
//! let renderer = Renderer::new(RendererConfig::default(), cache.clone(), node);
//!
//! let result = renderer.render(Path::new("apps/demo/www/hello.vue"), data).await;
//! assert!(result.success);
//! ```

pub mod build;
pub mod cache;
pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod exec;
pub mod executor;
pub mod hydrate;
pub mod logger;
pub mod node;
pub mod pipeline;
pub mod publish;
pub mod styles;
pub mod synth;
pub mod validate;

/// Caller-supplied, JSON-serializable server data passed through to the
/// component's render context and echoed back for client hydration.
pub type ServerData = serde_json::Map<String, serde_json::Value>;

pub use cache::{BuildCache, BundleInfo};
pub use config::RendererConfig;
pub use error::RenderError;
pub use pipeline::{RenderResult, Renderer};
