//! Renderer configuration management for `vue-ssr.toml`.
//!
//! The config file is optional: every field has a default, and a missing file
//! yields the default configuration. Sections:
//!
//! | Section   | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `[cache]` | Work-directory root for synthesized build projects    |
//! | `[node]`  | Node.js command override (skips discovery)           |
//! | `[build]` | Caller's base bundler configuration (arbitrary table)|

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default work-directory root, relative to the process working directory.
pub const DEFAULT_CACHE_ROOT: &str = ".vue-ssr-cache";

/// Root configuration structure representing vue-ssr.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Work-directory settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Node.js runtime settings
    #[serde(default)]
    pub node: NodeConfig,

    /// Caller-supplied base bundler configuration.
    ///
    /// Kept as an arbitrary table; the builder merges its own override set on
    /// top of it (see `build::merge`).
    #[serde(default)]
    pub build: Option<toml::Value>,
}

/// `[cache]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Root directory for per-component build projects
    #[serde(default = "default_cache_root")]
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_ROOT)
}

/// `[node]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Explicit Node.js command; when set, discovery and the version probe
    /// are skipped and this command is trusted as-is
    #[serde(default)]
    pub command: Option<String>,
}

impl RendererConfig {
    /// Load configuration from the given path.
    ///
    /// A missing file is not an error: the defaults apply.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            crate::debug!("config"; "no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config `{}`", path.display()))?;
        Ok(config)
    }

    /// Base bundler configuration as a JSON value, when present.
    pub fn base_build_config(&self) -> Option<serde_json::Value> {
        self.build
            .as_ref()
            .and_then(|table| serde_json::to_value(table).ok())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = RendererConfig::load(Path::new("/nonexistent/vue-ssr.toml")).unwrap();
        assert_eq!(config.cache.root, PathBuf::from(DEFAULT_CACHE_ROOT));
        assert!(config.node.command.is_none());
        assert!(config.build.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[cache]
root = "/tmp/ssr-work"

[node]
command = "node22"

[build]
logLevel = "info"

[build.define]
"process.env.NODE_ENV" = "\"development\""
"#
        )
        .unwrap();

        let config = RendererConfig::load(file.path()).unwrap();
        assert_eq!(config.cache.root, PathBuf::from("/tmp/ssr-work"));
        assert_eq!(config.node.command.as_deref(), Some("node22"));

        let base = config.base_build_config().unwrap();
        assert_eq!(base["logLevel"], "info");
        assert_eq!(base["define"]["process.env.NODE_ENV"], "\"development\"");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = toml::from_str::<RendererConfig>("[serve]\nport = 80\n");
        assert!(err.is_err());
    }
}
