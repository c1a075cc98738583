//! Component references and owning-application inference.
//!
//! A `ComponentRef` pins down one `.vue` file for the duration of a render
//! request: absolute path, derived name, modification time (the freshness half
//! of the cache key) and the owning application inferred from the path layout.

use crate::error::RenderError;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Path segment that marks an application's page directory.
const WWW_SEGMENT: &str = "www";

/// One `.vue` component on disk, immutable for a single render request.
#[derive(Debug, Clone)]
pub struct ComponentRef {
    /// Canonical absolute path to the source file
    pub path: PathBuf,
    /// Component name: the file stem
    pub name: String,
    /// Directory containing the component (resolves its relative imports)
    pub dir: PathBuf,
    /// Owning application
    pub app: AppInfo,
    /// Last-modified timestamp in milliseconds since the epoch
    mtime_ms: u128,
}

impl ComponentRef {
    /// Resolve a component path into a reference.
    ///
    /// The caller contract guarantees an existing `.vue` file; this still
    /// re-checks so a stale path fails early with a readable error.
    pub fn resolve(path: &Path) -> Result<Self, RenderError> {
        let path = path.canonicalize()?;

        if path.extension().and_then(|e| e.to_str()) != Some("vue") {
            return Err(RenderError::Validation(vec![format!(
                "Not a .vue component: {}",
                path.display()
            )]));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "component".to_string());
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mtime = path.metadata()?.modified()?;
        let mtime_ms = mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let app = AppInfo::infer(&path);

        Ok(Self {
            path,
            name,
            dir,
            app,
            mtime_ms,
        })
    }

    /// Cache key: component path plus last-modified timestamp.
    ///
    /// Any content change that touches the mtime produces a new key; equal
    /// keys are treated as byte-identical source.
    pub fn cache_key(&self) -> String {
        format!("{}::{}", self.path.display(), self.mtime_ms)
    }

    /// Filesystem-safe work-directory name derived from the cache key.
    ///
    /// The name prefix keeps work dirs greppable; the hash suffix keys them
    /// by freshness so concurrent builds of different generations never
    /// collide on disk.
    pub fn work_dir_name(&self) -> String {
        let digest = blake3::hash(self.cache_key().as_bytes());
        format!("{}-{}", self.name, &hex::encode(digest.as_bytes())[..16])
    }

    /// Read the raw component source.
    pub async fn read_source(&self) -> Result<String, RenderError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    #[cfg(test)]
    pub fn mtime_ms(&self) -> u128 {
        self.mtime_ms
    }
}

// ============================================================================
// Application inference
// ============================================================================

/// The application that owns a component, per the `<app>/www/<page>.vue`
/// layout convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Application name (the directory above `www`)
    pub name: String,
    /// Application root directory
    pub root: PathBuf,
}

impl AppInfo {
    /// Infer the owning application from a component path.
    ///
    /// The nearest ancestor directory named `www` marks the app boundary: its
    /// parent is the app root and names the app. Components outside any `www`
    /// tree fall back to their parent directory.
    pub fn infer(component_path: &Path) -> Self {
        for ancestor in component_path.ancestors().skip(1) {
            if ancestor.file_name().and_then(|n| n.to_str()) == Some(WWW_SEGMENT)
                && let Some(root) = ancestor.parent()
                && let Some(name) = root.file_name().and_then(|n| n.to_str())
            {
                return Self {
                    name: name.to_string(),
                    root: root.to_path_buf(),
                };
            }
        }

        // No www segment: the component's own directory stands in
        let root = component_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        Self { name, root }
    }

    /// The application's public SSR asset directory.
    pub fn public_ssr_dir(&self) -> PathBuf {
        self.root.join("public").join("ssr")
    }
}

// ============================================================================
// Tests
// ============================================================================
