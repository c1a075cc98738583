//! Build-project synthesis.
//!
//! Materializes a minimal, self-contained build project for one component:
//! a manifest plus four entry modules, written into an isolated per-component
//! work directory. Fresh entry files per component (rather than one shared
//! template project) let the bundler resolve each component's own relative
//! imports and assets from its real directory.

mod entries;

pub use entries::{MOUNT_SELECTOR, PROVIDE_KEY};

use crate::component::ComponentRef;
use crate::error::RenderError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Generated file names inside the work directory.
pub const PACKAGE_JSON: &str = "package.json";
pub const COMPONENT_MODULE: &str = "component.js";
pub const APP_MODULE: &str = "app.js";
pub const SERVER_ENTRY: &str = "entry-server.js";
pub const CLIENT_ENTRY: &str = "entry-client.js";

/// Paths of a freshly synthesized build project.
#[derive(Debug, Clone)]
pub struct SynthesizedProject {
    /// The original component's directory (for the bundler's path alias)
    pub component_dir: PathBuf,
    /// Server-side render entry module
    pub server_entry: PathBuf,
    /// Client hydration entry module
    pub client_entry: PathBuf,
}

/// Write the build project for a component into `work_dir`.
pub async fn write_project(
    component: &ComponentRef,
    work_dir: &Path,
) -> Result<SynthesizedProject, RenderError> {
    fs::create_dir_all(work_dir).await?;

    let files: [(&str, String); 5] = [
        (PACKAGE_JSON, entries::manifest()),
        (COMPONENT_MODULE, entries::component_reexport(&component.path)),
        (APP_MODULE, entries::app_factory()),
        (SERVER_ENTRY, entries::server_entry()),
        (CLIENT_ENTRY, entries::client_entry()),
    ];

    for (name, content) in files {
        fs::write(work_dir.join(name), content).await?;
    }

    crate::debug!("synth"; "project for `{}` at {}", component.name, work_dir.display());

    Ok(SynthesizedProject {
        component_dir: component.dir.clone(),
        server_entry: work_dir.join(SERVER_ENTRY),
        client_entry: work_dir.join(CLIENT_ENTRY),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn fixture() -> (tempfile::TempDir, ComponentRef) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.vue");
        std::fs::write(&path, "<template><p>{{ message }}</p></template>").unwrap();
        let component = ComponentRef::resolve(&path).unwrap();
        (dir, component)
    }

    #[tokio::test]
    async fn test_writes_manifest_and_four_entries() {
        let (dir, component) = fixture().await;
        let work_dir = dir.path().join("work");

        let project = write_project(&component, &work_dir).await.unwrap();

        for name in [
            PACKAGE_JSON,
            COMPONENT_MODULE,
            APP_MODULE,
            SERVER_ENTRY,
            CLIENT_ENTRY,
        ] {
            assert!(work_dir.join(name).is_file(), "missing {name}");
        }
        assert_eq!(project.server_entry, work_dir.join(SERVER_ENTRY));
        assert_eq!(project.client_entry, work_dir.join(CLIENT_ENTRY));
        assert_eq!(project.component_dir, component.dir);
    }

    #[tokio::test]
    async fn test_reexport_references_original_source() {
        let (dir, component) = fixture().await;
        let work_dir = dir.path().join("work");

        write_project(&component, &work_dir).await.unwrap();

        let reexport = std::fs::read_to_string(work_dir.join(COMPONENT_MODULE)).unwrap();
        assert!(reexport.contains(&component.path.display().to_string()));
    }

    #[tokio::test]
    async fn test_project_is_idempotent() {
        let (dir, component) = fixture().await;
        let work_dir = dir.path().join("work");

        write_project(&component, &work_dir).await.unwrap();
        let first = std::fs::read_to_string(work_dir.join(SERVER_ENTRY)).unwrap();
        write_project(&component, &work_dir).await.unwrap();
        let second = std::fs::read_to_string(work_dir.join(SERVER_ENTRY)).unwrap();
        assert_eq!(first, second);
    }
}
