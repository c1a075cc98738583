//! Client-bundle publishing.
//!
//! The built client bundle is copied out of the work directory into the
//! owning application's public SSR asset directory under a timestamped name,
//! so repeated builds of the same component never collide. A companion
//! operation maps a published path onto its externally servable URL.

use crate::component::AppInfo;
use crate::error::RenderError;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Copy the client bundle into `<app root>/public/ssr/`.
///
/// Fails with a bundle-not-found condition when the artifact is missing at
/// copy time (e.g. the build wrote nothing despite exiting zero).
pub async fn publish_client_bundle(
    client_bundle: &Path,
    component_name: &str,
    app: &AppInfo,
) -> Result<PathBuf, RenderError> {
    if !client_bundle.is_file() {
        return Err(RenderError::BundleNotFound(client_bundle.to_path_buf()));
    }

    let target_dir = app.public_ssr_dir();
    tokio::fs::create_dir_all(&target_dir).await?;

    let ext = client_bundle
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("js");
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let target = target_dir.join(format!("{component_name}-{timestamp}.{ext}"));
    tokio::fs::copy(client_bundle, &target).await?;

    crate::debug!("publish"; "client bundle at {}", target.display());
    Ok(target)
}

/// Compute the externally servable URL for a published bundle.
///
/// Files under the app's `public/ssr` directory are served at
/// `/assets/<app>/ssr/<filename>`; anything else falls back to a path
/// relative to the process working directory.
pub fn public_url(published: &Path, app: &AppInfo) -> String {
    if published.starts_with(app.public_ssr_dir())
        && let Some(filename) = published.file_name().and_then(|n| n.to_str())
    {
        return format!("/assets/{}/ssr/{}", app.name, filename);
    }

    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| published.strip_prefix(cwd).ok().map(Path::to_path_buf));
    relative
        .unwrap_or_else(|| published.to_path_buf())
        .display()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app_in(dir: &Path) -> AppInfo {
        AppInfo {
            name: "demo".to_string(),
            root: dir.join("apps/demo"),
        }
    }

    #[tokio::test]
    async fn test_publish_copies_with_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("client.js");
        std::fs::write(&bundle, "console.log('hi')").unwrap();
        let app = app_in(dir.path());

        let published = publish_client_bundle(&bundle, "hello", &app).await.unwrap();

        assert!(published.starts_with(app.public_ssr_dir()));
        let filename = published.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with("hello-"));
        assert!(filename.ends_with(".js"));
        assert_eq!(
            std::fs::read_to_string(&published).unwrap(),
            "console.log('hi')"
        );
    }

    #[tokio::test]
    async fn test_repeated_publishes_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("client.js");
        std::fs::write(&bundle, "x").unwrap();
        let app = app_in(dir.path());

        let first = publish_client_bundle(&bundle, "hello", &app).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = publish_client_bundle(&bundle, "hello", &app).await.unwrap();

        assert_ne!(first, second);
        assert!(first.is_file());
        assert!(second.is_file());
    }

    #[tokio::test]
    async fn test_missing_bundle_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());

        let err = publish_client_bundle(Path::new("/nope/client.js"), "hello", &app)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::BundleNotFound(_)));
    }

    #[test]
    fn test_public_url_for_conventional_path() {
        let app = AppInfo {
            name: "demo".to_string(),
            root: PathBuf::from("/bench/apps/demo"),
        };
        let url = public_url(
            Path::new("/bench/apps/demo/public/ssr/hello-1700000000000.js"),
            &app,
        );
        assert_eq!(url, "/assets/demo/ssr/hello-1700000000000.js");
    }

    #[test]
    fn test_public_url_fallback_outside_convention() {
        let app = AppInfo {
            name: "demo".to_string(),
            root: PathBuf::from("/bench/apps/demo"),
        };
        let url = public_url(Path::new("/elsewhere/bundle.js"), &app);
        assert_eq!(url, "/elsewhere/bundle.js");
    }
}
