//! Dual bundle building.
//!
//! Runs the bundler twice against a synthesized project: once for a
//! server-executable ES module (runtime kept external), once for a
//! self-executing client bundle (runtime inlined). The merged configuration
//! for each run is written next to the project and handed to a small driver
//! script executed by Node, which resolves plugin specs by dynamic import and
//! calls the bundler's JS API.

pub mod merge;

use crate::cache::BundleInfo;
use crate::component::ComponentRef;
use crate::error::RenderError;
use crate::exec::Cmd;
use crate::synth::SynthesizedProject;
use merge::merge_build_config;
use serde_json::{Value, json};
use std::path::Path;
use tokio::fs;

/// Bundler driver script name inside the work directory.
const BUILD_SCRIPT: &str = "build.mjs";
/// Per-build merged configuration files.
const SERVER_CONFIG: &str = "server-config.json";
const CLIENT_CONFIG: &str = "client-config.json";

/// Build output locations, relative to the work directory.
const SERVER_OUT_DIR: &str = "dist/server";
const CLIENT_OUT_DIR: &str = "dist/client";
pub const SERVER_BUNDLE: &str = "server.mjs";
pub const CLIENT_BUNDLE: &str = "client.js";

/// Path alias mapping to the original component's directory, so its relative
/// imports and assets resolve during both builds.
const COMPONENT_ALIAS: &str = "@component";

/// The mandatory SFC transform plugin.
const VUE_PLUGIN: &str = "@vitejs/plugin-vue";

/// Runtime packages kept external in the server build and resolved from the
/// host's installed packages at execution time.
const SERVER_EXTERNALS: [&str; 3] = ["vue", "vue/server-renderer", "@vue/server-renderer"];

/// Build both bundles for a synthesized project.
///
/// Either build's failure aborts the render; the error carries the resolved
/// component directory and a source preview for diagnosability.
pub async fn build_bundles(
    component: &ComponentRef,
    source: &str,
    project: &SynthesizedProject,
    work_dir: &Path,
    base_config: Option<&Value>,
    node_cmd: &str,
) -> Result<BundleInfo, RenderError> {
    write_build_inputs(component, project, work_dir, base_config).await?;

    for config in [SERVER_CONFIG, CLIENT_CONFIG] {
        let side = if config == SERVER_CONFIG {
            "server"
        } else {
            "client"
        };
        crate::debug!("build"; "{} bundle for `{}`", side, component.name);

        let result = Cmd::new(node_cmd)
            .arg(BUILD_SCRIPT)
            .arg(config)
            .cwd(work_dir)
            .run()
            .await;

        if let Err(e) = result {
            return Err(RenderError::build(
                format!("{side} bundle: {e:#}"),
                component.dir.clone(),
                source,
            ));
        }
    }

    crate::log!("build"; "bundled `{}`", component.name);

    Ok(BundleInfo {
        work_dir: work_dir.to_path_buf(),
        server_bundle: work_dir.join(SERVER_OUT_DIR).join(SERVER_BUNDLE),
        client_bundle: work_dir.join(CLIENT_OUT_DIR).join(CLIENT_BUNDLE),
        component_path: component.path.clone(),
        component_dir: component.dir.clone(),
    })
}

/// Write the driver script and both merged configuration files.
async fn write_build_inputs(
    component: &ComponentRef,
    project: &SynthesizedProject,
    work_dir: &Path,
    base_config: Option<&Value>,
) -> Result<(), RenderError> {
    fs::write(work_dir.join(BUILD_SCRIPT), build_script()).await?;

    let server = merge_build_config(
        base_config,
        &server_overrides(component, project),
    );
    let client = merge_build_config(
        base_config,
        &client_overrides(component, project),
    );

    fs::write(
        work_dir.join(SERVER_CONFIG),
        serde_json::to_string_pretty(&server).unwrap_or_default(),
    )
    .await?;
    fs::write(
        work_dir.join(CLIENT_CONFIG),
        serde_json::to_string_pretty(&client).unwrap_or_default(),
    )
    .await?;

    Ok(())
}

/// Bundler driver: loads a merged config, resolves plugin specs by dynamic
/// import, and runs one build.
fn build_script() -> String {
    r#"import { readFile } from "node:fs/promises";
import { build } from "vite";

const configPath = process.argv[2];
const config = JSON.parse(await readFile(configPath, "utf8"));

config.plugins = await Promise.all(
  (config.plugins ?? []).map(async (spec) => {
    const mod = await import(spec.name);
    const factory = mod.default ?? mod;
    return factory(spec.options ?? {});
  })
);

await build(config);
"#
    .to_string()
}

/// Override set for the server-side-render build.
fn server_overrides(component: &ComponentRef, project: &SynthesizedProject) -> Value {
    json!({
        "logLevel": "error",
        "configFile": false,
        "resolve": {
            "alias": { (COMPONENT_ALIAS): project.component_dir }
        },
        "define": {
            "process.env.NODE_ENV": "\"development\""
        },
        "build": {
            "ssr": true,
            "outDir": SERVER_OUT_DIR,
            "emptyOutDir": true,
            "minify": false,
            "sourcemap": false,
            "rollupOptions": {
                "input": project.server_entry,
                "external": SERVER_EXTERNALS,
                "output": {
                    "format": "es",
                    "entryFileNames": SERVER_BUNDLE
                }
            }
        },
        "plugins": [vue_plugin_spec(&component.name)]
    })
}

/// Override set for the client hydration build.
fn client_overrides(component: &ComponentRef, project: &SynthesizedProject) -> Value {
    json!({
        "logLevel": "error",
        "configFile": false,
        "resolve": {
            "alias": { (COMPONENT_ALIAS): project.component_dir }
        },
        "define": {
            "process.env.NODE_ENV": "\"development\""
        },
        "build": {
            "outDir": CLIENT_OUT_DIR,
            "emptyOutDir": true,
            "minify": false,
            "sourcemap": false,
            "rollupOptions": {
                "input": project.client_entry,
                "output": {
                    "format": "iife",
                    "entryFileNames": CLIENT_BUNDLE
                }
            }
        },
        "plugins": [vue_plugin_spec(&component.name)]
    })
}

/// The Vue transform plugin spec shared by both builds.
///
/// Development-mode compilation with template-ref binding and prop
/// destructuring enabled; the scope id keys per-component styles by the
/// lowercased component name so independently built components do not
/// collide.
fn vue_plugin_spec(component_name: &str) -> Value {
    json!({
        "name": VUE_PLUGIN,
        "options": {
            "isProduction": false,
            "features": {
                "templateRef": true,
                "propsDestructure": true
            },
            "template": {
                "compilerOptions": {
                    "scopeId": format!("data-v-{}", component_name.to_lowercase())
                }
            }
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
