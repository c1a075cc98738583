//! Standalone renderer process.
//!
//! `vue-ssr <component.vue> [server-data-json]` renders one component and
//! prints the result as formatted JSON on stdout. Any failure — environment,
//! argument, or an error-shaped render result — becomes a JSON error object
//! on stderr and a non-zero exit status.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use serde_json::json;
use std::sync::Arc;
use vue_ssr::{BuildCache, Renderer, RendererConfig, ServerData, cli::Cli, logger, node};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let config = match RendererConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => return fail(&format!("{e:#}"), 1),
    };

    let server_data = match parse_server_data(cli.server_data.as_deref()) {
        Ok(data) => data,
        Err(e) => return fail(&format!("invalid server data: {e}"), 2),
    };

    // Environment precondition: a usable Node.js >= 22, fatal when absent
    let node_cmd = match node::require_node(config.node.command.as_deref()).await {
        Ok(cmd) => cmd,
        Err(e) => return fail(&format!("{e:#}"), 1),
    };

    let cache = Arc::new(BuildCache::new());
    if let Err(e) = setup_shutdown_handler(cache.clone()) {
        return fail(&format!("{e:#}"), 1);
    }

    let renderer = Renderer::new(config, cache.clone(), node_cmd);
    let result = renderer.render(&cli.component, server_data).await;

    let json = serde_json::to_string_pretty(&result)
        .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"{e}\"}}"));

    let code = if result.success {
        println!("{json}");
        0
    } else {
        eprintln!("{json}");
        1
    };

    cache.clear();
    code
}

/// Parse the optional positional JSON argument into server data.
fn parse_server_data(raw: Option<&str>) -> Result<ServerData, serde_json::Error> {
    match raw {
        Some(raw) => serde_json::from_str(raw),
        None => Ok(ServerData::new()),
    }
}

/// Print a JSON error object to stderr and return the exit code.
fn fail(message: &str, code: i32) -> i32 {
    let payload = json!({ "success": false, "error": message });
    eprintln!(
        "{}",
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| message.to_string())
    );
    code
}

/// Clear the build cache on Ctrl+C before exiting.
fn setup_shutdown_handler(cache: Arc<BuildCache>) -> Result<()> {
    ctrlc::set_handler(move || {
        cache.clear();
        std::process::exit(130);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

// ============================================================================
// Tests
// ============================================================================
