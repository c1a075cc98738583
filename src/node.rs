//! Node.js runtime discovery.
//!
//! The server bundle is executed by Node, and the bundler itself runs on it,
//! so a compatible installation is a hard precondition: major version >= 22.
//! Discovery probes an ordered candidate list with `--version` and picks the
//! highest qualifying major. The result is cached for the process lifetime.

use crate::exec::Cmd;
use anyhow::{Result, bail};
use std::path::Path;
use std::sync::OnceLock;

/// Minimum supported Node.js major version.
pub const MIN_MAJOR: u32 = 22;

/// Candidate commands, in order of preference. Includes common install
/// locations for version-pinned Node alongside the PATH defaults.
const CANDIDATES: &[&str] = &[
    "node22",
    "/opt/homebrew/bin/node22",
    "/usr/local/bin/node22",
    "/opt/homebrew/bin/node",
    "/usr/local/bin/node",
    "node",
    "/usr/bin/node",
];

/// Discovered Node command, cached for the process lifetime.
static NODE_CMD: OnceLock<String> = OnceLock::new();

/// Resolve a Node.js >= 22 command, or fail with install guidance.
///
/// An explicit `command` override is trusted as-is and skips the probe.
pub async fn require_node(command_override: Option<&str>) -> Result<String> {
    if let Some(cmd) = command_override {
        return Ok(cmd.to_string());
    }

    if let Some(cmd) = NODE_CMD.get() {
        return Ok(cmd.clone());
    }

    let cmd = discover().await?;
    // Concurrent discoveries race harmlessly; first set wins
    let _ = NODE_CMD.set(cmd.clone());
    Ok(cmd)
}

/// Probe all candidates and select the best qualifying one.
async fn discover() -> Result<String> {
    let mut qualifying: Vec<(String, u32, String)> = Vec::new();
    let mut too_old: Vec<String> = Vec::new();

    for candidate in CANDIDATES {
        if !is_probeable(candidate) {
            continue;
        }

        let Ok(output) = Cmd::new(candidate).arg("--version").run().await else {
            continue;
        };

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let Some(major) = parse_major(&version) else {
            continue;
        };

        crate::debug!("node"; "found {} -> {}", candidate, version);

        if major >= MIN_MAJOR {
            qualifying.push((candidate.to_string(), major, version));
        } else {
            too_old.push(version);
        }
    }

    // Highest major wins
    qualifying.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some((cmd, _, version)) = qualifying.into_iter().next() {
        crate::debug!("node"; "selected {} at {}", version, cmd);
        return Ok(cmd);
    }

    let found = if too_old.is_empty() {
        "no Node.js installation found on this system".to_string()
    } else {
        format!("found only: {}", too_old.join(", "))
    };
    bail!(
        "Node.js v{MIN_MAJOR} or higher is required for Vue SSR ({found}).\n\
         Installation options:\n\
         - Homebrew: brew install node@{MIN_MAJOR}\n\
         - nvm: nvm install {MIN_MAJOR} && nvm use {MIN_MAJOR}\n\
         - Download from: https://nodejs.org/"
    );
}

/// Skip candidates that cannot exist without spawning anything.
fn is_probeable(candidate: &str) -> bool {
    if candidate.contains('/') {
        Path::new(candidate).is_file()
    } else {
        which::which(candidate).is_ok()
    }
}

/// Extract the major version from `vMAJOR.MINOR.PATCH` output.
fn parse_major(version: &str) -> Option<u32> {
    version
        .strip_prefix('v')?
        .split('.')
        .next()?
        .parse()
        .ok()
}

// ============================================================================
// Tests
// ============================================================================
