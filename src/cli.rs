//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Render a Vue single-file component to HTML with a hydratable client bundle
///
/// Mirrors the renderer process contract: the result is printed as formatted
/// JSON on stdout; failures become a JSON error object on stderr and a
/// non-zero exit status.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Absolute or relative path to the `.vue` component file
    #[arg(value_name = "COMPONENT", value_hint = clap::ValueHint::FilePath)]
    pub component: PathBuf,

    /// JSON-encoded server data passed to the component's render context
    #[arg(value_name = "SERVER_DATA")]
    pub server_data: Option<String>,

    /// Config file path (default: vue-ssr.toml in the working directory)
    #[arg(short = 'C', long, default_value = "vue-ssr.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_component_only() {
        let cli = Cli::parse_from(["vue-ssr", "apps/demo/www/hello.vue"]);
        assert_eq!(cli.component, PathBuf::from("apps/demo/www/hello.vue"));
        assert!(cli.server_data.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_with_server_data() {
        let cli = Cli::parse_from(["vue-ssr", "hello.vue", r#"{"message":"hi"}"#]);
        assert_eq!(cli.server_data.as_deref(), Some(r#"{"message":"hi"}"#));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["vue-ssr", "-v", "-C", "custom.toml", "hello.vue"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
    }
}
