use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_FALLBACK_PATH, ENV_HOST, ENV_PORT, ENV_UPSTREAM_TOKEN, ENV_UPSTREAM_URL,
};

#[derive(Parser)]
#[command(name = "flowdash")]
#[command(version, about = "Chatbot flow dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// InBot admin endpoint
    #[arg(long, global = true, env = ENV_UPSTREAM_URL)]
    pub upstream_url: Option<String>,

    /// Access token sent as X-InAuth-Token
    #[arg(long, global = true, env = ENV_UPSTREAM_TOKEN, hide_env_values = true)]
    pub upstream_token: Option<String>,

    /// Local data file used when the upstream returns null
    #[arg(long, global = true, env = ENV_FALLBACK_PATH)]
    pub fallback_path: Option<PathBuf>,

    /// Render metrics the records cannot provide as charts flagged unavailable
    #[arg(long, global = true)]
    pub show_unavailable: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub upstream_url: Option<String>,
    pub upstream_token: Option<String>,
    pub fallback_path: Option<PathBuf>,
    pub show_unavailable: bool,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            upstream_url: cli.upstream_url,
            upstream_token: cli.upstream_token,
            fallback_path: cli.fallback_path,
            show_unavailable: cli.show_unavailable,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (CliConfig::from(cli), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "flowdash",
            "start",
            "-p",
            "8080",
            "--upstream-url",
            "http://localhost:9000/inbot-admin",
            "--show-unavailable",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Start)));
        let config = CliConfig::from(cli);
        assert_eq!(config.port, Some(8080));
        assert_eq!(
            config.upstream_url.as_deref(),
            Some("http://localhost:9000/inbot-admin")
        );
        assert!(config.show_unavailable);
    }

    #[test]
    fn test_parse_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["flowdash", "--port", "not-a-port"]).is_err());
    }
}
