//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::core::shutdown::ShutdownService;
use crate::data::FlowDataService;
use crate::domain::DashboardService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub dashboard: Arc<DashboardService>,
    pub flows: Arc<FlowDataService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let flows = FlowDataService::init(&config).context("Failed to initialize upstream client")?;
        tracing::debug!(source = flows.source_name(), "Flow source initialized");

        let dashboard = DashboardService::new(&config.dashboard);

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            dashboard: Arc::new(dashboard),
            flows: Arc::new(flows),
        })
    }

    /// `info` globally and for this crate's own targets
    fn default_log_filter() -> String {
        format!("info,{}=info", LOG_TARGET)
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| Self::default_log_filter());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Before anything that can block
        app.shutdown.install_signal_handlers();

        banner::print_banner(&app.config);

        let server = ApiServer::new(app);
        let app = server.start().await?;
        tracing::info!(
            triggered = app.shutdown.is_triggered(),
            "Server stopped"
        );

        Ok(())
    }
}
