use crate::config::Config;
use crate::services::{DirectoryRefreshService, ServiceManager, WebService, handle_shutdown_signals};
use crate::state::AppState;
use crate::upstream::AnalyticsApi;
use anyhow::Context;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
    service_manager: ServiceManager,
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let base = Url::parse(&config.upstream_base_url)
            .with_context(|| format!("Invalid upstream base URL {:?}", config.upstream_base_url))?;
        let upstream = Arc::new(AnalyticsApi::new(base).context("Failed to create API client")?);

        let app_state = AppState::new(
            upstream,
            Duration::from_secs(config.overview_ttl_secs),
            config.excluded_building(),
        );

        // First directory load is non-fatal: the web layer fetches
        // read-through and the refresher retries periodically.
        match app_state.directory.load(&app_state.upstream).await {
            Ok(count) => info!(buildings = count, "Building directory loaded"),
            Err(e) => warn!(error = ?e, "Could not load building directory on startup (non-fatal)"),
        }

        Ok(App {
            config,
            app_state,
            service_manager: ServiceManager::new(),
        })
    }

    /// Register the web and refresher services
    pub fn setup_services(&mut self) -> Result<(), anyhow::Error> {
        self.service_manager.register(Box::new(WebService::new(
            self.config.port,
            self.app_state.clone(),
        )));
        self.service_manager
            .register(Box::new(DirectoryRefreshService::new(
                self.app_state.clone(),
                Duration::from_secs(self.config.directory_refresh_secs),
            )));

        if !self.service_manager.has_services() {
            anyhow::bail!("No services enabled");
        }
        Ok(())
    }

    /// Start all registered services
    pub fn start_services(&mut self) {
        self.service_manager.spawn_all();
    }

    /// Run the application and handle shutdown signals
    pub async fn run(self) -> ExitCode {
        handle_shutdown_signals(
            self.service_manager,
            Duration::from_secs(self.config.shutdown_timeout),
        )
        .await
    }
}
