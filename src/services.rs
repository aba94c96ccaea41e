//! Service supervision: registration, spawning, and graceful shutdown.
//!
//! Each long-running component implements [`Service`] and is driven on its
//! own task. Shutdown is a broadcast: every service races its work against
//! the signal and drains within the configured timeout.

use crate::state::{AppState, ServiceStatus};
use crate::utils::fmt_duration;
use crate::web::create_router;
use async_trait::async_trait;
use rand::Rng;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, info, warn};

#[async_trait]
pub trait Service: Send {
    fn name(&self) -> &'static str;
    async fn run(self: Box<Self>, shutdown: broadcast::Receiver<()>) -> anyhow::Result<()>;
}

pub struct ServiceManager {
    shutdown_tx: broadcast::Sender<()>,
    pending: Vec<Box<dyn Service>>,
    running: Vec<(&'static str, JoinHandle<()>)>,
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_tx,
            pending: Vec::new(),
            running: Vec::new(),
        }
    }

    pub fn register(&mut self, service: Box<dyn Service>) {
        self.pending.push(service);
    }

    pub fn has_services(&self) -> bool {
        !self.pending.is_empty() || !self.running.is_empty()
    }

    /// Spawn every registered service on its own task.
    pub fn spawn_all(&mut self) {
        for service in self.pending.drain(..) {
            let name = service.name();
            let shutdown_rx = self.shutdown_tx.subscribe();
            let handle = tokio::spawn(async move {
                if let Err(e) = service.run(shutdown_rx).await {
                    error!(service = name, error = ?e, "Service exited with error");
                }
            });
            self.running.push((name, handle));
        }
    }

    /// Signal shutdown and wait up to `timeout` for every service to drain.
    pub async fn shutdown(self, timeout: Duration) {
        let _ = self.shutdown_tx.send(());
        let deadline = Instant::now() + timeout;

        for (name, handle) in self.running {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match time::timeout(remaining, handle).await {
                Ok(Ok(())) => info!(service = name, "Service stopped"),
                Ok(Err(e)) => warn!(service = name, error = ?e, "Service task panicked"),
                Err(_) => {
                    warn!(
                        service = name,
                        timeout = fmt_duration(timeout),
                        "Service did not stop in time, abandoning"
                    );
                }
            }
        }
    }
}

/// Block until SIGINT/SIGTERM, then drain services.
pub async fn handle_shutdown_signals(manager: ServiceManager, timeout: Duration) -> ExitCode {
    wait_for_signal().await;
    info!("Shutdown signal received, draining services...");
    manager.shutdown(timeout).await;
    info!("Shutdown complete");
    ExitCode::SUCCESS
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!(error = ?e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// HTTP surface for the dashboard frontend.
pub struct WebService {
    port: u16,
    state: AppState,
}

impl WebService {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }
}

#[async_trait]
impl Service for WebService {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn run(self: Box<Self>, mut shutdown: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let statuses = self.state.service_statuses.clone();
        statuses.set(self.name(), ServiceStatus::Starting);

        let listener = match TcpListener::bind(("0.0.0.0", self.port)).await {
            Ok(listener) => listener,
            Err(e) => {
                statuses.set(self.name(), ServiceStatus::Error);
                return Err(anyhow::Error::new(e).context("Failed to bind web listener"));
            }
        };
        info!(port = self.port, "Web service listening");
        statuses.set(self.name(), ServiceStatus::Active);

        let router = create_router(self.state);
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        if let Err(e) = &result {
            statuses.set("web", ServiceStatus::Error);
            error!(error = ?e, "Web service failed");
        }
        result.map_err(Into::into)
    }
}

/// Periodic refresh of the building directory.
///
/// Buildings change only when a new spreadsheet lands upstream, so the
/// interval is long. A small random jitter keeps multiple replicas from
/// hitting upstream in lockstep.
pub struct DirectoryRefreshService {
    state: AppState,
    interval: Duration,
}

impl DirectoryRefreshService {
    pub fn new(state: AppState, interval: Duration) -> Self {
        Self { state, interval }
    }
}

#[async_trait]
impl Service for DirectoryRefreshService {
    fn name(&self) -> &'static str {
        "refresher"
    }

    async fn run(self: Box<Self>, mut shutdown: broadcast::Receiver<()>) -> anyhow::Result<()> {
        self.state
            .service_statuses
            .set(self.name(), ServiceStatus::Active);
        info!(
            interval = fmt_duration(self.interval),
            "Directory refresher started"
        );

        loop {
            let jitter = Duration::from_secs(rand::rng().random_range(0..30));
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Directory refresher received shutdown signal, exiting");
                    return Ok(());
                }
                _ = time::sleep(self.interval + jitter) => {}
            }

            match self.state.directory.load(&self.state.upstream).await {
                Ok(count) => info!(buildings = count, "Building directory refreshed"),
                Err(e) => warn!(error = ?e, "Failed to refresh building directory"),
            }
        }
    }
}
