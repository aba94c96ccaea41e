use atrium::app::App;
use atrium::cli::Args;
use atrium::config::Config;
use atrium::logging::setup_logging;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config and set up logging before App::new() so startup logs are
    // never silently dropped.
    let config = Config::load().expect("Failed to load config");
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting atrium"
    );

    let mut app = App::new(config)
        .await
        .expect("Failed to initialize application");

    app.setup_services().expect("Failed to setup services");
    app.start_services();
    app.run().await
}
