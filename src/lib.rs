pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    init_tracing(&config)?;

    let cli = Cli::parse();

    match cli.command() {
        Commands::Serve => run_server(config, prometheus_handle).await,
        Commands::Seed => cmd_seed(config).await,
        Commands::Init => cmd_init(),
        Commands::CheckConfig => cmd_check_config(&config),
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key.as_str(), value.as_str())?;
        }
        if !config.observability.loki_labels.contains_key("app") {
            builder = builder.label("app", "cinetrack")?;
        }

        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Starting cinetrack...");

    let seed = config.general.seed_default_categories;
    let server_enabled = config.server.enabled;
    let port = config.server.port;

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;

    if seed {
        let inserted = state.category_service.seed_defaults().await?;
        if inserted > 0 {
            info!(inserted, "Seeded default categories");
        }
    }

    let server_handle: Option<tokio::task::JoinHandle<()>> = if server_enabled {
        info!("Starting Web API on port {}", port);

        let app = api::router(Arc::clone(&state));
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        Some(tokio::spawn(async move {
            info!("Web server running at http://0.0.0.0:{}", port);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        info!("Web API disabled in config");
        None
    };

    info!("Running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }
    state.store.conn.clone().close().await.ok();
    info!("Stopped");

    Ok(())
}

async fn cmd_seed(config: Config) -> anyhow::Result<()> {
    let state = api::create_app_state_from_config(config, None).await?;
    let inserted = state.category_service.seed_defaults().await?;

    if inserted == 0 {
        println!("Default categories already present");
    } else {
        println!("Inserted {inserted} default categories");
    }

    Ok(())
}

fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml");
    } else {
        println!("config.toml already exists, leaving it untouched");
    }
    Ok(())
}

fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("Configuration OK");
    println!("  Database: {}", config.general.database_path);
    println!(
        "  Server:   {}",
        if config.server.enabled {
            format!("enabled on port {}", config.server.port)
        } else {
            "disabled".to_string()
        }
    );
    Ok(())
}
