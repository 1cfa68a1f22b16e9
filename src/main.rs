// promptcraft - AI image generation relay and prompt builder
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use promptcraft::cli::{Args, Command, GenerateArgs};
use promptcraft::client::{Generator, NetworkStatus, RelayClient, Session, Severity};
use promptcraft::config::AppConfig;
use promptcraft::credential::Credential;
use promptcraft::openai::OpenAiClient;
use promptcraft::prompt::PromptOptions;
use promptcraft::server::create_router;
use promptcraft::utils::logging;
use promptcraft::utils::retry::RetryPolicy;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load()?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting promptcraft v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        None => serve(config, None, None).await,
        Some(Command::Serve { host, port }) => serve(config, host, port).await,
        Some(Command::Generate(gen)) => generate(config, gen).await,
    }
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    // Phase 3: Read the upstream credential from the environment
    let api_key = Credential::from_env(&config.upstream.api_key_env);
    if api_key.is_none() {
        warn!(
            "{} is not set; generation requests will fail until it is",
            config.upstream.api_key_env
        );
    }

    // Phase 4: Build and start HTTP server
    let upstream = OpenAiClient::new(&config.upstream)?;
    let app = create_router(config.clone(), upstream, api_key)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting relay on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn generate(config: AppConfig, args: GenerateArgs) -> Result<()> {
    let session = Session::new();
    if let Some(key) = args.api_key.as_deref() {
        session.login(key)?;
    }

    let mut options = PromptOptions {
        style: args.style.unwrap_or_default(),
        composition: args.composition,
        lighting: args.lighting,
        palette: args.palette,
        typography: args.typography,
        aspect_ratio: args.aspect_ratio,
        ..Default::default()
    };
    for rejection in options.reference_images.add_paths(&args.references).await {
        warn!("Skipping reference image {}", rejection);
    }

    let relay_url = args.relay_url.unwrap_or(config.client.relay_url);
    let relay = RelayClient::new(
        relay_url,
        Duration::from_secs(config.client.request_timeout_seconds),
        session.clone(),
    )?;
    let policy = RetryPolicy::new(
        config.client.max_attempts,
        Duration::from_millis(config.client.initial_delay_ms),
    );
    let generator = Generator::new(relay, NetworkStatus::new(), policy);

    let mut notifications = generator.notifications();
    let printer = tokio::spawn(async move {
        while let Ok(note) = notifications.recv().await {
            match note.severity {
                Severity::Success => info!("{}: {}", note.title, note.description),
                Severity::Error => error!("{}: {}", note.title, note.description),
            }
        }
    });

    let mut outcome = generator.generate(&args.prompt, &options).await;
    let mut manual_retries = args.manual_retries;
    while let Err(e) = &outcome {
        if !e.is_retryable() || manual_retries == 0 {
            break;
        }
        manual_retries -= 1;
        info!("Retrying ({} manual retries left)", manual_retries);
        match generator.retry_last().await {
            Some(next) => outcome = next,
            None => break,
        }
    }

    let result = match outcome {
        Ok(image) => {
            let path = image
                .download(&args.out, generator.relay().http_client())
                .await
                .with_context(|| format!("saving image to {}", args.out.display()))?;
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e.user_friendly_message())),
    };

    session.logout();
    drop(generator);
    let _ = printer.await;
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
