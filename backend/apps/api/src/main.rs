//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by
//! the intake crate through `kernel::error::AppError`.

use axum::{
    Router,
    http::{HeaderName, Method, header},
};
use intake::{DriveFileStorage, IntakeConfig, SheetsLedger, intake_router};
use platform::config::Env;
use platform::google::{
    CredentialSource, DRIVE_SCOPE, SPREADSHEETS_SCOPE, ServiceAccountTokenSource,
};
use platform::http_client::HttpClientConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_CREDENTIALS_FILE: &str = "service-account.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Process-wide TLS provider for the credential and API clients
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,intake=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration; any error here stops the process before binding
    let env = Env::process();
    let port: u16 = env.parsed_or("PORT", DEFAULT_PORT)?;
    let intake_config = IntakeConfig::from_env(&env)?;
    let http_config = HttpClientConfig::from_env(&env)?;

    let key_file = env
        .optional("GOOGLE_APPLICATION_CREDENTIALS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));
    let key = CredentialSource::resolve(env.optional("GOOGLE_SERVICE_ACCOUNT"), &key_file)?
        .load()
        .await?;

    tracing::info!(
        client_email = %key.client_email,
        folder_id = %intake_config.folder_id,
        spreadsheet_id = %intake_config.spreadsheet_id,
        sheet_range = %intake_config.sheet_range,
        connect_timeout = ?http_config.connect_timeout,
        read_timeout = ?http_config.read_timeout,
        "Configuration loaded"
    );

    // Google clients share one HTTP client and one token cache
    let http = http_config.build_client()?;
    let tokens = Arc::new(ServiceAccountTokenSource::new(
        &key,
        &[DRIVE_SCOPE, SPREADSHEETS_SCOPE],
    )?);
    let storage = DriveFileStorage::new(http.clone(), tokens.clone());
    let ledger = SheetsLedger::new(http, tokens);

    // CORS configuration: the form is embedded on arbitrary sites
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .merge(intake_router(storage, ledger, intake_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
