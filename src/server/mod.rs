//! Inbound HTTP surface.
//!
//! Exposes a service banner, a health check, and the task submission
//! endpoint. [`run`] is the composition root: it wires the GitHub provider,
//! the template generator, and the retrying notifier into a
//! [`TaskOrchestrator`] and serves it until interrupted.

mod routes;
mod state;

pub use routes::{INTERNAL_ERROR_MESSAGE, health, internal_error, process_task, service_banner};
pub use state::AppState;

use crate::config::AppConfig;
use crate::generator::TemplateContentGenerator;
use crate::provisioning::{
    adapters::{GitHubProvider, ReqwestCallbackTransport},
    ports::ProviderError,
    services::{RetryingNotifier, TaskOrchestrator},
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use mockable::DefaultClock;
use std::any::Any;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

const DEFAULT_LOG_FILTER: &str = "pagesmith=info,tower_http=info";

/// Failures that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The provider client could not be built.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The server loop terminated with an error.
    #[error("server terminated: {0}")]
    Serve(#[source] io::Error),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Builds the router with middleware applied.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_banner).post(process_task))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wires production adapters into handler state.
///
/// # Errors
///
/// Returns [`ProviderError::Misconfigured`] when the provider client cannot
/// be built.
pub fn compose(config: &AppConfig) -> Result<AppState, ProviderError> {
    let provider = GitHubProvider::new(config.github_settings())?;
    let notifier = RetryingNotifier::new(
        Arc::new(ReqwestCallbackTransport::default()),
        config.retry_policy(),
    );
    let generator = TemplateContentGenerator::new(&config.license_holder);
    let orchestrator = TaskOrchestrator::new(
        Arc::new(provider),
        Arc::new(generator),
        Arc::new(notifier),
        Arc::new(DefaultClock),
        config.orchestrator_settings(),
    );
    Ok(AppState::new(Arc::new(orchestrator), Arc::new(DefaultClock)))
}

/// Serves the API on all interfaces until Ctrl-C is received.
///
/// # Errors
///
/// Returns [`ServerError`] when composition, binding, or serving fails.
pub async fn run(config: &AppConfig) -> Result<(), ServerError> {
    let app = build_router(compose(config)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, owner = %config.owner, "listening for task requests");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => error!(error = %err, "failed to listen for shutdown signal"),
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "CatchPanicLayer hands the panic payload over by value"
)]
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = detail, "request handler panicked");
    internal_error()
}
