//! Runtime services and shared state for the ticket-classifier.

use axum::{
    Router,
    routing::{get, post},
};
use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::predict,
    service::{db::DbClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, LLM client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// (and used as router state) without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The database client instance.
    pub db: DbClient,
    /// The LLM client instance.
    pub llm: LlmClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database client.
        let db = DbClient::postgres(&config);

        // Initialize the LLM client.
        let llm = LlmClient::gemini(&config)?;

        Ok(Self { config, db, llm })
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/predict", post(predict::predict).fallback(predict::method_not_allowed))
            .route("/health", get(predict::health).fallback(predict::method_not_allowed))
            .fallback(predict::not_found)
            .with_state(self.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn start(&self) -> Void {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_address).await?;

        info!("Listening on http://{} ...", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down ...");
            })
            .await?;

        Ok(())
    }
}
