//! Library root for `ticket-classifier`.
//!
//! Ticket-classifier is a Gemini-powered HTTP service for support desks designed to:
//! - Classify free-text tickets into a label with a reason and confidence
//! - Suggest a remediation and a short, recognizable title
//! - Surface related terms for follow-up searches
//!
//! The service exposes a single classification endpoint, uses PostgreSQL for
//! storage, and Gemini for generation. The architecture is built around
//! extensible traits that allow for different implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the ticket-classifier runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with database and LLM clients
/// - Serves HTTP requests until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting ticket-classifier ...");

    // Start the crypto provider (a no-op if one is already installed).
    let _ = crypto::ring::default_provider().install_default();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
