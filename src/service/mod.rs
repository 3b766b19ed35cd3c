//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the ticket-classifier:
//! - Database services (e.g., PostgreSQL)
//! - LLM services (e.g., Gemini)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod db;
pub mod llm;
