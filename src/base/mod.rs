//! Core components, types, and utilities for the ticket-classifier.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The classification prompt.
//! - Extraction and normalization of model replies.
//! - Common types and result handling.

pub mod config;
pub mod extract;
pub mod metadata;
pub mod normalize;
pub mod prompts;
pub mod types;
