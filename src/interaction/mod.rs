//! Request handling for ticket-classifier.
//!
//! This module provides functionality for handling inbound requests:
//! - Validating requests and shaping responses
//! - Classifying tickets with the LLM
//! - Storing classified tickets on a best-effort basis

pub mod classify;
pub mod error;
pub mod predict;
pub mod ticket_storage;
