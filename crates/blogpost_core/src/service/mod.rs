//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce invariants the schema alone cannot express.
//! - Keep callers decoupled from storage details.

pub mod blog_service;
pub mod error;
