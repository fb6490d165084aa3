//! # Metrica API Server Library
//!
//! Core functionality for the Metrica API server: user management with
//! role assignments, email/password login issuing session tokens, bulk
//! CSV ingestion, and unfiltered metric listings.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
