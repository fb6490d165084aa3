/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User listing, creation, deletion, and login
/// - `data`: Unfiltered metric listings
/// - `ingest`: Bulk CSV upload endpoints

pub mod data;
pub mod health;
pub mod ingest;
pub mod users;
