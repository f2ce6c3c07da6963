pub mod models;
pub mod views;
pub mod controllers;
pub mod cli;
pub mod error;

// Re-exports for convenience
pub use controllers::{start_app, FeedEngine, MutationOutcome};
pub use error::FeedtuiError;
pub use models::{Config, FeedClient, FeedTransport, Post, Session};
