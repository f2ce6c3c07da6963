pub mod app_controller;
pub mod feed_controller;

// Re-export key items
pub use app_controller::start_app;
pub use feed_controller::{init_session, FeedEngine, MutationOutcome};
