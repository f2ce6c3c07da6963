pub mod client;
pub mod config;
pub mod guard;
pub mod post;
pub mod store;

// Re-export important structs for convenience
pub use client::{FeedClient, FeedTransport, Session};
pub use config::Config;
pub use guard::MutationGuard;
pub use post::{annotate, Author, Comment, Post, RawPost};
pub use store::{FeedStore, LikePatch};
