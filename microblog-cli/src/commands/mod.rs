//! Command implementations for the microblog CLI

pub mod post;

pub use post::run_post;
