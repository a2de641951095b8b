pub mod client;
pub mod error;
pub mod executor;
pub mod quota;
pub mod search;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use client::{GithubApi, GithubClient};
pub use error::ApiError;
pub use search::{fetch_created_prs, fetch_reviewed_prs};
