//! Rate-governed collection of GitHub pull-request activity plus the
//! analytics that turn it into a markdown report: complexity
//! classification, notable-PR detection, and contributor leaderboards.

pub mod analytics;
pub mod github;
pub mod period;
pub mod report;
pub mod users;
