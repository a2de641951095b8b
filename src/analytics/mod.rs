pub mod complexity;
pub mod notable;
pub mod ranking;

pub use complexity::{classify, ComplexityLevel};
pub use notable::{detect_notable_prs, NotableBuckets};
pub use ranking::{rank_contributors, Leaderboards};
