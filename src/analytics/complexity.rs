use crate::github::types::ChangeStats;

/// Ordinal change-size classification for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComplexityLevel {
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl ComplexityLevel {
    /// Numeric rank 1..4, increasing with size.
    pub fn rank(self) -> u8 {
        match self {
            ComplexityLevel::Small => 1,
            ComplexityLevel::Medium => 2,
            ComplexityLevel::Large => 3,
            ComplexityLevel::VeryLarge => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplexityLevel::Small => "Small",
            ComplexityLevel::Medium => "Medium",
            ComplexityLevel::Large => "Large",
            ComplexityLevel::VeryLarge => "Very Large",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ComplexityLevel::Small => "\u{1F7E2}",
            ComplexityLevel::Medium => "\u{1F7E1}",
            ComplexityLevel::Large => "\u{1F7E0}",
            ComplexityLevel::VeryLarge => "\u{1F534}",
        }
    }
}

/// Classify change stats by total lines changed and files touched.
///
/// Rows are evaluated top to bottom and both bounds must hold, so a small
/// diff spread across many files still lands in a larger tier.
pub fn classify(stats: &ChangeStats) -> ComplexityLevel {
    let total = stats.total_changes();
    let files = stats.changed_files;

    if total < 100 && files < 5 {
        ComplexityLevel::Small
    } else if total < 500 && files < 15 {
        ComplexityLevel::Medium
    } else if total < 1000 && files < 30 {
        ComplexityLevel::Large
    } else {
        ComplexityLevel::VeryLarge
    }
}
