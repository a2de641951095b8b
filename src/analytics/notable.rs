use crate::analytics::complexity::ComplexityLevel;
use crate::github::types::{ContributorActivity, PullRequestRecord};

/// A notable PR paired with the contributor it belongs to.
pub type NotableEntry<'a> = (&'a PullRequestRecord, &'a str);

/// Highlight buckets for the report. A PR may land in several buckets;
/// nothing here deduplicates or caps — trimming for display is the
/// renderer's concern.
#[derive(Debug, Default)]
pub struct NotableBuckets<'a> {
    pub very_large: Vec<NotableEntry<'a>>,
    pub critical: Vec<NotableEntry<'a>>,
    pub security: Vec<NotableEntry<'a>>,
    pub features: Vec<NotableEntry<'a>>,
}

impl NotableBuckets<'_> {
    pub fn is_empty(&self) -> bool {
        self.very_large.is_empty()
            && self.critical.is_empty()
            && self.security.is_empty()
            && self.features.is_empty()
    }
}

/// Scan every created PR across all contributors for highlight-worthy
/// entries. Only merged PRs qualify.
///
/// The keyword sets are deliberately asymmetric between title and body
/// (only "critical" and "security" match in bodies, and features need the
/// full phrase "new feature" there). Reports have always classified this
/// way; changing it would silently reshuffle existing highlights.
pub fn detect_notable_prs(users: &[ContributorActivity]) -> NotableBuckets<'_> {
    let mut buckets = NotableBuckets::default();

    for user in users {
        for pr in &user.created {
            if !pr.merged {
                continue;
            }
            let title = pr.title.to_lowercase();
            let body = pr.body.to_lowercase();
            let entry = (pr, user.username.as_str());

            if pr.complexity == ComplexityLevel::VeryLarge {
                buckets.very_large.push(entry);
            }
            if title.contains("critical")
                || title.contains("urgent")
                || title.contains("hotfix")
                || body.contains("critical")
            {
                buckets.critical.push(entry);
            }
            if title.contains("security")
                || title.contains("vulnerability")
                || title.contains("cve")
                || body.contains("security")
            {
                buckets.security.push(entry);
            }
            if title.contains("feature")
                || title.contains("feat:")
                || title.contains("add")
                || body.contains("new feature")
            {
                buckets.features.push(entry);
            }
        }
    }

    buckets
}
