use chrono::{DateTime, Utc};

use crate::analytics::complexity::ComplexityLevel;

/// Snapshot of the API rate limit at the moment it was read. Never cached
/// beyond a single decision; the quota is shared, server-side state.
#[derive(Debug, Clone, Copy)]
pub struct QuotaStatus {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: DateTime<Utc>,
}

/// Change-size statistics from the pull request detail endpoint.
/// All-zero when the lookup fails; a missing lookup never drops a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStats {
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub commits: u64,
}

impl ChangeStats {
    pub fn total_changes(&self) -> u64 {
        self.additions + self.deletions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Open,
    Closed,
}

impl PrState {
    pub fn label(self) -> &'static str {
        match self {
            PrState::Open => "open",
            PrState::Closed => "closed",
        }
    }
}

/// One hit from the search API, before stats enrichment.
#[derive(Debug, Clone)]
pub struct SearchItem {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub state: PrState,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged: bool,
    pub body: String,
}

/// A page of search results plus whether more pages follow.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub has_more: bool,
}

/// A created pull request enriched with stats and a complexity level.
/// Immutable once built by the fetcher.
#[derive(Debug, Clone)]
pub struct PullRequestRecord {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub state: PrState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged: bool,
    pub body: String,
    pub stats: ChangeStats,
    pub complexity: ComplexityLevel,
}

impl PullRequestRecord {
    /// `owner/repo` as shown in the report.
    pub fn repo(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// A pull request someone reviewed. Lighter weight than a created PR:
/// no stats, no complexity.
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub repo: String,
    pub state: PrState,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Everything fetched for one requested username.
#[derive(Debug, Clone)]
pub struct ContributorActivity {
    pub username: String,
    pub created: Vec<PullRequestRecord>,
    pub reviewed: Vec<ReviewRecord>,
}

impl ContributorActivity {
    pub fn merged_count(&self) -> usize {
        self.created.iter().filter(|pr| pr.merged).count()
    }

    pub fn open_count(&self) -> usize {
        self.created
            .iter()
            .filter(|pr| pr.state == PrState::Open)
            .count()
    }

    /// Sum of lines changed across all created PRs.
    pub fn code_impact(&self) -> u64 {
        self.created.iter().map(|pr| pr.stats.total_changes()).sum()
    }

    pub fn total_additions(&self) -> u64 {
        self.created.iter().map(|pr| pr.stats.additions).sum()
    }

    pub fn total_deletions(&self) -> u64 {
        self.created.iter().map(|pr| pr.stats.deletions).sum()
    }

    pub fn total_files_changed(&self) -> u64 {
        self.created.iter().map(|pr| pr.stats.changed_files).sum()
    }
}
