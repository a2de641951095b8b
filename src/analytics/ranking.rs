use crate::github::types::ContributorActivity;

#[derive(Debug, Clone, PartialEq)]
pub struct PrCountEntry {
    pub username: String,
    pub count: usize,
    pub merged: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeImpactEntry {
    pub username: String,
    pub impact: u64,
    pub prs: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCountEntry {
    pub username: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeRateEntry {
    pub username: String,
    /// Percentage 0..100. Defined as 0 for contributors with no created PRs.
    pub rate: f64,
    pub total: usize,
}

/// Four independently sorted leaderboards over the same contributors.
/// Sorts are stable, so ties keep the original contributor order and the
/// output is deterministic run to run.
#[derive(Debug, Default)]
pub struct Leaderboards {
    pub by_prs: Vec<PrCountEntry>,
    pub by_code_impact: Vec<CodeImpactEntry>,
    pub by_reviews: Vec<ReviewCountEntry>,
    pub by_merge_rate: Vec<MergeRateEntry>,
}

impl Leaderboards {
    /// The perfect-merge-rate highlight only counts contributors with at
    /// least two created PRs; a single merged PR is not a track record.
    pub fn perfect_merge_leader(&self) -> Option<&MergeRateEntry> {
        self.by_merge_rate
            .iter()
            .find(|entry| entry.total >= 2)
            .filter(|entry| entry.rate == 100.0)
    }
}

/// Aggregate per-contributor metrics and rank them four ways.
pub fn rank_contributors(users: &[ContributorActivity]) -> Leaderboards {
    let mut boards = Leaderboards::default();

    for user in users {
        let created = user.created.len();
        let merged = user.merged_count();
        let rate = if created > 0 {
            merged as f64 / created as f64 * 100.0
        } else {
            0.0
        };

        boards.by_prs.push(PrCountEntry {
            username: user.username.clone(),
            count: created,
            merged,
        });
        boards.by_code_impact.push(CodeImpactEntry {
            username: user.username.clone(),
            impact: user.code_impact(),
            prs: created,
        });
        boards.by_reviews.push(ReviewCountEntry {
            username: user.username.clone(),
            count: user.reviewed.len(),
        });
        boards.by_merge_rate.push(MergeRateEntry {
            username: user.username.clone(),
            rate,
            total: created,
        });
    }

    boards.by_prs.sort_by(|a, b| b.count.cmp(&a.count));
    boards.by_code_impact.sort_by(|a, b| b.impact.cmp(&a.impact));
    boards.by_reviews.sort_by(|a, b| b.count.cmp(&a.count));
    boards.by_merge_rate.sort_by(|a, b| {
        b.rate
            .partial_cmp(&a.rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    boards
}
