use tracing::{debug, warn};

use crate::analytics::complexity::classify;
use crate::github::client::GithubApi;
use crate::github::error::ApiError;
use crate::github::executor::{self, DEFAULT_MAX_ATTEMPTS};
use crate::github::types::{
    ChangeStats, PullRequestRecord, ReviewRecord, SearchItem,
};
use crate::period::DateRange;

/// Fetch all PRs a user created in the window, paginating exhaustively and
/// enriching each hit with change stats and a complexity level.
///
/// A failed stats lookup degrades that one record to zero stats; the batch
/// continues. A failed search degrades the whole user to an empty list so
/// other users still get reported — except rate-limit exhaustion, which is
/// fatal for the run and propagates.
pub async fn fetch_created_prs<C: GithubApi>(
    client: &C,
    username: &str,
    range: &DateRange,
    org: Option<&str>,
) -> Result<Vec<PullRequestRecord>, ApiError> {
    let query = build_query("author", username, range, org);
    let items = match collect_all_pages(client, &query).await {
        Ok(items) => items,
        Err(ApiError::RateLimitExceeded) => return Err(ApiError::RateLimitExceeded),
        Err(e) => {
            warn!("Error fetching created PRs for {}: {}", username, e);
            return Ok(Vec::new());
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let stats = fetch_change_stats(client, &item).await;
        let complexity = classify(&stats);
        records.push(PullRequestRecord {
            title: item.title,
            number: item.number,
            url: item.url,
            repo_owner: item.repo_owner,
            repo_name: item.repo_name,
            state: item.state,
            created_at: item.created_at,
            closed_at: item.closed_at,
            merged: item.merged,
            body: item.body,
            stats,
            complexity,
        });
    }
    Ok(records)
}

/// Fetch all PRs a user reviewed in the window. No stats enrichment.
/// Failure handling mirrors `fetch_created_prs`.
pub async fn fetch_reviewed_prs<C: GithubApi>(
    client: &C,
    username: &str,
    range: &DateRange,
    org: Option<&str>,
) -> Result<Vec<ReviewRecord>, ApiError> {
    let query = build_query("reviewed-by", username, range, org);
    let items = match collect_all_pages(client, &query).await {
        Ok(items) => items,
        Err(ApiError::RateLimitExceeded) => return Err(ApiError::RateLimitExceeded),
        Err(e) => {
            warn!("Error fetching reviewed PRs for {}: {}", username, e);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .map(|item| ReviewRecord {
            title: item.title,
            number: item.number,
            url: item.url,
            repo: format!("{}/{}", item.repo_owner, item.repo_name),
            state: item.state,
            author: item.author,
            created_at: item.created_at,
        })
        .collect())
}

/// Search query in GitHub's issue-search grammar, scoped to PRs created in
/// the window.
fn build_query(role: &str, username: &str, range: &DateRange, org: Option<&str>) -> String {
    let mut query = format!("{}:{}", role, username);
    if let Some(org) = org {
        query.push_str(&format!(" org:{}", org));
    }
    query.push_str(&format!(
        " is:pr created:{}..{}",
        range.start_date(),
        range.end_date()
    ));
    query
}

/// Walk every page of a search query through the retrying executor.
async fn collect_all_pages<C: GithubApi>(
    client: &C,
    query: &str,
) -> Result<Vec<SearchItem>, ApiError> {
    let mut items = Vec::new();
    let mut page: u32 = 1;
    loop {
        let result =
            executor::execute(client, DEFAULT_MAX_ATTEMPTS, || client.search_page(query, page))
                .await?;
        items.extend(result.items);
        if !result.has_more {
            break;
        }
        page += 1;
    }
    debug!("Query '{}' returned {} items", query, items.len());
    Ok(items)
}

/// One detail lookup through the executor. Any failure here is absorbed
/// into zero stats so a single bad PR never aborts the batch.
async fn fetch_change_stats<C: GithubApi>(client: &C, item: &SearchItem) -> ChangeStats {
    let lookup = executor::execute(client, DEFAULT_MAX_ATTEMPTS, || {
        client.pull_details(&item.repo_owner, &item.repo_name, item.number)
    })
    .await;

    match lookup {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Could not fetch stats for PR #{}: {}", item.number, e);
            ChangeStats::default()
        }
    }
}
