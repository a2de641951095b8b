use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::github::error::ApiError;
use crate::github::types::{ChangeStats, PrState, QuotaStatus, SearchItem, SearchPage};

/// Results per search page, the GitHub maximum.
pub const PER_PAGE: u32 = 100;

/// The search API refuses to serve results past the first thousand.
const SEARCH_RESULT_CAP: u64 = 1000;

/// The narrow slice of the GitHub API the pipeline consumes. One production
/// adapter wraps octocrab; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait GithubApi {
    /// One page (1-based) of PR search results, newest first.
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, ApiError>;

    /// Change-size statistics for a single pull request.
    async fn pull_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ChangeStats, ApiError>;

    /// Current rate-limit snapshot.
    async fn quota(&self) -> Result<QuotaStatus, ApiError>;
}

/// Production adapter over an authenticated octocrab client.
pub struct GithubClient {
    inner: Octocrab,
}

impl GithubClient {
    /// Build an authenticated client from a personal access token.
    pub fn new(token: &str) -> Result<Self> {
        let inner = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;
        Ok(Self { inner })
    }
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u32,
    page: u32,
    sort: &'a str,
    order: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    items: Vec<IssueHit>,
}

#[derive(Debug, Deserialize)]
struct IssueHit {
    title: String,
    number: u64,
    html_url: String,
    repository_url: String,
    state: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserRef>,
    // Present only when the issue is a pull request.
    #[serde(default)]
    pull_request: Option<PullRequestLink>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestLink {
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PullDetail {
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    commits: u64,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateWindow,
}

#[derive(Debug, Deserialize)]
struct RateWindow {
    limit: u64,
    remaining: u64,
    reset: i64,
}

impl IssueHit {
    fn into_search_item(self) -> SearchItem {
        let (repo_owner, repo_name) = split_repository_url(&self.repository_url);
        let merged = self
            .pull_request
            .as_ref()
            .and_then(|link| link.merged_at)
            .is_some();
        let state = match self.state.as_str() {
            "open" => PrState::Open,
            _ => PrState::Closed,
        };
        SearchItem {
            title: self.title,
            number: self.number,
            url: self.html_url,
            repo_owner,
            repo_name,
            state,
            author: self.user.map(|u| u.login).unwrap_or_default(),
            created_at: self.created_at,
            closed_at: self.closed_at,
            merged,
            body: self.body.unwrap_or_default(),
        }
    }
}

/// Extract `owner` and `repo` from an API repository URL
/// (`https://api.github.com/repos/{owner}/{repo}`).
fn split_repository_url(url: &str) -> (String, String) {
    let mut segments = url.rsplit('/');
    let repo = segments.next().unwrap_or("unknown").to_string();
    let owner = segments.next().unwrap_or("unknown").to_string();
    (owner, repo)
}

impl GithubApi for GithubClient {
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        let params = SearchParams {
            q: query,
            per_page: PER_PAGE,
            page,
            sort: "created",
            order: "desc",
        };
        let response: SearchResponse = self
            .inner
            .get("/search/issues", Some(&params))
            .await
            .map_err(ApiError::from_octocrab)?;

        let has_more = !response.items.is_empty()
            && u64::from(page) * u64::from(PER_PAGE) < response.total_count.min(SEARCH_RESULT_CAP);
        let items = response
            .items
            .into_iter()
            .filter(|hit| hit.pull_request.is_some())
            .map(IssueHit::into_search_item)
            .collect();

        Ok(SearchPage { items, has_more })
    }

    async fn pull_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ChangeStats, ApiError> {
        let route = format!("/repos/{}/{}/pulls/{}", owner, repo, number);
        let detail: PullDetail = self
            .inner
            .get(route, None::<&()>)
            .await
            .map_err(ApiError::from_octocrab)?;

        Ok(ChangeStats {
            additions: detail.additions,
            deletions: detail.deletions,
            changed_files: detail.changed_files,
            commits: detail.commits,
        })
    }

    async fn quota(&self) -> Result<QuotaStatus, ApiError> {
        let response: RateLimitResponse = self
            .inner
            .get("/rate_limit", None::<&()>)
            .await
            .map_err(ApiError::from_octocrab)?;

        let reset_at = Utc
            .timestamp_opt(response.rate.reset, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Ok(QuotaStatus {
            remaining: response.rate.remaining,
            limit: response.rate.limit,
            reset_at,
        })
    }
}
