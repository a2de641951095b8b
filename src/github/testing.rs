//! In-memory `GithubApi` fake for exercising the executor and fetcher
//! without a network.

use chrono::{Duration as ChronoDuration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::github::client::GithubApi;
use crate::github::error::ApiError;
use crate::github::types::{ChangeStats, PrState, QuotaStatus, SearchItem, SearchPage};

/// Which taxonomy class an injected failure should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    RateLimited,
    Transient,
    NonRetryable,
}

impl FakeFailure {
    fn to_error(self) -> ApiError {
        match self {
            FakeFailure::RateLimited => ApiError::RateLimited("API rate limit exceeded".into()),
            FakeFailure::Transient => ApiError::Transient("connection reset".into()),
            FakeFailure::NonRetryable => ApiError::NonRetryable("injected failure".into()),
        }
    }
}

#[derive(Default)]
pub struct FakeClient {
    quota: Mutex<Option<QuotaStatus>>,
    pages: Mutex<HashMap<String, Vec<Vec<SearchItem>>>>,
    details: Mutex<HashMap<u64, ChangeStats>>,
    failing_details: Mutex<HashSet<u64>>,
    failing_searches: Mutex<HashMap<String, FakeFailure>>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub quota_calls: AtomicUsize,
}

impl FakeClient {
    /// A fake with a comfortably full quota and no data.
    pub fn new() -> Self {
        Self::with_quota(QuotaStatus {
            remaining: 5000,
            limit: 5000,
            reset_at: Utc::now() + ChronoDuration::hours(1),
        })
    }

    pub fn with_quota(status: QuotaStatus) -> Self {
        let client = Self::default();
        *client.quota.lock().unwrap() = Some(status);
        client
    }

    /// A fake whose quota endpoint itself fails.
    pub fn with_broken_quota() -> Self {
        Self::default()
    }

    /// Append one page of results for a query. Pages are served in the
    /// order added.
    pub fn add_page(&self, query: &str, items: Vec<SearchItem>) {
        self.pages
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push(items);
    }

    pub fn add_detail(&self, number: u64, stats: ChangeStats) {
        self.details.lock().unwrap().insert(number, stats);
    }

    pub fn fail_detail(&self, number: u64) {
        self.failing_details.lock().unwrap().insert(number);
    }

    pub fn fail_search(&self, query: &str, failure: FakeFailure) {
        self.failing_searches
            .lock()
            .unwrap()
            .insert(query.to_string(), failure);
    }
}

impl GithubApi for FakeClient {
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failing_searches.lock().unwrap().get(query) {
            return Err(failure.to_error());
        }
        let pages = self.pages.lock().unwrap();
        let all = pages.get(query).cloned().unwrap_or_default();
        let idx = page.saturating_sub(1) as usize;
        let items = all.get(idx).cloned().unwrap_or_default();
        let has_more = idx + 1 < all.len();
        Ok(SearchPage { items, has_more })
    }

    async fn pull_details(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> Result<ChangeStats, ApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.lock().unwrap().contains(&number) {
            return Err(ApiError::NonRetryable("injected detail failure".into()));
        }
        Ok(self
            .details
            .lock()
            .unwrap()
            .get(&number)
            .copied()
            .unwrap_or_default())
    }

    async fn quota(&self) -> Result<QuotaStatus, ApiError> {
        self.quota_calls.fetch_add(1, Ordering::SeqCst);
        self.quota
            .lock()
            .unwrap()
            .ok_or_else(|| ApiError::Transient("rate limit endpoint unavailable".into()))
    }
}

/// A plausible search hit against `acme/widgets`.
pub fn search_item(number: u64, title: &str, merged: bool) -> SearchItem {
    SearchItem {
        title: title.to_string(),
        number,
        url: format!("https://github.com/acme/widgets/pull/{}", number),
        repo_owner: "acme".to_string(),
        repo_name: "widgets".to_string(),
        state: if merged { PrState::Closed } else { PrState::Open },
        author: "someone".to_string(),
        created_at: Utc::now(),
        closed_at: if merged { Some(Utc::now()) } else { None },
        merged,
        body: String::new(),
    }
}
