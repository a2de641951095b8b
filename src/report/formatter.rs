//! Pure markdown rendering over the analytics output. Nothing in here
//! talks to the network or mutates the activity data.

use chrono::Utc;
use std::fmt::Write;

use crate::analytics::notable::NotableEntry;
use crate::analytics::{detect_notable_prs, rank_contributors};
use crate::github::types::{ContributorActivity, PrState, PullRequestRecord, ReviewRecord};
use crate::period::DateRange;

/// Notable PRs shown per highlight section.
const HIGHLIGHT_CAP: usize = 3;

/// Characters of PR description quoted in the per-PR introduction.
const INTRO_LIMIT: usize = 200;

/// Render the full activity report, stamped with today's date.
pub fn render_report(users: &[ContributorActivity], range: &DateRange) -> String {
    render_report_dated(users, range, &Utc::now().format("%Y-%m-%d").to_string())
}

/// Render with an explicit generation date. The date line is the only
/// non-deterministic input, so tests pin it here.
pub fn render_report_dated(
    users: &[ContributorActivity],
    range: &DateRange,
    generated: &str,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# GitHub Pull Request Activity Report\n");
    let _ = writeln!(
        out,
        "**Period:** {} to {}\n",
        range.start_date(),
        range.end_date()
    );
    let _ = writeln!(out, "**Generated:** {}\n", generated);
    out.push_str("---\n\n");

    let total_created: usize = users.iter().map(|u| u.created.len()).sum();
    let total_reviewed: usize = users.iter().map(|u| u.reviewed.len()).sum();
    let total_merged: usize = users.iter().map(|u| u.merged_count()).sum();
    let total_additions: u64 = users.iter().map(|u| u.total_additions()).sum();
    let total_deletions: u64 = users.iter().map(|u| u.total_deletions()).sum();
    let total_files: u64 = users.iter().map(|u| u.total_files_changed()).sum();
    let avg_pr_size = average(total_additions + total_deletions, total_created);
    let merge_rate = percentage(total_merged, total_created);

    out.push_str("## Executive Summary\n\n");
    let _ = writeln!(
        out,
        "This report provides an overview of GitHub pull request activity for {} contributor(s) during the specified period.\n",
        users.len()
    );
    out.push_str("### Key Metrics\n\n");
    let _ = writeln!(out, "- **Total PRs Created:** {}", total_created);
    let _ = writeln!(out, "- **Total PRs Merged:** {}", total_merged);
    let _ = writeln!(out, "- **Total PRs Reviewed:** {}", total_reviewed);
    let _ = writeln!(out, "- **Merge Rate:** {:.1}%\n", merge_rate);

    out.push_str("### Code Changes\n\n");
    let _ = writeln!(out, "- **Total Lines Added:** {}", group_thousands(total_additions));
    let _ = writeln!(out, "- **Total Lines Deleted:** {}", group_thousands(total_deletions));
    let _ = writeln!(out, "- **Total Files Changed:** {}", group_thousands(total_files));
    let _ = writeln!(
        out,
        "- **Average PR Size:** {} lines changed\n",
        group_thousands(avg_pr_size)
    );
    out.push_str("---\n\n");

    if total_created > 0 {
        render_highlights(&mut out, users);
    }

    for user in users {
        render_user_section(&mut out, user);
    }

    out.push_str("## Overall Impact & Benefits\n\n");
    out.push_str("The contributions during this period demonstrate:\n\n");
    let _ = writeln!(
        out,
        "1. **Active Development:** {} pull requests created, showing ongoing feature development and improvements",
        total_created
    );
    let _ = writeln!(
        out,
        "2. **Code Quality:** {} pull requests reviewed, ensuring code quality through peer review",
        total_reviewed
    );
    let _ = writeln!(
        out,
        "3. **Delivery Rate:** {:.1}% of created PRs were successfully merged",
        merge_rate
    );
    out.push_str(
        "4. **Collaboration:** Team members actively reviewing each other's code promotes knowledge sharing and quality\n\n",
    );

    out
}

fn render_highlights(out: &mut String, users: &[ContributorActivity]) {
    let notable = detect_notable_prs(users);
    let rankings = rank_contributors(users);

    out.push_str("## 🏆 Highlights\n\n");

    render_notable_section(out, "### 🚨 Critical Fixes\n\n", &notable.critical);
    render_notable_section(out, "### 🔒 Security Enhancements\n\n", &notable.security);
    render_notable_section(out, "### ✨ New Features\n\n", &notable.features);

    if !notable.very_large.is_empty() {
        out.push_str("### 🔴 Major Changes (Very Large PRs)\n\n");
        for (pr, username) in notable.very_large.iter().take(HIGHLIGHT_CAP) {
            let _ = writeln!(out, "- **{}** by @{}", pr.title, username);
            let _ = writeln!(out, "  - [#{}]({}) in {}", pr.number, pr.url, pr.repo());
            let _ = writeln!(
                out,
                "  - 🔴 Very Large: {} lines changed across {} files\n",
                group_thousands(pr.stats.total_changes()),
                pr.stats.changed_files
            );
        }
    }

    out.push_str("### 🌟 Top Contributors\n\n");

    if let Some(top) = rankings.by_prs.first().filter(|t| t.count > 0) {
        let _ = writeln!(
            out,
            "- **Most Active:** @{} ({} PR{} created, {} merged)",
            top.username,
            top.count,
            plural(top.count),
            top.merged
        );
    }
    if let Some(top) = rankings.by_code_impact.first().filter(|t| t.impact > 0) {
        let _ = writeln!(
            out,
            "- **Largest Impact:** @{} ({} lines changed across {} PR{})",
            top.username,
            group_thousands(top.impact),
            top.prs,
            plural(top.prs)
        );
    }
    if let Some(top) = rankings.by_reviews.first().filter(|t| t.count > 0) {
        let _ = writeln!(
            out,
            "- **Top Reviewer:** @{} ({} review{})",
            top.username,
            top.count,
            plural(top.count)
        );
    }
    if let Some(top) = rankings.perfect_merge_leader() {
        let _ = writeln!(
            out,
            "- **Perfect Merge Rate:** @{} ({}/{} PRs merged)",
            top.username, top.total, top.total
        );
    }

    out.push_str("\n---\n\n");
}

fn render_notable_section(out: &mut String, heading: &str, entries: &[NotableEntry<'_>]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(heading);
    for (pr, username) in entries.iter().take(HIGHLIGHT_CAP) {
        let _ = writeln!(out, "- **{}** by @{}", pr.title, username);
        let _ = writeln!(out, "  - [#{}]({}) in {}", pr.number, pr.url, pr.repo());
        let _ = writeln!(
            out,
            "  - {} {} lines changed\n",
            pr.complexity.emoji(),
            group_thousands(pr.stats.total_changes())
        );
    }
}

fn render_user_section(out: &mut String, user: &ContributorActivity) {
    let _ = writeln!(out, "## {}\n", user.username);

    let merged = user.merged_count();
    let open = user.open_count();
    let closed = user.created.len() - merged - open;

    out.push_str("### Summary\n\n");
    let _ = writeln!(out, "- **PRs Created:** {}", user.created.len());
    let _ = writeln!(out, "  - Merged: {}", merged);
    let _ = writeln!(out, "  - Open: {}", open);
    let _ = writeln!(out, "  - Closed: {}", closed);
    let _ = writeln!(out, "- **PRs Reviewed:** {}", user.reviewed.len());

    if !user.created.is_empty() {
        let additions = user.total_additions();
        let deletions = user.total_deletions();
        let avg = average(additions + deletions, user.created.len());

        out.push_str("\n**Code Statistics:**\n");
        let _ = writeln!(out, "- **Lines Added:** {}", group_thousands(additions));
        let _ = writeln!(out, "- **Lines Deleted:** {}", group_thousands(deletions));
        let _ = writeln!(
            out,
            "- **Files Changed:** {}",
            group_thousands(user.total_files_changed())
        );
        let _ = writeln!(out, "- **Average PR Size:** {} lines", group_thousands(avg));

        let dist = complexity_distribution(user);
        out.push_str("\n**PR Complexity Distribution:**\n");
        let _ = writeln!(
            out,
            "- 🟢 Small: {} | 🟡 Medium: {} | 🟠 Large: {} | 🔴 Very Large: {}",
            dist[0], dist[1], dist[2], dist[3]
        );
    }
    out.push('\n');

    if !user.created.is_empty() {
        out.push_str("### Pull Requests Created\n\n");
        for (index, pr) in user.created.iter().enumerate() {
            render_created_pr(out, index + 1, pr);
        }
    }

    if !user.reviewed.is_empty() {
        out.push_str("### Pull Requests Reviewed\n\n");
        let _ = writeln!(
            out,
            "{} provided reviews for {} pull request(s):\n",
            user.username,
            user.reviewed.len()
        );
        for (repo, reviews) in group_reviews_by_repo(&user.reviewed) {
            let _ = writeln!(out, "**{}** ({} review{}):", repo, reviews.len(), plural(reviews.len()));
            for pr in reviews {
                let _ = writeln!(
                    out,
                    "- [#{}]({}) - {} (by @{})",
                    pr.number, pr.url, pr.title, pr.author
                );
            }
            out.push('\n');
        }
    }

    out.push_str("---\n\n");
}

fn render_created_pr(out: &mut String, index: usize, pr: &PullRequestRecord) {
    let status_icon = if pr.merged {
        "✅"
    } else if pr.state == PrState::Open {
        "🔄"
    } else {
        "❌"
    };
    let status = if pr.merged { "Merged" } else { pr.state.label() };

    let _ = writeln!(out, "#### {}. {} {}\n", index, status_icon, pr.title);
    let _ = writeln!(out, "- **Repository:** {}", pr.repo());
    let _ = writeln!(out, "- **PR Number:** [#{}]({})", pr.number, pr.url);
    let _ = writeln!(out, "- **Status:** {}", status);
    let _ = writeln!(out, "- **Created:** {}", pr.created_at.format("%Y-%m-%d"));
    if let Some(closed_at) = pr.closed_at {
        let _ = writeln!(out, "- **Closed:** {}", closed_at.format("%Y-%m-%d"));
    }
    let _ = writeln!(
        out,
        "- **Complexity:** {} {}",
        pr.complexity.emoji(),
        pr.complexity.label()
    );
    let _ = writeln!(
        out,
        "- **Changes:** +{} / -{} lines",
        group_thousands(pr.stats.additions),
        group_thousands(pr.stats.deletions)
    );
    let _ = writeln!(out, "- **Files Changed:** {}", pr.stats.changed_files);
    if pr.stats.commits > 0 {
        let _ = writeln!(out, "- **Commits:** {}", pr.stats.commits);
    }

    out.push_str("\n**Introduction:**\n");
    let _ = writeln!(out, "{}\n", intro_snippet(&pr.body));

    out.push_str("**Benefits:**\n");
    for benefit in extract_pr_benefits(pr) {
        let _ = writeln!(out, "- {}", benefit);
    }
    out.push('\n');
}

/// First three description lines, joined and clipped for the report.
fn intro_snippet(body: &str) -> String {
    let intro: String = body
        .lines()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(INTRO_LIMIT)
        .collect();
    if intro.is_empty() {
        return "No description provided".to_string();
    }
    if intro.chars().count() >= INTRO_LIMIT {
        format!("{}...", intro)
    } else {
        intro
    }
}

/// Keyword scan over the PR description for the benefits list. Falls back
/// to a generic line so the section is never empty.
fn extract_pr_benefits(pr: &PullRequestRecord) -> Vec<&'static str> {
    let body = pr.body.to_lowercase();
    let mut benefits = Vec::new();

    if body.contains("fix") || body.contains("bug") {
        benefits.push("Bug fix");
    }
    if body.contains("performance") || body.contains("optimize") {
        benefits.push("Performance improvement");
    }
    if body.contains("security") || body.contains("vulnerability") {
        benefits.push("Security enhancement");
    }
    if body.contains("feature") || body.contains("add") {
        benefits.push("New feature");
    }
    if body.contains("refactor") || body.contains("clean") {
        benefits.push("Code quality improvement");
    }
    if body.contains("test") || body.contains("coverage") {
        benefits.push("Test coverage");
    }
    if body.contains("doc") || body.contains("readme") {
        benefits.push("Documentation");
    }

    if benefits.is_empty() {
        benefits.push("Code contribution");
    }
    benefits
}

/// Reviews grouped by repository in first-seen order.
fn group_reviews_by_repo(reviews: &[ReviewRecord]) -> Vec<(&str, Vec<&ReviewRecord>)> {
    let mut groups: Vec<(&str, Vec<&ReviewRecord>)> = Vec::new();
    for review in reviews {
        match groups.iter_mut().find(|(repo, _)| *repo == review.repo) {
            Some((_, entries)) => entries.push(review),
            None => groups.push((review.repo.as_str(), vec![review])),
        }
    }
    groups
}

fn complexity_distribution(user: &ContributorActivity) -> [usize; 4] {
    let mut dist = [0usize; 4];
    for pr in &user.created {
        dist[(pr.complexity.rank() - 1) as usize] += 1;
    }
    dist
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn average(total: u64, count: usize) -> u64 {
    if count == 0 {
        0
    } else {
        (total as f64 / count as f64).round() as u64
    }
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::complexity::{classify, ComplexityLevel};
    use crate::github::types::{ChangeStats, ContributorActivity};
    use crate::period::parse_period;
    use chrono::Utc;

    fn pr(
        number: u64,
        title: &str,
        body: &str,
        merged: bool,
        stats: ChangeStats,
    ) -> PullRequestRecord {
        let complexity = classify(&stats);
        PullRequestRecord {
            title: title.to_string(),
            number,
            url: format!("https://github.com/acme/widgets/pull/{}", number),
            repo_owner: "acme".to_string(),
            repo_name: "widgets".to_string(),
            state: if merged { PrState::Closed } else { PrState::Open },
            created_at: Utc::now(),
            closed_at: merged.then(Utc::now),
            merged,
            body: body.to_string(),
            stats,
            complexity,
        }
    }

    fn sample_users() -> Vec<ContributorActivity> {
        vec![
            ContributorActivity {
                username: "alice".to_string(),
                created: vec![
                    pr(
                        1,
                        "Critical hotfix",
                        "Fixes the outage",
                        true,
                        ChangeStats {
                            additions: 1200,
                            deletions: 50,
                            changed_files: 40,
                            commits: 8,
                        },
                    ),
                    pr(
                        2,
                        "Tidy config",
                        "",
                        true,
                        ChangeStats {
                            additions: 10,
                            deletions: 2,
                            changed_files: 1,
                            commits: 1,
                        },
                    ),
                ],
                reviewed: vec![ReviewRecord {
                    title: "Widget polish".to_string(),
                    number: 9,
                    url: "https://github.com/acme/widgets/pull/9".to_string(),
                    repo: "acme/widgets".to_string(),
                    state: PrState::Open,
                    author: "bob".to_string(),
                    created_at: Utc::now(),
                }],
            },
            ContributorActivity {
                username: "bob".to_string(),
                created: vec![],
                reviewed: vec![],
            },
        ]
    }

    fn render() -> String {
        let range = parse_period("2025-01-01..2025-01-31").unwrap();
        render_report_dated(&sample_users(), &range, "2025-02-01")
    }

    #[test]
    fn test_header_and_summary() {
        let report = render();
        assert!(report.starts_with("# GitHub Pull Request Activity Report"));
        assert!(report.contains("**Period:** 2025-01-01 to 2025-01-31"));
        assert!(report.contains("**Generated:** 2025-02-01"));
        assert!(report.contains("- **Total PRs Created:** 2"));
        assert!(report.contains("- **Total PRs Merged:** 2"));
        assert!(report.contains("- **Merge Rate:** 100.0%"));
        assert!(report.contains("- **Total Lines Added:** 1,210"));
    }

    #[test]
    fn test_highlights_include_notables_and_leaders() {
        let report = render();
        assert!(report.contains("### 🚨 Critical Fixes"));
        assert!(report.contains("### 🔴 Major Changes (Very Large PRs)"));
        assert!(report.contains("- **Most Active:** @alice (2 PRs created, 2 merged)"));
        assert!(report.contains("- **Perfect Merge Rate:** @alice (2/2 PRs merged)"));
    }

    #[test]
    fn test_user_sections() {
        let report = render();
        assert!(report.contains("## alice"));
        assert!(report.contains("- 🟢 Small: 1 | 🟡 Medium: 0 | 🟠 Large: 0 | 🔴 Very Large: 1"));
        assert!(report.contains("#### 1. ✅ Critical hotfix"));
        assert!(report.contains("**acme/widgets** (1 review):"));
        // bob has no activity but still gets a section.
        assert!(report.contains("## bob"));
    }

    #[test]
    fn test_empty_dataset_has_no_highlights_and_zero_rates() {
        let range = parse_period("2025-01-01..2025-01-31").unwrap();
        let report = render_report_dated(&[], &range, "2025-02-01");
        assert!(!report.contains("## 🏆 Highlights"));
        assert!(report.contains("- **Merge Rate:** 0.0%"));
        assert!(report.contains("3. **Delivery Rate:** 0.0% of created PRs were successfully merged"));
    }

    #[test]
    fn test_notable_sections_cap_at_three() {
        let stats = ChangeStats {
            additions: 10,
            deletions: 0,
            changed_files: 1,
            commits: 1,
        };
        let users = vec![ContributorActivity {
            username: "alice".to_string(),
            created: (1..=5)
                .map(|n| pr(n, &format!("Hotfix {}", n), "", true, stats))
                .collect(),
            reviewed: vec![],
        }];
        let range = parse_period("2025-01-01..2025-01-31").unwrap();
        let report = render_report_dated(&users, &range, "2025-02-01");
        assert!(report.contains("Hotfix 3"));
        assert!(!report.contains("- **Hotfix 4** by @alice"));
    }

    #[test]
    fn test_intro_snippet_truncation() {
        let long = "x".repeat(300);
        assert_eq!(intro_snippet(""), "No description provided");
        assert_eq!(intro_snippet("short and sweet"), "short and sweet");
        let clipped = intro_snippet(&long);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), INTRO_LIMIT + 3);
    }

    #[test]
    fn test_benefit_extraction() {
        let stats = ChangeStats::default();
        let fixer = pr(1, "t", "Fixes a bug in the parser", true, stats);
        assert_eq!(extract_pr_benefits(&fixer), vec!["Bug fix"]);
        let plain = pr(2, "t", "misc", true, stats);
        assert_eq!(extract_pr_benefits(&plain), vec!["Code contribution"]);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_complexity_distribution_indexing() {
        let users = sample_users();
        let dist = complexity_distribution(&users[0]);
        assert_eq!(dist, [1, 0, 0, 1]);
        // Index 3 is VeryLarge.
        assert_eq!(ComplexityLevel::VeryLarge.rank(), 4);
    }
}
