use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use pr_pulse::github::types::ContributorActivity;
use pr_pulse::github::{fetch_created_prs, fetch_reviewed_prs, quota, GithubClient};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "pr-pulse")]
#[command(about = "Generate a markdown report of GitHub PR activity for a set of contributors", long_about = None)]
#[command(version)]
struct Cli {
    /// Comma-separated list of GitHub usernames
    #[arg(short, long)]
    users: Option<String>,

    /// Path to a file of GitHub usernames, one per line
    #[arg(short, long, default_value = "./github_users")]
    file: PathBuf,

    /// Time period: 7d, 3w, 1m, or YYYY-MM-DD..YYYY-MM-DD
    #[arg(short, long, default_value = "7d")]
    period: String,

    /// Restrict results to one GitHub organization
    #[arg(short, long)]
    org: Option<String>,

    /// Output file path
    #[arg(long, default_value = "report.md")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let token = match std::env::var("GITHUB_TOKEN") {
        Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            eprintln!("Error: GITHUB_TOKEN environment variable is not set.");
            eprintln!("Export a GitHub personal access token before running:");
            eprintln!("  export GITHUB_TOKEN=your_token_here");
            std::process::exit(EXIT_AUTH);
        }
    };

    let range = match pr_pulse::period::parse_period(&cli.period) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let usernames = match &cli.users {
        Some(arg) => pr_pulse::users::parse_users_arg(arg),
        None => match pr_pulse::users::read_users_file(&cli.file) {
            Ok(u) => u,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    };
    if usernames.is_empty() {
        eprintln!("No usernames given. Use --users or provide a users file.");
        std::process::exit(EXIT_CONFIG);
    }

    let client = match GithubClient::new(&token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    println!("Generating report for {} user(s)...", usernames.len());
    println!("Period: {} to {}", range.start_date(), range.end_date());

    quota::log_quota(&client, "Initial ").await;

    // One user at a time, one page at a time: requests are sequential by
    // design so the quota pre-checks never race in-flight requests.
    let mut activity = Vec::with_capacity(usernames.len());
    for username in &usernames {
        println!("Fetching data for {}...", username);

        let created = match fetch_created_prs(&client, username, &range, cli.org.as_deref()).await
        {
            Ok(prs) => prs,
            Err(e) => {
                eprintln!("Fatal: {}", e);
                std::process::exit(EXIT_RATE_LIMIT);
            }
        };
        println!("  - Created PRs: {}", created.len());

        let reviewed =
            match fetch_reviewed_prs(&client, username, &range, cli.org.as_deref()).await {
                Ok(prs) => prs,
                Err(e) => {
                    eprintln!("Fatal: {}", e);
                    std::process::exit(EXIT_RATE_LIMIT);
                }
            };
        println!("  - Reviewed PRs: {}", reviewed.len());

        activity.push(ContributorActivity {
            username: username.clone(),
            created,
            reviewed,
        });
    }

    quota::log_quota(&client, "Final ").await;

    let report = pr_pulse::report::render_report(&activity, &range);
    if let Err(e) = pr_pulse::report::write_report(&cli.output, &report) {
        eprintln!("Failed to write report: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    println!("Report generated successfully: {}", cli.output.display());
    std::process::exit(EXIT_SUCCESS);
}
