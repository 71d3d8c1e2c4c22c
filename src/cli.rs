//! Command-line interface definitions for Latest News Digest.
//!
//! All arguments can be provided via command-line flags or environment
//! variables. Values are read once at start-up and handed to collaborator
//! constructors; nothing is re-read mid-run.

use clap::{Parser, ValueEnum};

/// Where the summarized record goes.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// A page in a Notion database
    Notion,
    /// A JSON file under `--json-output-dir`
    Json,
}

/// Command-line arguments for the Latest News Digest application.
///
/// # Examples
///
/// ```sh
/// # Default site, store in Notion (token and database id from the environment)
/// latest_news_digest
///
/// # Custom site profile, store locally
/// latest_news_digest --site-config ./site.yaml --store json -j ./json
///
/// # Only check that extraction still works against the live site
/// latest_news_digest --extract-only
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a site profile YAML file (built-in profile otherwise)
    #[arg(short, long, env = "SITE_CONFIG")]
    pub site_config: Option<String>,

    /// Optional path to the awful_aj config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// awful_aj template used for summarization
    #[arg(short, long, default_value = "news_summarizer")]
    pub template: String,

    /// Storage backend for the record
    #[arg(long, value_enum, default_value_t = StoreKind::Notion)]
    pub store: StoreKind,

    /// Output directory for the JSON store
    #[arg(short, long, default_value = "./json")]
    pub json_output_dir: String,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,

    /// Notion database id
    #[arg(long, env = "NOTION_DB_ID")]
    pub notion_db_id: Option<String>,

    /// Notion property holding the run date
    #[arg(long, default_value = "날짜")]
    pub notion_date_property: String,

    /// Notion property holding the article title
    #[arg(long, default_value = "제목")]
    pub notion_title_property: String,

    /// Notion property holding the summary
    #[arg(long, default_value = "요약")]
    pub notion_summary_property: String,

    /// Notion property holding the source link
    #[arg(long, default_value = "URL")]
    pub notion_url_property: String,

    /// Per-request timeout for page fetches, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// User-Agent sent with page fetches
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Article text longer than this is truncated before summarization
    #[arg(long, default_value_t = 12_000)]
    pub max_summary_input_chars: usize,

    /// Retries after a failed summarization call
    #[arg(long, default_value_t = 5)]
    pub summary_retries: usize,

    /// Wait before the first summarization retry, in milliseconds; doubles per retry
    #[arg(long, default_value_t = 1_000)]
    pub summary_backoff_ms: u64,

    /// Print the extracted article as JSON and stop
    #[arg(long)]
    pub extract_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["latest_news_digest"]);
        assert_eq!(cli.store, StoreKind::Notion);
        assert_eq!(cli.template, "news_summarizer");
        assert_eq!(cli.timeout_secs, 20);
        assert_eq!(cli.max_summary_input_chars, 12_000);
        assert!(!cli.extract_only);
        assert_eq!(cli.summary_retries, 5);
        assert_eq!(cli.summary_backoff_ms, 1_000);
        assert_eq!(cli.notion_title_property, "제목");
        assert_eq!(cli.notion_url_property, "URL");
    }

    #[test]
    fn test_cli_json_store() {
        let cli = Cli::parse_from([
            "latest_news_digest",
            "--store",
            "json",
            "-j",
            "/tmp/json",
            "-s",
            "./site.yaml",
        ]);
        assert_eq!(cli.store, StoreKind::Json);
        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert_eq!(cli.site_config.as_deref(), Some("./site.yaml"));
    }

    #[test]
    fn test_cli_extract_only_and_timeout() {
        let cli = Cli::parse_from(["latest_news_digest", "--extract-only", "--timeout-secs", "5"]);
        assert!(cli.extract_only);
        assert_eq!(cli.timeout_secs, 5);
    }

    #[test]
    fn test_cli_summary_retry_policy() {
        let cli = Cli::parse_from([
            "latest_news_digest",
            "--summary-retries",
            "0",
            "--summary-backoff-ms",
            "250",
        ]);
        assert_eq!(cli.summary_retries, 0);
        assert_eq!(cli.summary_backoff_ms, 250);
    }

    #[test]
    fn test_cli_rejects_unknown_store() {
        assert!(Cli::try_parse_from(["latest_news_digest", "--store", "sqlite"]).is_err());
    }
}
