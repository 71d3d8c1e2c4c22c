//! # Latest News Digest
//!
//! Pulls the single latest article off a news listing page whose markup is
//! unstable, summarizes it with an LLM, and stores one record.
//!
//! ## Usage
//!
//! ```sh
//! latest_news_digest --store json -j ./json
//! ```
//!
//! ## Architecture
//!
//! The application follows a linear pipeline:
//! 1. **Extraction**: locate the "latest articles" region by heading text,
//!    pick the first article link, fetch it and extract the body
//! 2. **Summarization**: send the body to an OpenAI-compatible LLM
//! 3. **Storage**: write `{title, summary, link, date}` to Notion or JSON
//!
//! Every step runs once and in order; a failure aborts the run with the
//! stage and URL that failed.

use awful_aj::{config as aj_config, config_dir, template};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod extract;
mod models;
mod outputs;
mod utils;

use api::{RetryPolicy, summarize_with_backoff};
use cli::{Cli, StoreKind};
use config::SiteProfile;
use error::StoreError;
use extract::{ExtractionPipeline, PageFetcher};
use extract::fetch::DEFAULT_USER_AGENT;
use models::ArticleRecord;
use outputs::RecordStore;
use outputs::json::JsonStore;
use outputs::notion::{NotionSchema, NotionStore};
use utils::{ensure_writable_dir, today_stamp};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("latest_news_digest starting up");
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    let args = Cli::parse();
    debug!(?args.site_config, ?args.store, args.extract_only, "Parsed CLI arguments");

    // ---- Site profile & fetcher ----
    let rules = SiteProfile::load(args.site_config.as_deref())?.compile()?;
    let user_agent = args.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    let fetcher = PageFetcher::new(Duration::from_secs(args.timeout_secs), user_agent)?;

    // ---- Storage, resolved before any network work so bad config fails fast ----
    let store = if args.extract_only {
        None
    } else {
        Some(build_store(&args, &fetcher).await?)
    };

    // ---- Extraction ----
    let pipeline = ExtractionPipeline::new(fetcher, rules);
    info!(
        listing_url = %pipeline.rules().listing_url,
        anchor = %pipeline.rules().anchor_text,
        "Extracting latest article"
    );
    let article = match pipeline.run().await {
        Ok(article) => article,
        Err(e) => {
            error!(stage = %e.stage(), url = %e.url(), error = %e, "Extraction failed");
            return Err(e.into());
        }
    };
    info!(title = %article.title, link = %article.link, chars = article.content.chars().count(), "Extracted latest article");

    let Some(store) = store else {
        println!("{}", serde_json::to_string_pretty(&article)?);
        return Ok(());
    };

    // ---- Summarization ----
    let template = template::load_template(&args.template).await?;
    info!(template = %args.template, "Loaded template");
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config_dir()?.join("config.yaml").to_string_lossy().into_owned(),
    };
    let config = aj_config::load_config(&config_path)?;
    info!(%config_path, "Loaded configuration");

    let policy = RetryPolicy::new(
        args.summary_retries,
        Duration::from_millis(args.summary_backoff_ms),
    );
    let summary = summarize_with_backoff(
        &config,
        &template,
        &article.content,
        args.max_summary_input_chars,
        policy,
    )
    .await?;

    // ---- Storage ----
    let record = ArticleRecord::new(&article, summary, today_stamp());
    store.save(&record).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// The configured storage collaborator.
enum Store {
    Notion(NotionStore),
    Json(JsonStore),
}

impl RecordStore for Store {
    async fn save(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        match self {
            Store::Notion(store) => store.save(record).await,
            Store::Json(store) => store.save(record).await,
        }
    }
}

async fn build_store(args: &Cli, fetcher: &PageFetcher) -> Result<Store, Box<dyn Error>> {
    match args.store {
        StoreKind::Notion => {
            let token = args
                .notion_token
                .clone()
                .ok_or("NOTION_TOKEN (or --notion-token) is required for the notion store")?;
            let database_id = args
                .notion_db_id
                .clone()
                .ok_or("NOTION_DB_ID (or --notion-db-id) is required for the notion store")?;
            info!(%database_id, "Using Notion store");
            let schema = NotionSchema {
                date: args.notion_date_property.clone(),
                title: args.notion_title_property.clone(),
                summary: args.notion_summary_property.clone(),
                url: args.notion_url_property.clone(),
            };
            Ok(Store::Notion(
                NotionStore::new(fetcher.client().clone(), token, database_id).with_schema(schema),
            ))
        }
        StoreKind::Json => {
            if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
                error!(
                    path = %args.json_output_dir,
                    error = %e,
                    "JSON output directory is not writable (fix perms or choose a different path)"
                );
                return Err(e);
            }
            Ok(Store::Json(JsonStore::new(args.json_output_dir.clone())))
        }
    }
}
