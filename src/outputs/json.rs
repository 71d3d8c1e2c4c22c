//! Local JSON file store.
//!
//! Files are grouped by run date and named after the title slug:
//! `{json_output_dir}/{date}/{slug}.json`. A rerun on the same day for the
//! same article overwrites its file.

use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::StoreError;
use crate::models::ArticleRecord;
use crate::outputs::RecordStore;
use crate::utils::{slugify_title, truncate_chars};

/// Longest slug kept in a file name, in characters.
const MAX_SLUG_CHARS: usize = 80;

#[derive(Debug, Clone)]
pub struct JsonStore {
    json_output_dir: String,
}

impl JsonStore {
    pub fn new(json_output_dir: impl Into<String>) -> Self {
        Self {
            json_output_dir: json_output_dir.into(),
        }
    }

    /// Path the record will be written to.
    pub fn path_for(&self, record: &ArticleRecord) -> String {
        let slug = slugify_title(&record.title);
        let slug = match truncate_chars(&slug, MAX_SLUG_CHARS) {
            "" => "untitled",
            s => s,
        };
        format!(
            "{}/{}/{}.json",
            self.json_output_dir.trim_end_matches('/'),
            record.date,
            slug
        )
    }
}

impl RecordStore for JsonStore {
    #[instrument(level = "info", skip_all, fields(json_output_dir = %self.json_output_dir))]
    async fn save(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;

        let full_json_dir = format!("{}/{}", self.json_output_dir.trim_end_matches('/'), record.date);
        info!(%full_json_dir, "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(&full_json_dir).await {
            error!(%full_json_dir, error = %e, "Failed to create JSON dir");
            return Err(StoreError::Io {
                path: full_json_dir,
                source: e,
            });
        }

        let path = self.path_for(record);
        fs::write(&path, json).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        info!(%path, "Wrote article record");
        Ok(())
    }
}
