//! Storage collaborator: persist one [`ArticleRecord`] per run.
//!
//! # Submodules
//!
//! - [`notion`]: creates a page in a hosted Notion database
//! - [`json`]: writes the record to a local JSON file
//!
//! # Output Structure (JSON store)
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── 4050-플랫폼-성장세.json
//! ```

pub mod json;
pub mod notion;

use crate::error::StoreError;
use crate::models::ArticleRecord;

/// Writes one record; success or a typed failure.
pub trait RecordStore {
    async fn save(&self, record: &ArticleRecord) -> Result<(), StoreError>;
}
