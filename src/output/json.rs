//! JSON catalog export
//!
//! Writes the ordered record sequence and the genre taxonomy as one
//! pretty-printed UTF-8 document.

use crate::catalog::CatalogRecord;
use crate::crawler::CrawlOutcome;
use crate::output::traits::{OutputError, OutputHandler, OutputResult, RunMetadata};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// On-disk shape of the catalog artifact
#[derive(Debug, Serialize)]
pub struct CatalogDocument<'a> {
    pub generated_at: String,
    pub source: &'a str,
    pub config_hash: Option<&'a str>,
    pub stop_reason: &'static str,
    pub records: &'a [CatalogRecord],
    pub genres: &'a [String],
}

impl<'a> CatalogDocument<'a> {
    pub fn new(outcome: &'a CrawlOutcome, metadata: &'a RunMetadata) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: &metadata.source,
            config_hash: metadata.config_hash.as_deref(),
            stop_reason: outcome.stop_reason.as_str(),
            records: &outcome.records,
            genres: &outcome.genres,
        }
    }
}

/// Writes the catalog document to a file
///
/// # Arguments
///
/// * `path` - Destination file, created or truncated
/// * `outcome` - The finished crawl
/// * `metadata` - Source and config identity of the run
pub fn write_catalog_json(
    path: &Path,
    outcome: &CrawlOutcome,
    metadata: &RunMetadata,
) -> OutputResult<()> {
    let document = CatalogDocument::new(outcome, metadata);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    writer
        .flush()
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))?;

    tracing::info!(
        "Wrote {} records and {} genres to {}",
        outcome.records.len(),
        outcome.genres.len(),
        path.display()
    );
    Ok(())
}

/// Output handler writing the catalog as JSON
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_outcome(&self, outcome: &CrawlOutcome, metadata: &RunMetadata) -> OutputResult<()> {
        write_catalog_json(&self.path, outcome, metadata)
    }
}
