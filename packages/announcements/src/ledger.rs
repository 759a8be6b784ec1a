//! Durable ledger of processed documents.
//!
//! A single pretty-printed JSON file holding the ordered record sequence.
//! Load never fails: an absent or unparsable file is treated as empty
//! history, trading strict loss detection for pipeline availability. The
//! whole sequence is rewritten at the end of a run via temp-file + rename
//! so a crash mid-write leaves the previous ledger intact.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::LedgerError;
use crate::types::ResultRecord;

/// In-memory view of the persisted ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    records: Vec<ResultRecord>,
}

impl Ledger {
    /// Load the ledger from disk. Absent or corrupt files yield an empty
    /// ledger; corruption is logged since it silently discards dedup
    /// history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<ResultRecord>>(&contents) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Ledger file is unparsable, starting with empty history"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ledger file is unreadable, starting with empty history"
                );
                Vec::new()
            }
        };

        info!(
            path = %path.display(),
            records = records.len(),
            "Loaded ledger"
        );

        Self { path, records }
    }

    /// An empty ledger that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Set of `pdf_url` identities present in the ledger. Single pass.
    pub fn identity_set(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.pdf_url.as_str()).collect()
    }

    /// Append new records in order.
    pub fn append(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.records.extend(records);
    }

    /// Rewrite the ledger file with the full record sequence.
    ///
    /// Writes to a sibling temp file first and renames it over the target,
    /// so the prior ledger survives a crash mid-write.
    pub fn persist(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(&self.records)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes()).map_err(|source| LedgerError::Write {
            path: tmp_path.display().to_string(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| LedgerError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        info!(
            path = %self.path.display(),
            records = self.records.len(),
            "Persisted ledger"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pdf_url: &str) -> ResultRecord {
        ResultRecord {
            company: "ABC".to_string(),
            company_url: "https://example.com/company/ABC/".to_string(),
            pdf_url: pdf_url.to_string(),
            summary: "fine".to_string(),
            text_length: 4,
            model_used: "gpt-3.5-turbo".to_string(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::load(dir.path().join("absent.json"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{not json").unwrap();

        let ledger = Ledger::load(&path);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut ledger = Ledger::empty(&path);
        ledger.append([record("https://x/a.pdf"), record("https://x/b.pdf")]);
        ledger.persist().unwrap();

        let reloaded = Ledger::load(&path);
        assert_eq!(reloaded.records(), ledger.records());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_identity_set_contains_all_pdf_urls() {
        let mut ledger = Ledger::empty("unused.json");
        ledger.append([record("https://x/a.pdf"), record("https://x/b.pdf")]);

        let set = ledger.identity_set();
        assert!(set.contains("https://x/a.pdf"));
        assert!(set.contains("https://x/b.pdf"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_persist_is_byte_stable_for_unchanged_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut ledger = Ledger::empty(&path);
        ledger.append([record("https://x/a.pdf")]);
        ledger.persist().unwrap();
        let first = fs::read(&path).unwrap();

        Ledger::load(&path).persist().unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
