//! Sequential reader over the audit log's JSONL files, for replay/export.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::AuditError;
use crate::record::AuditRecord;

pub struct AuditReader {
    files: Vec<std::path::PathBuf>,
}

impl AuditReader {
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let mut files = Vec::new();
        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let file_path = entry.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }
        files.sort();
        Ok(Self { files })
    }

    pub fn read_all(&self) -> Result<Vec<AuditRecord>, AuditError> {
        let mut records = Vec::new();
        for file_path in &self.files {
            let file = File::open(file_path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                records.push(serde_json::from_str(&line)?);
            }
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<usize, AuditError> {
        let mut count = 0;
        for file_path in &self.files {
            let file = File::open(file_path)?;
            for line in BufReader::new(file).lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
