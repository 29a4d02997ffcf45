//! Append-only JSONL audit log, date-rotated exactly like
//! `bibank_events::EventStore` - one file per UTC day, flushed on every
//! write. Purely observational: nothing here feeds back into scoring.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::record::AuditRecord;

pub struct AuditLog {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
}

impl AuditLog {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path, current_file: None, current_date: None })
    }

    pub fn append(&mut self, record: &AuditRecord) -> Result<(), AuditError> {
        let date = record.recorded_at.format("%Y-%m-%d").to_string();
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }
        if let Some(writer) = &mut self.current_file {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{json}")?;
            writer.flush()?;
        }
        Ok(())
    }

    fn rotate_file(&mut self, date: &str) -> Result<(), AuditError> {
        if let Some(writer) = &mut self.current_file {
            writer.flush()?;
        }
        let file_path = self.base_path.join(format!("{date}.jsonl"));
        let file = OpenOptions::new().create(true).append(true).open(&file_path)?;
        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());
        Ok(())
    }

    pub fn list_files(&self) -> Result<Vec<PathBuf>, AuditError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn close(&mut self) -> Result<(), AuditError> {
        if let Some(writer) = &mut self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for AuditLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskguard_orchestrator::FraudCheckResult;

    fn sample_result() -> FraudCheckResult {
        serde_json::from_value(serde_json::json!({
            "transaction_id": "TX-1",
            "risk_points": 10,
            "risk_band": "normal",
            "policy": {"risk_points": 10, "triggered_rules": []},
            "graph": {
                "user_id": "U-1",
                "proximity_score": 0.0,
                "shortest_path_length_to_fraudster": null,
                "closest_fraudster": null,
                "linked_fraud_count": 0,
                "total_linked_nodes": 0,
                "triggered_rules": []
            },
            "nn": {"fraud_score": 0.0},
            "text": {"fraud_score": 0.0}
        }))
        .unwrap()
    }

    #[test]
    fn test_append_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = AuditLog::new(dir.path()).unwrap();
        let record = AuditRecord::new(Utc::now(), sample_result());
        log.append(&record).unwrap();
        log.close().unwrap();

        let files = log.list_files().unwrap();
        assert_eq!(files.len(), 1);
        let contents = std::fs::read_to_string(&files[0]).unwrap();
        assert!(contents.contains("\"transaction_id\":\"TX-1\""));
    }
}
