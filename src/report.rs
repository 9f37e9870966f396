use crate::document::SourceDocument;
use crate::normalize::ResultRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub documents: Vec<DocumentReport>,
    pub records: Vec<RecordReport>,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub index: u32,
    pub filename: String,
    pub mime_type: String,
    pub file_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    pub index: u32,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobReport {
    pub fn build(documents: &[SourceDocument], records: &[ResultRecord]) -> Self {
        let documents = documents
            .iter()
            .enumerate()
            .map(|(i, d)| DocumentReport {
                index: i as u32,
                filename: d.filename().to_string(),
                mime_type: d.mime_type().to_string(),
                file_bytes: d.byte_len().unwrap_or(0),
            })
            .collect();

        let record_reports: Vec<RecordReport> = records
            .iter()
            .enumerate()
            .map(|(i, r)| RecordReport {
                index: i as u32,
                ok: r.is_success(),
                error: r.error().map(|e| e.to_string()),
            })
            .collect();

        let succeeded = record_reports.iter().filter(|r| r.ok).count();
        let failed = record_reports.len() - succeeded;

        Self {
            documents,
            records: record_reports,
            succeeded,
            failed,
        }
    }
}
