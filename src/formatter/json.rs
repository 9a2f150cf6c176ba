use anyhow::{Context, Result};

use crate::models::{CompletionRecord, JobRequest};

/// Кодирование записей канала заданий: одна запись на строку
pub struct JsonFormatter;

impl JsonFormatter {
    /// Разбирает строку задания
    pub fn parse_job(line: &str) -> Result<JobRequest, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    /// Сериализует итоговую запись без перевода строки
    pub fn to_json_string(record: &CompletionRecord) -> Result<String> {
        serde_json::to_string(record).context("Failed to serialize completion record")
    }

    /// Итоговая запись для строки, которая не является заданием
    pub fn malformed(error: &serde_json::Error) -> CompletionRecord {
        CompletionRecord::failure(format!("Malformed job record: {}", error))
    }
}
