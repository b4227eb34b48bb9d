//! Result export
//!
//! Renders the current result as a downloadable artifact:
//!
//! | Format | File name                        | Content                               |
//! |--------|----------------------------------|---------------------------------------|
//! | json   | `pii-detection-YYYY-MM-DD.json`  | `{result, stats, exportedAt}`, pretty |
//! | csv    | `pii-detections-YYYY-MM-DD.csv`  | one row per detection                 |
//! | txt    | `pii-anonymized-YYYY-MM-DD.txt`  | anonymized text                       |

use crate::anonymization::models::DetectionResult;
use crate::core::processing::ProcessingStats;
use crate::domain::ExportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Result, stats and export time as JSON
    Json,
    /// Detections as CSV
    Csv,
    /// Anonymized text
    #[default]
    Txt,
}

impl ExportFormat {
    /// MIME type of the artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Txt => "text/plain",
        }
    }

    /// File name for an export made at `at`
    pub fn filename(&self, at: DateTime<Utc>) -> String {
        let date = at.format("%Y-%m-%d");
        match self {
            Self::Json => format!("pii-detection-{date}.json"),
            Self::Csv => format!("pii-detections-{date}.csv"),
            Self::Txt => format!("pii-anonymized-{date}.txt"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Txt => write!(f, "txt"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A rendered export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name
    pub filename: String,
    /// MIME type of `content`
    pub mime_type: &'static str,
    /// Rendered content
    pub content: String,
}

impl ExportArtifact {
    /// Write the content to `path`
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.content)
            .map_err(|e| ExportError::Write(format!("{}: {e}", path.display())))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    result: &'a DetectionResult,
    stats: &'a ProcessingStats,
    exported_at: DateTime<Utc>,
}

/// Render `result` in `format`
///
/// # Errors
///
/// Returns [`ExportError::Serialization`] if JSON rendering fails
pub fn render_export(
    result: &DetectionResult,
    stats: &ProcessingStats,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<ExportArtifact, ExportError> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&JsonExport {
            result,
            stats,
            exported_at,
        })
        .map_err(|e| ExportError::Serialization(e.to_string()))?,
        ExportFormat::Csv => render_csv(result),
        ExportFormat::Txt => result.anonymized_text.clone(),
    };

    Ok(ExportArtifact {
        filename: format.filename(exported_at),
        mime_type: format.mime_type(),
        content,
    })
}

fn render_csv(result: &DetectionResult) -> String {
    let mut lines = vec!["Type,Text,Confidence,Start,End".to_string()];
    for d in &result.detections {
        lines.push(format!(
            "{},\"{}\",{:.1},{},{}",
            d.pii_type,
            d.text.replace('"', "\"\""),
            d.confidence as f64 * 100.0,
            d.start,
            d.end
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{Detection, DetectionBackend, DetectionMethod, PiiType};
    use chrono::TimeZone;

    fn sample() -> DetectionResult {
        let text = "Ask \"Ann\" at a@x.io";
        DetectionResult::new(
            text.to_string(),
            "Ask \"Ann\" at [EMAIL]".to_string(),
            vec![
                Detection::new(PiiType::Name, "\"Ann\"", 4, 9, DetectionMethod::Ner)
                    .with_confidence(0.9876),
                Detection::new(PiiType::Email, "a@x.io", 13, 19, DetectionMethod::Ner)
                    .with_confidence(0.95),
            ],
            DetectionBackend::Ner,
            3.5,
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "pdf"
        ));
    }

    #[test]
    fn test_filenames() {
        assert_eq!(ExportFormat::Json.filename(at()), "pii-detection-2024-03-09.json");
        assert_eq!(ExportFormat::Csv.filename(at()), "pii-detections-2024-03-09.csv");
        assert_eq!(ExportFormat::Txt.filename(at()), "pii-anonymized-2024-03-09.txt");
    }

    #[test]
    fn test_csv_export() {
        let artifact =
            render_export(&sample(), &ProcessingStats::default(), ExportFormat::Csv, at()).unwrap();
        let lines: Vec<&str> = artifact.content.lines().collect();

        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(lines[0], "Type,Text,Confidence,Start,End");
        assert_eq!(lines[1], "name,\"\"\"Ann\"\"\",98.8,4,9");
        assert_eq!(lines[2], "email,\"a@x.io\",95.0,13,19");
    }

    #[test]
    fn test_json_export() {
        let artifact =
            render_export(&sample(), &ProcessingStats::default(), ExportFormat::Json, at()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&artifact.content).unwrap();

        assert_eq!(artifact.mime_type, "application/json");
        assert_eq!(value["result"]["anonymizedText"], "Ask \"Ann\" at [EMAIL]");
        assert_eq!(value["result"]["detections"][1]["type"], "email");
        assert_eq!(value["stats"]["totalDocuments"], 0);
        assert!(value["exportedAt"].as_str().unwrap().starts_with("2024-03-09T15:30:00"));
        assert!(artifact.content.contains("\n  "));
    }

    #[test]
    fn test_txt_export() {
        let artifact =
            render_export(&sample(), &ProcessingStats::default(), ExportFormat::Txt, at()).unwrap();
        assert_eq!(artifact.content, "Ask \"Ann\" at [EMAIL]");
        assert_eq!(artifact.mime_type, "text/plain");
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let artifact =
            render_export(&sample(), &ProcessingStats::default(), ExportFormat::Txt, at()).unwrap();

        artifact.write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.content);
    }
}
