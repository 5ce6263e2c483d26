use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::csv_format;

/// Lifecycle state of a review. Stored with the labels the existing data uses;
/// the English variant names are accepted on input as well.
///
/// Labels outside the known three are kept verbatim as `Other` so one odd cell
/// does not make the whole table unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    Planned,
    InProgress,
    Completed,
    Other(String),
}

impl ReviewStatus {
    pub fn label(&self) -> &str {
        match self {
            ReviewStatus::Planned => "Geplant",
            ReviewStatus::InProgress => "In Bearbeitung",
            ReviewStatus::Completed => "Abgeschlossen",
            ReviewStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ReviewStatus::Other(_))
    }
}

impl From<String> for ReviewStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Geplant" | "Planned" => ReviewStatus::Planned,
            "In Bearbeitung" | "InProgress" | "in_progress" => ReviewStatus::InProgress,
            "Abgeschlossen" | "Completed" => ReviewStatus::Completed,
            _ => ReviewStatus::Other(raw),
        }
    }
}

impl From<ReviewStatus> for String {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

/// One row of `gespraeche.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Gespraechs_ID", with = "csv_format::int")]
    pub id: u32,
    /// Subject of the review.
    #[serde(rename = "MA_PersonalNr", with = "csv_format::int")]
    pub employee_id: u32,
    /// Reviewer; the only manager allowed to see the record.
    #[serde(rename = "FK_PersonalNr", with = "csv_format::int")]
    pub manager_id: u32,
    #[serde(rename = "Datum", default, with = "csv_format::opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Status")]
    pub status: ReviewStatus,
    #[serde(rename = "Ziele_2025", default, with = "csv_format::opt_text")]
    pub goals: Option<String>,
    #[serde(rename = "Entwicklung", default, with = "csv_format::opt_text")]
    pub development: Option<String>,
    #[serde(rename = "Feedback", default, with = "csv_format::opt_text")]
    pub feedback: Option<String>,
    #[serde(rename = "PDF_Pfad", default, with = "csv_format::opt_text")]
    pub pdf_path: Option<String>,
    #[serde(rename = "Erstellt_am", with = "csv_format::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "Geaendert_am", with = "csv_format::timestamp")]
    pub last_modified: NaiveDateTime,
}

/// Finds a record by id.
pub fn find_mut(records: &mut [ReviewRecord], id: u32) -> Option<&mut ReviewRecord> {
    records.iter_mut().find(|r| r.id == id)
}
