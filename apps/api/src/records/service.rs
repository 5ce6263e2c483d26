//! Record listing, lookup, update and statistics, filtered through access control.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{can_access, Denied, Identity};
use crate::errors::AppError;
use crate::models::csv_format::{parse_date, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::models::employee::find;
use crate::models::record::find_mut;
use crate::models::{Employee, ReviewRecord, ReviewStatus, Role};
use crate::storage::TableStore;

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

/// A record joined with directory data, as returned by the API.
///
/// Absent values are empty strings; the manager fields are only filled in for
/// single-record lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub id: u32,
    pub employee_id: u32,
    pub manager_id: u32,
    pub date: String,
    pub status: ReviewStatus,
    pub goals: String,
    pub development: String,
    pub feedback: String,
    pub pdf_path: String,
    pub created_at: String,
    pub last_modified: String,
    pub employee_last_name: String,
    pub employee_first_name: String,
    pub employee_name: String,
    pub employee_department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_department: Option<String>,
}

impl RecordView {
    fn join(record: &ReviewRecord, directory: &[Employee], with_manager: bool) -> Self {
        let subject = find(directory, record.employee_id);
        let manager = with_manager.then(|| find(directory, record.manager_id));

        RecordView {
            id: record.id,
            employee_id: record.employee_id,
            manager_id: record.manager_id,
            date: record
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            status: record.status.clone(),
            goals: record.goals.clone().unwrap_or_default(),
            development: record.development.clone().unwrap_or_default(),
            feedback: record.feedback.clone().unwrap_or_default(),
            pdf_path: record.pdf_path.clone().unwrap_or_default(),
            created_at: record.created_at.format(TIMESTAMP_FORMAT).to_string(),
            last_modified: record.last_modified.format(TIMESTAMP_FORMAT).to_string(),
            employee_last_name: subject.map(|e| e.last_name.clone()).unwrap_or_default(),
            employee_first_name: subject.map(|e| e.first_name.clone()).unwrap_or_default(),
            employee_name: subject.map(Employee::display_name).unwrap_or_default(),
            employee_department: subject.map(|e| e.department.clone()).unwrap_or_default(),
            manager_name: manager.map(|m| m.map(Employee::display_name).unwrap_or_default()),
            manager_department: manager
                .map(|m| m.map(|e| e.department.clone()).unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub total: usize,
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Partial update of a record.
///
/// Only these five fields can ever change through the API. Any other key in the
/// payload is ignored, and keys may use either the API names or the table's
/// column names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub development: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Table column name for each patchable field.
const COLUMN_KEYS: [(&str, &str); 5] = [
    ("date", "Datum"),
    ("status", "Status"),
    ("goals", "Ziele_2025"),
    ("development", "Entwicklung"),
    ("feedback", "Feedback"),
];

impl RecordPatch {
    /// Parses a patch body. When a field is sent under both names, the API name wins.
    pub fn from_json(value: serde_json::Value) -> Result<Self, AppError> {
        let serde_json::Value::Object(mut fields) = value else {
            return Err(AppError::Validation("Expected a JSON object".to_string()));
        };
        for (api_key, column) in COLUMN_KEYS {
            if let Some(v) = fields.remove(column) {
                fields.entry(api_key).or_insert(v);
            }
        }

        let patch: RecordPatch = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(status) = patch.status.as_ref().filter(|s| !s.is_known()) {
            return Err(AppError::Validation(format!(
                "Unknown status '{}'",
                status.label()
            )));
        }
        Ok(patch)
    }

    /// Applies the patch and stamps `last_modified`, which never moves backwards.
    pub fn apply(&self, record: &mut ReviewRecord, now: NaiveDateTime) -> Result<(), AppError> {
        // Validate everything before touching the record.
        let date = match self.date.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(parse_date(raw).ok_or_else(|| {
                AppError::Validation(format!("Invalid date '{raw}'"))
            })?)),
        };

        if let Some(date) = date {
            record.date = date;
        }
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if let Some(goals) = &self.goals {
            record.goals = non_empty(goals);
        }
        if let Some(development) = &self.development {
            record.development = non_empty(development);
        }
        if let Some(feedback) = &self.feedback {
            record.feedback = non_empty(feedback);
        }
        record.last_modified = now.max(record.last_modified);
        Ok(())
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// Records the identity may list: all for HR, own reviews for managers.
pub fn visible_records<'a>(
    identity: &Identity,
    records: &'a [ReviewRecord],
) -> Result<Vec<&'a ReviewRecord>, Denied> {
    match identity.role {
        Role::Hr | Role::Manager => Ok(records
            .iter()
            .filter(|r| can_access(identity, r))
            .collect()),
        Role::Unknown => Err(Denied::Forbidden),
    }
}

pub fn compute_stats(records: &[ReviewRecord]) -> RecordStats {
    let count = |status: ReviewStatus| records.iter().filter(|r| r.status == status).count();
    RecordStats {
        total: records.len(),
        planned: count(ReviewStatus::Planned),
        in_progress: count(ReviewStatus::InProgress),
        completed: count(ReviewStatus::Completed),
    }
}

fn not_found(id: u32) -> AppError {
    AppError::NotFound(format!("Record {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Service operations (blocking; call through `run_blocking`)
// ────────────────────────────────────────────────────────────────────────────

pub fn list_records(store: &TableStore, identity: &Identity) -> Result<Vec<RecordView>, AppError> {
    let records = store.load_records()?;
    let visible = visible_records(identity, &records)?;
    let directory = store.load_employees()?;
    Ok(visible
        .into_iter()
        .map(|r| RecordView::join(r, &directory, false))
        .collect())
}

pub fn get_record(
    store: &TableStore,
    identity: &Identity,
    id: u32,
) -> Result<RecordView, AppError> {
    let records = store.load_records()?;
    let record = records.iter().find(|r| r.id == id).ok_or_else(|| not_found(id))?;
    if !can_access(identity, record) {
        return Err(AppError::Forbidden);
    }
    let directory = store.load_employees()?;
    Ok(RecordView::join(record, &directory, true))
}

pub fn update_record(
    store: &TableStore,
    identity: &Identity,
    id: u32,
    patch: &RecordPatch,
    now: NaiveDateTime,
) -> Result<ReviewRecord, AppError> {
    let updated = store.modify_records(|records| {
        let record = find_mut(records, id).ok_or_else(|| not_found(id))?;
        if !can_access(identity, record) {
            return Err(AppError::Forbidden);
        }
        patch.apply(record, now)?;
        Ok(record.clone())
    })?;
    info!("Record {id} updated by {}", identity.name);
    Ok(updated)
}

pub fn record_stats(store: &TableStore, identity: &Identity) -> Result<RecordStats, AppError> {
    if !identity.is_hr() {
        return Err(AppError::Forbidden);
    }
    Ok(compute_stats(&store.load_records()?))
}
