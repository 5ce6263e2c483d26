use chrono::NaiveDate;
use tracing::info;

use crate::models::csv_format::parse_timestamp;
use crate::models::{AccessToken, Employee, ReviewRecord, ReviewStatus};
use crate::storage::{StorageError, TableStore};

/// Which tables `seed_tables` actually created.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub employees: Option<usize>,
    pub records: Option<usize>,
    pub tokens_created: bool,
}

fn employee(nr: u32, last: &str, first: &str, email: &str, dept: &str, manager: u32) -> Employee {
    Employee {
        personnel_nr: nr,
        last_name: last.to_string(),
        first_name: first.to_string(),
        email: Some(email.to_string()),
        department: dept.to_string(),
        manager_nr: Some(manager),
    }
}

pub fn sample_employees() -> Vec<Employee> {
    vec![
        employee(12345, "Müller", "Anna", "anna.mueller@zh.ch", "IT", 67890),
        employee(67890, "Schmidt", "Peter", "peter.schmidt@zh.ch", "HR", 99999),
        employee(11111, "Weber", "Sarah", "sarah.weber@zh.ch", "IT", 67890),
        employee(22222, "Fischer", "Thomas", "thomas.fischer@zh.ch", "Finanzen", 99999),
        employee(33333, "Meyer", "Lisa", "lisa.meyer@zh.ch", "HR", 99999),
    ]
}

pub fn sample_records() -> Vec<ReviewRecord> {
    #[rustfmt::skip]
    let rows: [(u32, u32, u32, (i32, u32, u32), ReviewStatus, &str, &str, &str, &str, &str); 4] = [
        (1, 12345, 67890, (2025, 2, 15), ReviewStatus::Planned, "", "", "",
            "2025-01-15 10:00:00", "2025-01-15 10:00:00"),
        (2, 11111, 67890, (2025, 3, 1), ReviewStatus::InProgress,
            "Projekt X leiten\nTeam aufbauen", "Führungskompetenzen stärken",
            "Sehr gute Teamarbeit im letzten Jahr",
            "2025-01-20 14:30:00", "2025-01-25 16:45:00"),
        (3, 22222, 99999, (2025, 2, 20), ReviewStatus::Planned, "", "", "",
            "2025-01-18 09:15:00", "2025-01-18 09:15:00"),
        (4, 33333, 99999, (2025, 3, 10), ReviewStatus::Planned, "", "", "",
            "2025-01-22 11:00:00", "2025-01-22 11:00:00"),
    ];

    let text = |s: &str| (!s.is_empty()).then(|| s.to_string());
    rows.into_iter()
        .filter_map(
            |(id, employee_id, manager_id, (y, m, d), status, goals, dev, feedback, created, modified)| {
                Some(ReviewRecord {
                    id,
                    employee_id,
                    manager_id,
                    date: NaiveDate::from_ymd_opt(y, m, d),
                    status,
                    goals: text(goals),
                    development: text(dev),
                    feedback: text(feedback),
                    pdf_path: None,
                    created_at: parse_timestamp(created)?,
                    last_modified: parse_timestamp(modified)?,
                })
            },
        )
        .collect()
}

/// Creates each table with sample content, leaving existing tables alone.
pub fn seed_tables(store: &TableStore) -> Result<SeedReport, StorageError> {
    let mut report = SeedReport::default();

    if store.employees_exist() {
        info!("Employee table already exists");
    } else {
        let employees = sample_employees();
        store.save_employees(&employees)?;
        info!("Created employee table with {} entries", employees.len());
        report.employees = Some(employees.len());
    }

    if store.records_exist() {
        info!("Record table already exists");
    } else {
        let records = sample_records();
        store.save_records(&records)?;
        info!("Created record table with {} entries", records.len());
        report.records = Some(records.len());
    }

    if store.tokens_exist() {
        info!("Token table already exists");
    } else {
        store.save_tokens(&Vec::<AccessToken>::new())?;
        info!("Created empty token table; run `issue-tokens` next");
        report.tokens_created = true;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_seed_creates_all_tables_once() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::rooted_at(tmp.path());
        let store = TableStore::new(&config);

        let first = seed_tables(&store).unwrap();
        assert_eq!(first.employees, Some(5));
        assert_eq!(first.records, Some(4));
        assert!(first.tokens_created);

        let mut records = store.load_records().unwrap();
        records[0].goals = Some("edited".to_string());
        store.save_records(&records).unwrap();

        let second = seed_tables(&store).unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(
            store.load_records().unwrap()[0].goals.as_deref(),
            Some("edited")
        );
        assert!(store.load_tokens().unwrap().is_empty());
    }

    #[test]
    fn test_sample_records_reference_directory_subjects() {
        let employees = sample_employees();
        for record in sample_records() {
            assert!(employees.iter().any(|e| e.personnel_nr == record.employee_id));
        }
        assert_eq!(sample_records().len(), 4);
    }
}
