//! PDF generation for a single record: access check, directory join, layout,
//! write to the export directory, and persisting the path back onto the record.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::auth::{can_access, Identity};
use crate::errors::AppError;
use crate::layout::{layout_review, PageConfig, ReviewDocument};
use crate::models::employee::find;
use crate::models::record::find_mut;
use crate::render::pdf::write_pdf;
use crate::storage::{StorageError, TableStore};

/// `MAG_<subject>_<YYYYMMDD_HHMMSS>`, without extension.
pub fn pdf_stem(employee_id: u32, generated_at: NaiveDateTime) -> String {
    format!("MAG_{employee_id}_{}", generated_at.format("%Y%m%d_%H%M%S"))
}

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Creates the output file without ever replacing an existing one.
///
/// A second PDF for the same subject within the same second gets `_1`, `_2`, ...
fn create_unique(dir: &Path, stem: &str, bytes: &[u8]) -> Result<(String, PathBuf), StorageError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let filename = if attempt == 0 {
            format!("{stem}.pdf")
        } else {
            format!("{stem}_{attempt}.pdf")
        };
        let path = dir.join(&filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
                    let _ = std::fs::remove_file(&path);
                    return Err(StorageError::io(&path, e));
                }
                return Ok((filename, path));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StorageError::io(&path, e)),
        }
    }
    Err(StorageError::io(
        &dir.join(format!("{stem}.pdf")),
        std::io::Error::new(ErrorKind::AlreadyExists, "no free file name"),
    ))
}

/// Renders the record's PDF into `pdf_dir`, records its path on the record and
/// returns the new file name.
///
/// A missing subject or manager in the directory aborts before anything is written.
pub fn generate_record_pdf(
    store: &TableStore,
    pdf_dir: &Path,
    page_config: &PageConfig,
    identity: &Identity,
    record_id: u32,
    now: NaiveDateTime,
) -> Result<String, AppError> {
    let records = store.load_records()?;
    let record = records
        .iter()
        .find(|r| r.id == record_id)
        .ok_or_else(|| AppError::NotFound(format!("Record {record_id} not found")))?;
    if !can_access(identity, record) {
        return Err(AppError::Forbidden);
    }

    let directory = store.load_employees()?;
    let subject = find(&directory, record.employee_id).ok_or_else(|| {
        AppError::Render(format!("employee {} not in directory", record.employee_id))
    })?;
    let manager = find(&directory, record.manager_id).ok_or_else(|| {
        AppError::Render(format!("manager {} not in directory", record.manager_id))
    })?;

    let plan = layout_review(
        &ReviewDocument {
            record,
            subject,
            manager,
            generated_at: now,
        },
        page_config,
    );
    let bytes = write_pdf(&plan).map_err(|e| AppError::Render(e.to_string()))?;

    let (filename, path) = create_unique(pdf_dir, &pdf_stem(record.employee_id, now), &bytes)?;

    let persisted = store.modify_records(|records| {
        let record = find_mut(records, record_id)
            .ok_or_else(|| AppError::NotFound(format!("Record {record_id} not found")))?;
        record.pdf_path = Some(path.display().to_string());
        Ok::<_, AppError>(())
    });
    if let Err(e) = persisted {
        // Keep the export directory in step with the table.
        if let Err(remove_err) = std::fs::remove_file(&path) {
            warn!("Could not remove orphaned PDF {}: {remove_err}", path.display());
        }
        return Err(e);
    }

    info!(
        "PDF generated: {filename} ({} pages) by {}",
        plan.page_count(),
        identity.name
    );
    Ok(filename)
}

/// Accepts only bare file names; anything that could leave the export directory is rejected.
pub fn safe_pdf_name(filename: &str) -> Option<&str> {
    let ok = !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
        && filename.ends_with(".pdf");
    ok.then_some(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;
    use crate::models::Role;
    use crate::storage::test_support::seeded_store;
    use chrono::NaiveDate;

    fn identity(nr: u32, role: Role) -> Identity {
        Identity {
            personnel_nr: nr,
            role,
            name: format!("User {nr}"),
            email: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_pdf_stem_format() {
        assert_eq!(pdf_stem(12345, now()), "MAG_12345_20250304_140509");
    }

    #[test]
    fn test_generate_writes_file_and_persists_path() {
        let (_tmp, config, store) = seeded_store();
        let filename = generate_record_pdf(
            &store,
            &config.pdf_dir,
            &default_page_config(),
            &identity(67890, Role::Manager),
            1,
            now(),
        )
        .unwrap();

        assert_eq!(filename, "MAG_12345_20250304_140509.pdf");
        let path = config.pdf_dir.join(&filename);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let record = store
            .load_records()
            .unwrap()
            .into_iter()
            .find(|r| r.id == 1)
            .unwrap();
        assert_eq!(
            record.pdf_path.as_deref(),
            Some(path.display().to_string().as_str())
        );
    }

    #[test]
    fn test_generate_never_overwrites() {
        let (_tmp, config, store) = seeded_store();
        let hr = identity(99999, Role::Hr);
        let page = default_page_config();
        let first = generate_record_pdf(&store, &config.pdf_dir, &page, &hr, 1, now()).unwrap();
        let second = generate_record_pdf(&store, &config.pdf_dir, &page, &hr, 1, now()).unwrap();
        assert_ne!(first, second);
        assert_eq!(second, "MAG_12345_20250304_140509_1.pdf");
        assert!(config.pdf_dir.join(&first).exists() && config.pdf_dir.join(&second).exists());
    }

    #[test]
    fn test_generate_forbidden_for_foreign_manager() {
        let (_tmp, config, store) = seeded_store();
        let result = generate_record_pdf(
            &store,
            &config.pdf_dir,
            &default_page_config(),
            &identity(67890, Role::Manager),
            3,
            now(),
        );
        assert!(matches!(result, Err(AppError::Forbidden)));
        assert_eq!(std::fs::read_dir(&config.pdf_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_manager_aborts_without_output() {
        let (_tmp, config, store) = seeded_store();
        // Record 3 is reviewed by 99999, who is not in the directory.
        let result = generate_record_pdf(
            &store,
            &config.pdf_dir,
            &default_page_config(),
            &identity(99999, Role::Hr),
            3,
            now(),
        );
        assert!(matches!(result, Err(AppError::Render(_))));
        assert_eq!(std::fs::read_dir(&config.pdf_dir).unwrap().count(), 0);
        assert!(store.load_records().unwrap()[2].pdf_path.is_none());
    }

    #[test]
    fn test_safe_pdf_name() {
        assert_eq!(safe_pdf_name("MAG_1_x.pdf"), Some("MAG_1_x.pdf"));
        assert_eq!(safe_pdf_name("../tokens.csv"), None);
        assert_eq!(safe_pdf_name("..pdf"), None);
        assert_eq!(safe_pdf_name("a/b.pdf"), None);
        assert_eq!(safe_pdf_name("a\\b.pdf"), None);
        assert_eq!(safe_pdf_name("tokens.csv"), None);
        assert_eq!(safe_pdf_name(""), None);
    }
}
