use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::models::{AccessToken, Employee, ReviewRecord};
use crate::storage::StorageError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A row type backed by a CSV table with a fixed header.
///
/// The header is written explicitly so that empty tables keep their column names.
pub trait TableRow: Serialize + DeserializeOwned {
    const HEADERS: &'static [&'static str];
}

impl TableRow for Employee {
    const HEADERS: &'static [&'static str] = &[
        "PersonalNr",
        "Nachname",
        "Vorname",
        "Email",
        "Abteilung",
        "FK_PersonalNr",
    ];
}

impl TableRow for ReviewRecord {
    const HEADERS: &'static [&'static str] = &[
        "Gespraechs_ID",
        "MA_PersonalNr",
        "FK_PersonalNr",
        "Datum",
        "Status",
        "Ziele_2025",
        "Entwicklung",
        "Feedback",
        "PDF_Pfad",
        "Erstellt_am",
        "Geaendert_am",
    ];
}

impl TableRow for AccessToken {
    const HEADERS: &'static [&'static str] = &[
        "Token",
        "PersonalNr",
        "Name",
        "Email",
        "Rolle",
        "Gueltig_bis",
        "Erstellt_am",
    ];
}

/// Reads a whole table. A leading UTF-8 byte-order mark is ignored.
pub fn read_table<T: TableRow>(path: &Path) -> Result<Vec<T>, StorageError> {
    let bytes = std::fs::read(path).map_err(|e| StorageError::io(path, e))?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StorageError::csv(path, e))
}

/// Rewrites a whole table atomically, BOM first.
///
/// Rows go to a temporary file next to the target which is then renamed over it,
/// so readers see either the old or the new table, never a partial one.
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(path, e))?;
    tmp.write_all(UTF8_BOM)
        .map_err(|e| StorageError::io(path, e))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer
            .write_record(T::HEADERS)
            .map_err(|e| StorageError::csv(path, e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| StorageError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StorageError::io(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::NaiveDate;

    fn token(value: &str) -> AccessToken {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        AccessToken {
            token: value.to_string(),
            personnel_nr: 67890,
            name: "Peter Schmidt".to_string(),
            email: None,
            role: Role::Manager,
            valid_until: day.and_hms_opt(0, 0, 0).unwrap(),
            issued_at: day.and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tokens.csv");
        write_table::<AccessToken>(&path, &[]).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(UTF8_BOM));
        let text = String::from_utf8(raw[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text.trim_end(),
            "Token,PersonalNr,Name,Email,Rolle,Gueltig_bis,Erstellt_am"
        );
        assert!(read_table::<AccessToken>(&path).unwrap().is_empty());
    }

    #[test]
    fn test_reads_spreadsheet_style_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stammdaten.csv");
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(
            "PersonalNr,Nachname,Vorname,Email,Abteilung,FK_PersonalNr\n\
             12345,Müller,Anna,anna.mueller@zh.ch,IT,67890.0\n\
             99999,Team,HR,,HR,\n"
                .as_bytes(),
        );
        std::fs::write(&path, content).unwrap();

        let rows = read_table::<Employee>(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].last_name, "Müller");
        assert_eq!(rows[0].manager_nr, Some(67890));
        assert_eq!(rows[1].email, None);
        assert_eq!(rows[1].manager_nr, None);
    }

    #[test]
    fn test_token_table_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tokens.csv");
        let rows = vec![token("FK67890_abc"), token("FK67890_def")];
        write_table(&path, &rows).unwrap();
        assert_eq!(read_table::<AccessToken>(&path).unwrap(), rows);
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stammdaten.csv");
        std::fs::write(
            &path,
            "PersonalNr,Nachname,Vorname,Email,Abteilung,FK_PersonalNr\nabc,X,Y,,IT,\n",
        )
        .unwrap();
        assert!(matches!(
            read_table::<Employee>(&path),
            Err(StorageError::Csv { .. })
        ));
    }
}
