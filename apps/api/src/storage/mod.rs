//! CSV-backed table storage.
//!
//! Every call reads the backing file from disk; there is no in-memory cache.
//! Rewrites are whole-table and atomic (temp file + rename), and record
//! read-modify-write cycles are serialized by a single writer lock.

pub mod csv_table;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::config::Config;
use crate::models::{AccessToken, Employee, ReviewRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        StorageError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Handle on the three tables. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct TableStore {
    employees_path: PathBuf,
    records_path: PathBuf,
    tokens_path: PathBuf,
    write_lock: Mutex<()>,
}

impl TableStore {
    pub fn new(config: &Config) -> Self {
        TableStore {
            employees_path: config.employees_path(),
            records_path: config.records_path(),
            tokens_path: config.tokens_path(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn load_employees(&self) -> Result<Vec<Employee>, StorageError> {
        csv_table::read_table(&self.employees_path)
    }

    pub fn load_records(&self) -> Result<Vec<ReviewRecord>, StorageError> {
        csv_table::read_table(&self.records_path)
    }

    pub fn load_tokens(&self) -> Result<Vec<AccessToken>, StorageError> {
        csv_table::read_table(&self.tokens_path)
    }

    pub fn save_employees(&self, rows: &[Employee]) -> Result<(), StorageError> {
        csv_table::write_table(&self.employees_path, rows)
    }

    pub fn save_tokens(&self, rows: &[AccessToken]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        csv_table::write_table(&self.tokens_path, rows)
    }

    pub fn save_records(&self, rows: &[ReviewRecord]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        csv_table::write_table(&self.records_path, rows)
    }

    /// Read-modify-write over the record table under the writer lock.
    ///
    /// The table is rewritten only when `f` succeeds; an error leaves the file untouched.
    pub fn modify_records<T, E>(
        &self,
        f: impl FnOnce(&mut Vec<ReviewRecord>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<ReviewRecord> = csv_table::read_table(&self.records_path)?;
        let out = f(&mut records)?;
        csv_table::write_table(&self.records_path, &records)?;
        Ok(out)
    }

    pub fn employees_exist(&self) -> bool {
        self.employees_path.exists()
    }

    pub fn records_exist(&self) -> bool {
        self.records_path.exists()
    }

    pub fn tokens_exist(&self) -> bool {
        self.tokens_path.exists()
    }
}
