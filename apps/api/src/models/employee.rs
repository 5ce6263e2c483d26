use serde::{Deserialize, Serialize};

use crate::models::csv_format;

/// One row of the employee directory (`stammdaten.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "PersonalNr", with = "csv_format::int")]
    pub personnel_nr: u32,
    #[serde(rename = "Nachname")]
    pub last_name: String,
    #[serde(rename = "Vorname")]
    pub first_name: String,
    #[serde(rename = "Email", default, with = "csv_format::opt_text")]
    pub email: Option<String>,
    #[serde(rename = "Abteilung", default)]
    pub department: String,
    /// Absent for the top of the hierarchy.
    #[serde(rename = "FK_PersonalNr", default, with = "csv_format::opt_int")]
    pub manager_nr: Option<u32>,
}

impl Employee {
    /// "First Last", the form used on screen and in the PDF.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Looks up an employee by personnel number.
pub fn find(directory: &[Employee], personnel_nr: u32) -> Option<&Employee> {
    directory.iter().find(|e| e.personnel_nr == personnel_nr)
}
