use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::csv_format;

/// Role carried by an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Line manager ("Führungskraft"); sees only records they review.
    #[serde(rename = "FK", alias = "Manager")]
    Manager,
    #[serde(rename = "HR")]
    Hr,
    /// Any other value found in the token table. Never granted access.
    #[serde(other)]
    Unknown,
}

/// One row of `tokens.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "PersonalNr", with = "csv_format::int")]
    pub personnel_nr: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email", default, with = "csv_format::opt_text")]
    pub email: Option<String>,
    #[serde(rename = "Rolle")]
    pub role: Role,
    /// Last valid instant; a bare date in the table means midnight of that day.
    #[serde(rename = "Gueltig_bis", with = "csv_format::timestamp")]
    pub valid_until: NaiveDateTime,
    #[serde(rename = "Erstellt_am", with = "csv_format::timestamp")]
    pub issued_at: NaiveDateTime,
}
