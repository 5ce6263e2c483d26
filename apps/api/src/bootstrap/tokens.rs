//! Token issuance: one token per manager found in the directory plus an HR master token.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::RngCore;
use tracing::info;

use crate::models::employee::find;
use crate::models::{AccessToken, Employee, Role};
use crate::storage::{StorageError, TableStore};

pub const HR_PERSONNEL_NR: u32 = 99999;

/// Issuance parameters, normally taken from `Config`.
#[derive(Debug, Clone)]
pub struct IssueOptions {
    pub validity_days: i64,
    pub hr_email: String,
}

fn random_segment(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Distinct manager numbers in directory order, restricted to managers who are
/// themselves in the directory.
pub fn directory_managers(directory: &[Employee]) -> Vec<&Employee> {
    let mut seen = Vec::new();
    for nr in directory.iter().filter_map(|e| e.manager_nr) {
        if seen.iter().any(|m: &&Employee| m.personnel_nr == nr) {
            continue;
        }
        if let Some(manager) = find(directory, nr) {
            seen.push(manager);
        }
    }
    seen
}

/// Builds a fresh token table. Pure apart from the random token segments.
pub fn build_tokens(
    directory: &[Employee],
    options: &IssueOptions,
    now: NaiveDateTime,
) -> Vec<AccessToken> {
    // Expiry is midnight at the start of the day, like a bare date in the table.
    let valid_until = (now.date() + Duration::days(options.validity_days)).and_time(NaiveTime::MIN);

    let mut tokens: Vec<AccessToken> = directory_managers(directory)
        .into_iter()
        .map(|manager| AccessToken {
            token: format!("FK{:05}_{}", manager.personnel_nr, random_segment(16)),
            personnel_nr: manager.personnel_nr,
            name: manager.display_name(),
            email: manager.email.clone(),
            role: Role::Manager,
            valid_until,
            issued_at: now,
        })
        .collect();

    tokens.push(AccessToken {
        token: format!("HR_MASTER_{}", random_segment(24)),
        personnel_nr: HR_PERSONNEL_NR,
        name: "HR Team".to_string(),
        email: Some(options.hr_email.clone()),
        role: Role::Hr,
        valid_until,
        issued_at: now,
    });
    tokens
}

pub fn login_link(base_url: &str, token: &AccessToken) -> String {
    format!("{}/?token={}", base_url.trim_end_matches('/'), token.token)
}

/// Replaces the token table with freshly issued tokens and returns them.
pub fn issue_tokens(
    store: &TableStore,
    options: &IssueOptions,
    now: NaiveDateTime,
) -> Result<Vec<AccessToken>, StorageError> {
    let directory = store.load_employees()?;
    info!("Loaded {} employees", directory.len());

    let tokens = build_tokens(&directory, options, now);
    store.save_tokens(&tokens)?;
    info!(
        "Issued {} manager tokens and 1 HR token",
        tokens.len().saturating_sub(1)
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::access::resolve_token;
    use crate::bootstrap::seed::sample_employees;
    use crate::storage::test_support::seeded_store;
    use chrono::NaiveDate;

    fn options() -> IssueOptions {
        IssueOptions {
            validity_days: 365,
            hr_email: "hr@zh.ch".to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_only_directory_managers_get_tokens() {
        let directory = sample_employees();
        let managers: Vec<u32> = directory_managers(&directory)
            .iter()
            .map(|m| m.personnel_nr)
            .collect();
        // 99999 manages people but is not in the directory.
        assert_eq!(managers, vec![67890]);
    }

    #[test]
    fn test_token_shapes() {
        let tokens = build_tokens(&sample_employees(), &options(), now());
        assert_eq!(tokens.len(), 2);

        let manager = &tokens[0];
        assert!(manager.token.starts_with("FK67890_"));
        assert_eq!(manager.token.len(), "FK67890_".len() + 22);
        assert_eq!(manager.role, Role::Manager);
        assert_eq!(manager.name, "Peter Schmidt");

        let hr = &tokens[1];
        assert!(hr.token.starts_with("HR_MASTER_"));
        assert_eq!(hr.token.len(), "HR_MASTER_".len() + 32);
        assert_eq!(hr.role, Role::Hr);
        assert_eq!(hr.personnel_nr, HR_PERSONNEL_NR);
        assert_eq!(
            hr.valid_until,
            NaiveDate::from_ymd_opt(2026, 1, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = build_tokens(&sample_employees(), &options(), now());
        let b = build_tokens(&sample_employees(), &options(), now());
        assert_ne!(a[0].token, b[0].token);
        assert_ne!(a[1].token, b[1].token);
    }

    #[test]
    fn test_issued_tokens_resolve() {
        let (_tmp, _config, store) = seeded_store();
        let issued = issue_tokens(&store, &options(), now()).unwrap();
        let table = store.load_tokens().unwrap();
        assert_eq!(table, issued);
        for token in &issued {
            let identity = resolve_token(&table, &token.token, now()).unwrap();
            assert_eq!(identity.personnel_nr, token.personnel_nr);
        }
    }

    #[test]
    fn test_login_link() {
        let tokens = build_tokens(&sample_employees(), &options(), now());
        let link = login_link("http://10.0.0.1:5000/", &tokens[0]);
        assert_eq!(link, format!("http://10.0.0.1:5000/?token={}", tokens[0].token));
    }
}
