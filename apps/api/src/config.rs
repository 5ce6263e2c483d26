use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Application configuration loaded from environment variables.
///
/// Every path the service touches is resolved here once; components receive the
/// struct (or the paths derived from it) instead of reaching for globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Validity window for freshly issued tokens.
    pub token_validity_days: i64,
    /// Base URL printed in the login links produced by `issue-tokens`.
    pub public_base_url: String,
    pub hr_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(env_or("DATA_DIR", "data"));
        let pdf_dir = std::env::var("PDF_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("pdf_export"));
        let port = env_or("PORT", "5000")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            pdf_dir,
            static_dir: PathBuf::from(env_or("STATIC_DIR", "app")),
            port,
            rust_log: env_or("RUST_LOG", "info"),
            token_validity_days: env_or("TOKEN_VALIDITY_DAYS", "365")
                .parse::<i64>()
                .context("TOKEN_VALIDITY_DAYS must be an integer")?,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            hr_email: env_or("HR_EMAIL", "hr@example.org"),
            data_dir,
        })
    }

    pub fn employees_path(&self) -> PathBuf {
        self.data_dir.join("stammdaten.csv")
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("gespraeche.csv")
    }

    pub fn tokens_path(&self) -> PathBuf {
        self.data_dir.join("tokens.csv")
    }

    /// Creates the data and export directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.data_dir)?;
        create_dir(&self.pdf_dir)?;
        Ok(())
    }
}

#[cfg(test)]
impl Config {
    /// Config rooted at a throwaway directory, with every other setting at its default.
    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Config {
            pdf_dir: data_dir.join("pdf_export"),
            static_dir: data_dir.join("app"),
            port: 5000,
            rust_log: "info".to_string(),
            token_validity_days: 365,
            public_base_url: "http://localhost:5000".to_string(),
            hr_email: "hr@example.org".to_string(),
            data_dir,
        }
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
        info!("Created directory {}", path.display());
    }
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
