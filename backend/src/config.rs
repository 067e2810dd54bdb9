use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FarmError, FarmResult};

/// Value shipped in the sample secrets file. Never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "your_actual_gemini_api_key_here";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    SecretsFile,
    Missing,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub source: CredentialSource,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub ai: AiConfig,
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    gemini_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> FarmResult<Self> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!("DATABASE_URL not found in env, using local sqlite file");
            "sqlite://data/farm.db".to_string()
        });

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let bind_addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| FarmError::Validation(format!("Invalid bind address: {}", e)))?;

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));

        let secrets_path = env::var("SECRETS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/config/secrets.json"));

        let (api_key, source) =
            resolve_api_key(env::var("GEMINI_API_KEY").ok().as_deref(), &secrets_path);

        let timeout_secs = env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(30);

        Ok(AppConfig {
            database_url,
            bind_addr,
            upload_dir,
            ai: AiConfig {
                api_key,
                source,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: env::var("GEMINI_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Environment variable first, then the local secrets file. Blank values and
/// the placeholder key count as absent at every level.
pub fn resolve_api_key(
    env_value: Option<&str>,
    secrets_path: &Path,
) -> (Option<String>, CredentialSource) {
    if let Some(key) = env_value.and_then(usable_key) {
        return (Some(key), CredentialSource::Environment);
    }

    if let Some(key) = read_secrets_file(secrets_path)
        .gemini_api_key
        .as_deref()
        .and_then(usable_key)
    {
        return (Some(key), CredentialSource::SecretsFile);
    }

    (None, CredentialSource::Missing)
}

fn usable_key(raw: &str) -> Option<String> {
    let clean = raw.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
    if clean.is_empty() || clean == PLACEHOLDER_API_KEY {
        None
    } else {
        Some(clean.to_string())
    }
}

fn read_secrets_file(path: &Path) -> SecretsFile {
    if !path.exists() {
        return SecretsFile::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable secrets file {}: {}", path.display(), e);
            SecretsFile::default()
        }),
        Err(e) => {
            tracing::warn!("Failed to read secrets file {}: {}", path.display(), e);
            SecretsFile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn secrets_with(key: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"gemini_api_key\": \"{}\"}}", key).unwrap();
        file
    }

    #[test]
    fn env_key_wins_over_secrets_file() {
        let secrets = secrets_with("from-file");
        let (key, source) = resolve_api_key(Some("from-env"), secrets.path());
        assert_eq!(key.as_deref(), Some("from-env"));
        assert_eq!(source, CredentialSource::Environment);
    }

    #[test]
    fn blank_env_falls_through_to_secrets_file() {
        let secrets = secrets_with("from-file");
        let (key, source) = resolve_api_key(Some("   "), secrets.path());
        assert_eq!(key.as_deref(), Some("from-file"));
        assert_eq!(source, CredentialSource::SecretsFile);
    }

    #[test]
    fn placeholder_is_treated_as_missing() {
        let secrets = secrets_with(PLACEHOLDER_API_KEY);
        let (key, source) = resolve_api_key(None, secrets.path());
        assert!(key.is_none());
        assert_eq!(source, CredentialSource::Missing);

        let (key, _) = resolve_api_key(Some(PLACEHOLDER_API_KEY), Path::new("missing.json"));
        assert!(key.is_none());
    }

    #[test]
    fn quoted_keys_are_trimmed() {
        let (key, _) = resolve_api_key(Some(" 'abc123' "), Path::new("missing.json"));
        assert_eq!(key.as_deref(), Some("abc123"));
    }

    #[test]
    fn malformed_secrets_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let (key, source) = resolve_api_key(None, file.path());
        assert!(key.is_none());
        assert_eq!(source, CredentialSource::Missing);
    }
}
