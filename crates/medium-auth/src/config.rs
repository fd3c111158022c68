//! Client configuration file
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The access token may come from the file or from `MEDIUM_ACCESS_TOKEN`,
//! which wins when set.

use std::path::{Path, PathBuf};

use common::Secret;
use serde::Deserialize;

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::credentials::Credentials;

/// Env var naming the config file
pub const CONFIG_PATH_ENV: &str = "MEDIUM_CONFIG";

/// Env var overriding the stored access token
pub const ACCESS_TOKEN_ENV: &str = "MEDIUM_ACCESS_TOKEN";

/// Root configuration
///
/// ```json
/// {
///   "credentials": { "clientId": "...", "clientSecret": "..." },
///   "redirectUri": "http://127.0.0.1:9000/callback",
///   "accessToken": "optional"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub credentials: Credentials,
    pub redirect_uri: String,
    #[serde(default)]
    pub access_token: Option<Secret<String>>,
}

impl ConfigFile {
    /// Load configuration from a JSON file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ConfigFile = serde_json::from_str(&contents)?;

        if !config.redirect_uri.starts_with("http://")
            && !config.redirect_uri.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "redirectUri must start with http:// or https://, got: {}",
                config.redirect_uri
            )));
        }

        if config.credentials.client_id.is_empty() {
            return Err(common::Error::Config(
                "credentials.clientId must not be empty".into(),
            ));
        }

        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            config.access_token = Some(Secret::new(token));
        }

        // Blank tokens count as absent
        if config
            .access_token
            .as_ref()
            .is_some_and(|t| t.expose().trim().is_empty())
        {
            config.access_token = None;
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or `MEDIUM_CONFIG` env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn write_config(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("medium-config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    const VALID: &str = r#"{
        "credentials": { "clientId": "KoolClient22", "clientSecret": "SecretSauces" },
        "redirectUri": "http://127.0.0.1:9000/callback",
        "accessToken": "KoolToke44"
    }"#;

    #[test]
    fn load_valid_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env(ACCESS_TOKEN_ENV) };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, VALID);

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.credentials.client_id, "KoolClient22");
        assert_eq!(config.credentials.client_secret.expose(), "SecretSauces");
        assert_eq!(config.redirect_uri, "http://127.0.0.1:9000/callback");
        assert_eq!(config.access_token.unwrap().expose(), "KoolToke44");
    }

    #[test]
    fn access_token_is_optional() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env(ACCESS_TOKEN_ENV) };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "credentials": { "clientId": "KoolClient22", "clientSecret": "SecretSauces" },
                "redirectUri": "https://example.com/callback"
            }"#,
        );

        let config = ConfigFile::load(&path).unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn env_var_overrides_file_token() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, VALID);

        unsafe { set_env(ACCESS_TOKEN_ENV, "EnvToke99") };
        let config = ConfigFile::load(&path).unwrap();
        unsafe { remove_env(ACCESS_TOKEN_ENV) };

        assert_eq!(config.access_token.unwrap().expose(), "EnvToke99");
    }

    #[test]
    fn blank_token_is_treated_as_absent() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, VALID);

        unsafe { set_env(ACCESS_TOKEN_ENV, "  ") };
        let config = ConfigFile::load(&path).unwrap();
        unsafe { remove_env(ACCESS_TOKEN_ENV) };

        assert!(config.access_token.is_none());
    }

    #[test]
    fn rejects_non_http_redirect_uri() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "credentials": { "clientId": "KoolClient22", "clientSecret": "SecretSauces" },
                "redirectUri": "ftp://127.0.0.1/callback"
            }"#,
        );

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, common::Error::Config(_)));
        assert!(err.to_string().contains("redirectUri"), "got: {err}");
    }

    #[test]
    fn rejects_empty_client_id() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "credentials": { "clientId": "", "clientSecret": "SecretSauces" },
                "redirectUri": "http://127.0.0.1:9000/callback"
            }"#,
        );

        assert!(matches!(
            ConfigFile::load(&path),
            Err(common::Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, common::Error::Io(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{ not json");
        assert!(matches!(
            ConfigFile::load(&path),
            Err(common::Error::Json(_))
        ));
    }

    #[test]
    fn resolve_path_cli_takes_precedence() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env(CONFIG_PATH_ENV, "/env/medium.json") };
        let path = ConfigFile::resolve_path(Some("/cli/medium.json"));
        unsafe { remove_env(CONFIG_PATH_ENV) };
        assert_eq!(path, PathBuf::from("/cli/medium.json"));
    }

    #[test]
    fn resolve_path_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env(CONFIG_PATH_ENV, "/env/medium.json") };
        let path = ConfigFile::resolve_path(None);
        unsafe { remove_env(CONFIG_PATH_ENV) };
        assert_eq!(path, PathBuf::from("/env/medium.json"));
    }

    #[test]
    fn resolve_path_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env(CONFIG_PATH_ENV) };
        let path = ConfigFile::resolve_path(None);
        assert_eq!(path, PathBuf::from("medium-config.json"));
    }
}
