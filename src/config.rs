use std::path::Path;

use serde::Deserialize;

use crate::error::ScanError;

/// Root configuration structure, deserialized from `.modlicense/config.toml`.
///
/// Every section and key is optional; missing values fall back to the public
/// GitHub and pkg.go.dev endpoints.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub pkgsite: PkgsiteConfig,
    pub logging: LoggingConfig,
}

/// GitHub REST API settings used for `github.com` repositories.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    /// Environment variable holding the bearer token.
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

/// pkg.go.dev settings used for modules outside the known hosts.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PkgsiteConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for PkgsiteConfig {
    fn default() -> Self {
        Self {
            url: "https://pkg.go.dev".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"modlicense=debug"`.
    pub filter: Option<String>,
}

impl Config {
    /// Read the API token from the configured environment variable.
    /// An empty variable counts as unset.
    pub fn github_token(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.modlicense/config.toml`
/// 3. `~/.config/modlicense/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, ScanError> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".modlicense").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("modlicense").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, ScanError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScanError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ScanError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.github.api_url, "https://api.github.com");
        assert_eq!(cfg.github.token_env, "GITHUB_API_KEY");
        assert_eq!(cfg.pkgsite.url, "https://pkg.go.dev");
        assert_eq!(cfg.pkgsite.timeout_secs, 10);
        assert!(cfg.logging.filter.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[github]
api_url = "http://localhost:9000"

[logging]
filter = "debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.github.api_url, "http://localhost:9000");
        assert_eq!(cfg.github.timeout_secs, 10);
        assert_eq!(cfg.pkgsite.url, "https://pkg.go.dev");
        assert_eq!(cfg.logging.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_project_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".modlicense")).unwrap();
        std::fs::write(
            dir.path().join(".modlicense").join("config.toml"),
            "[pkgsite]\ntimeout_secs = 3\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.pkgsite.timeout_secs, 3);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[github\napi_url = 1").unwrap();

        let err = load_config(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, ScanError::ConfigParse { .. }));

        let missing = dir.path().join("missing.toml");
        let err = load_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ScanError::ConfigRead { .. }));
    }
}
