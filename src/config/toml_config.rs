use crate::config::github::{GitHubSettings, GitHubStore, DEFAULT_API_BASE};
use crate::config::local::LocalStore;
use crate::core::snapshot::DEFAULT_STUDENT;
use crate::core::SnapshotStore;
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const REPO_ENV: &str = "REPO_NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Github,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    pub github: Option<GitHubConfig>,
    #[serde(default)]
    pub student: StudentConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: Option<Backend>,
    pub path: Option<String>,
    pub directory: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub repo: Option<String>,
    pub api_base: Option<String>,
    pub branch: Option<String>,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .field("branch", &self.branch)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentConfig {
    pub default_id: Option<String>,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| LedgerError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| LedgerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Configuration taken from the two hosting secrets alone. Both present
    /// selects the GitHub backend, otherwise the local one.
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_ENV).ok().filter(|v| !v.trim().is_empty());
        let repo = std::env::var(REPO_ENV).ok().filter(|v| !v.trim().is_empty());

        match (token, repo) {
            (Some(token), Some(repo)) => Self {
                store: StoreConfig {
                    backend: Some(Backend::Github),
                    ..StoreConfig::default()
                },
                github: Some(GitHubConfig {
                    token: Some(token),
                    repo: Some(repo),
                    ..GitHubConfig::default()
                }),
                student: StudentConfig::default(),
            },
            _ => Self::default(),
        }
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            LedgerError::ConfigError {
                message: format!("bad substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn backend(&self) -> Backend {
        self.store.backend.unwrap_or_default()
    }

    pub fn data_file(&self) -> &str {
        self.store.path.as_deref().unwrap_or(DEFAULT_DATA_FILE)
    }

    pub fn data_dir(&self) -> &str {
        self.store.directory.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    pub fn student_id(&self) -> &str {
        self.student.default_id.as_deref().unwrap_or(DEFAULT_STUDENT)
    }

    pub fn github_settings(&self) -> Result<GitHubSettings> {
        let github = validate_required_field("github", &self.github)?;
        let token = validate_required_field("github.token", &github.token)?;
        let repo = validate_required_field("github.repo", &github.repo)?;

        Ok(GitHubSettings {
            token: token.trim().to_string(),
            repo: repo.trim().to_string(),
            path: self.data_file().to_string(),
            api_base: github
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            branch: github.branch.clone(),
        })
    }

    pub fn build_store(&self) -> Result<Box<dyn SnapshotStore>> {
        self.validate()?;
        match self.backend() {
            Backend::Local => {
                tracing::debug!("Using local store in {}", self.data_dir());
                Ok(Box::new(LocalStore::new(self.data_dir(), self.data_file())))
            }
            Backend::Github => {
                let settings = self.github_settings()?;
                tracing::debug!("Using GitHub store {:?}", settings);
                Ok(Box::new(GitHubStore::new(settings)?))
            }
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store.path", self.data_file())?;
        validate_non_empty_string("student.default_id", self.student_id())?;
        match self.backend() {
            Backend::Local => validate_path("store.directory", self.data_dir()),
            Backend::Github => self.github_settings()?.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[store]
backend = "github"
path = "grades.json"

[github]
token = "abc"
repo = "alice/grades"
branch = "main"

[student]
default_id = "alice"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.backend(), Backend::Github);
        assert_eq!(config.data_file(), "grades.json");
        assert_eq!(config.student_id(), "alice");

        let settings = config.github_settings().unwrap();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.branch.as_deref(), Some("main"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_defaults_to_local() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.backend(), Backend::Local);
        assert_eq!(config.data_file(), DEFAULT_DATA_FILE);
        assert_eq!(config.data_dir(), DEFAULT_DATA_DIR);
        assert_eq!(config.student_id(), DEFAULT_STUDENT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GRADE_LEDGER_TEST_REPO", "bob/records");

        let toml_content = r#"
[github]
token = "${GRADE_LEDGER_TEST_UNSET_TOKEN}"
repo = "${GRADE_LEDGER_TEST_REPO}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        let github = config.github.unwrap();
        assert_eq!(github.repo.as_deref(), Some("bob/records"));
        assert_eq!(
            github.token.as_deref(),
            Some("${GRADE_LEDGER_TEST_UNSET_TOKEN}")
        );

        std::env::remove_var("GRADE_LEDGER_TEST_REPO");
    }

    #[test]
    fn test_github_backend_requires_credentials() {
        let config = AppConfig::from_toml_str("[store]\nbackend = \"github\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(LedgerError::MissingConfig { .. })
        ));
        assert!(config.build_store().is_err());
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let result = AppConfig::from_toml_str("[store]\nbackend = \"s3\"\n");
        assert!(matches!(result, Err(LedgerError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\ndirectory = \"/tmp/grades\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "/tmp/grades");
        assert!(config.build_store().is_ok());
    }
}
