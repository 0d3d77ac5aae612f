use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Result, SyncError};

/// Represents the complete configuration for release-notes-sync.
///
/// Non-secret settings (endpoints, project coordinates, file paths) live in
/// an optional TOML file; credentials come exclusively from the environment
/// via [Credentials].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub transform: TransformConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Source project settings (the GitLab side).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_gitlab_url")]
    pub gitlab_url: String,

    /// Project ID or path, e.g. "ndx/ghippo".
    #[serde(default = "default_project")]
    pub project: String,

    /// Base directory of the per-series release notes files.
    #[serde(default = "default_notes_base_dir")]
    pub notes_base_dir: String,

    /// Ref the notes files are read at.
    #[serde(default = "default_notes_ref")]
    pub notes_ref: String,
}

/// Text-rewriting service settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TransformConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,
}

/// Target repository settings (the GitHub side).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    /// Target repository, e.g. "DaoCloud/DaoCloud-docs".
    #[serde(default = "default_target_repo")]
    pub repo: String,

    /// Path of the history document inside the target repository.
    #[serde(default = "default_target_file")]
    pub file_path: String,

    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,
}

/// Run-level settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_gitlab_url() -> String {
    "https://gitlab.daocloud.cn".to_string()
}

fn default_project() -> String {
    "ndx/ghippo".to_string()
}

fn default_notes_base_dir() -> String {
    "releasenotes".to_string()
}

fn default_notes_ref() -> String {
    "master".to_string()
}

fn default_api_base() -> String {
    "https://chat.d.run/v1".to_string()
}

fn default_model() -> String {
    "public/deepseek-v3".to_string()
}

fn default_target_repo() -> String {
    "parsifal-rui/test-docs".to_string()
}

fn default_target_file() -> String {
    "release-notes.md".to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_author_name() -> String {
    "Release Bot".to_string()
}

fn default_author_email() -> String {
    "bot@daocloud.io".to_string()
}

fn default_log_file() -> String {
    "sync_result.log".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            gitlab_url: default_gitlab_url(),
            project: default_project(),
            notes_base_dir: default_notes_base_dir(),
            notes_ref: default_notes_ref(),
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            api_base: default_api_base(),
            model: default_model(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            repo: default_target_repo(),
            file_path: default_target_file(),
            base_branch: default_base_branch(),
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            log_file: default_log_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig::default(),
            transform: TransformConfig::default(),
            target: TargetConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Config {
    /// Apply environment overrides for the target repository coordinates.
    ///
    /// `TARGET_REPO` and `TARGET_FILE_PATH` take precedence over the file
    /// configuration; empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(repo) = env::var("TARGET_REPO") {
            if !repo.trim().is_empty() {
                self.target.repo = repo;
            }
        }
        if let Ok(file_path) = env::var("TARGET_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.target.file_path = file_path;
            }
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `relsync.toml` in current directory
/// 3. `.relsync.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./relsync.toml").exists() {
        fs::read_to_string("./relsync.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".relsync.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| SyncError::config(format!("cannot parse configuration: {}", e)))
}

/// Tokens required before any network call is attempted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub gitlab_token: String,
    pub drun_api_key: String,
    pub github_token: String,
}

impl Credentials {
    pub const REQUIRED: [&'static str; 3] = ["GITLAB_TOKEN", "DRUN_API_KEY", "GITHUB_TOKEN"];

    /// Read the required tokens from the environment.
    ///
    /// Fails with a `Config` error naming every missing variable; the
    /// caller is expected to report and exit before touching the network.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let gitlab_token = required_var("GITLAB_TOKEN", &mut missing);
        let drun_api_key = required_var("DRUN_API_KEY", &mut missing);
        let github_token = required_var("GITHUB_TOKEN", &mut missing);

        if !missing.is_empty() {
            return Err(SyncError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Credentials {
            gitlab_token,
            drun_api_key,
            github_token,
        })
    }

    /// Presence of each required variable, for run-log reporting.
    pub fn presence() -> Vec<(&'static str, bool)> {
        Self::REQUIRED
            .iter()
            .map(|name| (*name, is_set(name)))
            .collect()
    }
}

fn required_var(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn is_set(name: &str) -> bool {
    env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}
