use crate::error::{QuizError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CATALOGUE_URL: &str =
    "https://raw.githubusercontent.com/Phil1010/quiz-exo7-stage2023/main/catalogue.json";
pub const DEFAULT_PREAMBLE_URL: &str =
    "https://raw.githubusercontent.com/dmegy/exercices-exo7-stage2023/main/exercices/_preambule.txt";
pub const DEFAULT_QUIZ_URL: &str = "https://phil1010.github.io/quizapp-exo7/";
pub const DEFAULT_PAGE_URL: &str = "https://phil1010.github.io/quiz-exo7-stage2023/outils/edit-new.html";
pub const DEFAULT_LOG_FILE: &str = "quiz_builder.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings, read from `config.toml`. Every key is optional.
///
/// ```toml
/// catalogue_url = "https://example.org/catalogue.json"
/// export_dir = "~/quiz"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub catalogue_url: String,
    pub catalogue_file: Option<PathBuf>,
    pub preamble_url: String,
    /// Base of the generated quiz links (`?c=..&r=..&p=..&n=..&i=..`).
    pub quiz_url: String,
    /// Location the selection is synchronized into (`?liste=..`).
    pub page_url: String,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            catalogue_url: DEFAULT_CATALOGUE_URL.to_string(),
            catalogue_file: None,
            preamble_url: DEFAULT_PREAMBLE_URL.to_string(),
            quiz_url: DEFAULT_QUIZ_URL.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl QuizConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: QuizConfig =
            toml::from_str(content).map_err(|e| QuizError::Config(e.to_string()))?;
        config.export_dir = expand_home(&config.export_dir);
        config.log_file = expand_home(&config.log_file);
        config.catalogue_file = config.catalogue_file.as_deref().map(expand_home);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Loads the explicit file if given, else the per-user file when it exists,
    /// else the defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "exo7", "quiz-builder")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(dirs) = directories::BaseDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    path.to_path_buf()
}
