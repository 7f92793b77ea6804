use crate::error::{PrayerError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub message: String,
}

impl ConfigWarning {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceConfig
// ---------------------------------------------------------------------------

/// Where a session loads its roster from before falling back to the
/// canonical file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    #[default]
    Json,
    Excel {
        #[serde(default)]
        path: PathBuf,
    },
    GoogleSheets {
        #[serde(default)]
        sheet: String,
    },
}

impl SourceConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceConfig::Json => "json",
            SourceConfig::Excel { .. } => "excel",
            SourceConfig::GoogleSheets { .. } => "google_sheets",
        }
    }

    /// The remote sheet to mirror saves into, if this source has one.
    pub fn mirror_sheet(&self) -> Option<&str> {
        match self {
            SourceConfig::GoogleSheets { sheet } if !sheet.trim().is_empty() => Some(sheet),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SheetsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Environment variable holding an OAuth bearer token for the sheets API.
    #[serde(default = "default_sheets_token_env")]
    pub token_env: String,
    #[serde(default = "default_sheets_api")]
    pub sheets_api: String,
    #[serde(default = "default_drive_api")]
    pub drive_api: String,
}

fn default_sheets_token_env() -> String {
    "GOOGLE_SHEETS_TOKEN".to_string()
}

fn default_sheets_api() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_drive_api() -> String {
    "https://www.googleapis.com".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            token_env: default_sheets_token_env(),
            sheets_api: default_sheets_api(),
            drive_api: default_drive_api(),
        }
    }
}

impl SheetsConfig {
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_bot_token_env")]
    pub token_env: String,
    #[serde(default = "default_bot_api")]
    pub api_base: String,
    #[serde(default = "default_mini_app_url")]
    pub mini_app_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_bot_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}

fn default_bot_api() -> String {
    "https://api.telegram.org".to_string()
}

fn default_mini_app_url() -> String {
    "http://localhost:8501".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token_env: default_bot_token_env(),
            api_base: default_bot_api(),
            mini_app_url: default_mini_app_url(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl BotConfig {
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

fn default_version() -> u32 {
    1
}

fn default_data_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATA_FILE)
}

fn default_status_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_STATUS_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_file: default_data_file(),
            status_file: default_status_file(),
            source: SourceConfig::default(),
            sheets: SheetsConfig::default(),
            bot: BotConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PrayerError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`] but an uninitialized root yields the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(PrayerError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match &self.source {
            SourceConfig::Json => {}
            SourceConfig::Excel { path } => {
                if path.as_os_str().is_empty() {
                    warnings.push(ConfigWarning::new(
                        "source type 'excel' has no path; sessions will use the data file",
                    ));
                }
            }
            SourceConfig::GoogleSheets { sheet } => {
                if sheet.trim().is_empty() {
                    warnings.push(ConfigWarning::new(
                        "source type 'google_sheets' has no sheet; sessions will use the data file",
                    ));
                }
                if self.sheets.token().is_none() {
                    warnings.push(ConfigWarning::new(format!(
                        "google_sheets source configured but {} is not set",
                        self.sheets.token_env
                    )));
                }
            }
        }

        if self.bot.poll_interval_ms == 0 {
            warnings.push(ConfigWarning::new(
                "bot.poll_interval_ms is 0; the listener will spin",
            ));
        }

        if self.data_file.extension().and_then(|e| e.to_str()) != Some("json") {
            warnings.push(ConfigWarning::new(format!(
                "data_file '{}' does not end in .json",
                self.data_file.display()
            )));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
