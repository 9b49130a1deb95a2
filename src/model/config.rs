use serde::{Deserialize, Serialize};

/// Configuration from vault.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub vault: VaultInfo,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultInfo {
    pub name: String,
    /// The user whose records this vault holds
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format for dates in text output
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// chrono format for calendar month bucket labels
    #[serde(default = "default_month_label")]
    pub month_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            date_format: default_date_format(),
            month_label: default_month_label(),
        }
    }
}

/// Default: see src/cli/handlers/init.rs
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// Default: see src/cli/handlers/init.rs
fn default_month_label() -> String {
    crate::ops::classify::MONTH_LABEL_FORMAT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive used when KEEPSAKE_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
