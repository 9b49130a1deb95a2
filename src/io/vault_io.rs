use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};

use crate::model::config::VaultConfig;
use crate::model::vault::Vault;

/// Name of the vault directory inside a vault root
pub const VAULT_DIR: &str = "keepsake";
/// Name of the config file inside the vault directory
pub const CONFIG_FILE: &str = "vault.toml";

/// Error type for vault I/O operations
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("not a keepsake vault: no keepsake/vault.toml found")]
    NotAVault,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse vault.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid owner name {0:?}: use letters, digits, '-' or '_'")]
    InvalidOwner(String),
    #[error("invalid [display] {field} {format:?} in vault.toml")]
    InvalidFormat { field: &'static str, format: String },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the vault by walking up from the given directory, looking for
/// a `keepsake/` subdirectory holding a `vault.toml`.
pub fn discover_vault(start: &Path) -> Result<PathBuf, VaultError> {
    let mut current = start.to_path_buf();
    loop {
        let vault_dir = current.join(VAULT_DIR);
        if vault_dir.is_dir() && vault_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(VaultError::NotAVault);
        }
    }
}

/// Read and parse `vault.toml` from a vault directory.
pub fn read_config(vault_dir: &Path) -> Result<VaultConfig, VaultError> {
    let config_path = vault_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| VaultError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}

/// Open the vault rooted at `root`. `owner_override` replaces the configured owner.
pub fn load_vault(root: &Path, owner_override: Option<&str>) -> Result<Vault, VaultError> {
    let vault_dir = root.join(VAULT_DIR);
    if !vault_dir.is_dir() {
        return Err(VaultError::NotAVault);
    }
    let config = read_config(&vault_dir)?;
    validate_format("date_format", &config.display.date_format)?;
    validate_format("month_label", &config.display.month_label)?;
    let owner = owner_override.unwrap_or(&config.vault.owner).to_string();
    validate_owner(&owner)?;

    tracing::debug!(root = %root.display(), owner = %owner, "opened vault");
    Ok(Vault {
        root: root.to_path_buf(),
        vault_dir,
        config,
        owner,
    })
}

/// Owner names become directory names, so keep them to a safe alphabet.
pub fn validate_owner(owner: &str) -> Result<(), VaultError> {
    let ok = !owner.is_empty()
        && owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(VaultError::InvalidOwner(owner.to_string()))
    }
}

/// Date formats are used for `Display`, which panics on a bad format string,
/// so they are checked once when the vault is opened.
fn validate_format(field: &'static str, format: &str) -> Result<(), VaultError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(VaultError::InvalidFormat {
            field,
            format: format.to_string(),
        });
    }
    Ok(())
}
