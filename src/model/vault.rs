use std::path::PathBuf;

use super::config::VaultConfig;

/// An opened keepsake vault
#[derive(Debug)]
pub struct Vault {
    /// Root directory of the vault (parent of `keepsake/`)
    pub root: PathBuf,
    /// Path to the `keepsake/` directory
    pub vault_dir: PathBuf,
    /// Parsed vault.toml
    pub config: VaultConfig,
    /// Owner whose tables are read and written (config owner unless overridden)
    pub owner: String,
}
