use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::vault_io::{self, CONFIG_FILE, VAULT_DIR};

use super::{CmdResult, Context, start_dir};

const VAULT_TOML_TEMPLATE: &str = r##"[vault]
name = {name}
# Records are stored under keepsake/data/<owner>/. Override per command with --owner.
owner = {owner}

# --- Display ---
# chrono format strings used in text output. Uncomment to override.

[display]
# date_format = "%Y-%m-%d"
# month_label = "%B %Y"

# --- Logging ---
# tracing filter used when KEEPSAKE_LOG is unset, e.g. "info" or "keepsake=debug".

[log]
level = "warn"
"##;

/// Infer a vault name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default owner when `--owner` is not given
fn default_owner() -> String {
    std::env::var("USER")
        .ok()
        .filter(|u| vault_io::validate_owner(u).is_ok())
        .unwrap_or_else(|| "me".to_string())
}

/// Render vault.toml. Values are written as TOML strings so quotes and
/// backslashes in the name survive.
fn render_vault_toml(name: &str, owner: &str) -> String {
    let quote = |s: &str| toml::Value::String(s.to_string()).to_string();
    VAULT_TOML_TEMPLATE
        .replace("{name}", &quote(name))
        .replace("{owner}", &quote(owner))
}

pub fn cmd_init(ctx: &Context, args: InitArgs) -> CmdResult {
    let root = start_dir(ctx.vault_dir.as_deref())?;
    let vault_dir = root.join(VAULT_DIR);

    if vault_dir.join(CONFIG_FILE).exists() {
        return Err(format!("keepsake vault already exists in {}/", vault_dir.display()).into());
    }

    if let Some(parent) = root.parent()
        && let Ok(parent_root) = vault_io::discover_vault(parent)
    {
        eprintln!(
            "Note: parent vault found at {}/",
            parent_root.join(VAULT_DIR).display()
        );
        eprintln!("Creating new vault in ./{}/", VAULT_DIR);
    }

    let owner = match ctx.owner.clone() {
        Some(owner) => owner,
        None => default_owner(),
    };
    vault_io::validate_owner(&owner)?;

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Keepsake".to_string())
    });

    fs::create_dir_all(vault_dir.join("data").join(&owner))?;
    fs::write(vault_dir.join(CONFIG_FILE), render_vault_toml(&name, &owner))?;
    tracing::info!(root = %root.display(), owner = %owner, "vault initialized");

    println!("Initialized keepsake vault: {} (owner: {})", name, owner);
    Ok(())
}
