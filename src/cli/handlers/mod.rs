mod book;
mod init;
mod msg;
mod records;

pub use init::cmd_init;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::io::file_store::FileStore;
use crate::io::vault_io::{self, VAULT_DIR};
use crate::model::config::LogConfig;
use crate::model::vault::Vault;
use crate::store::StoreError;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context {
        vault_dir: cli.vault_dir,
        owner: cli.owner,
        json: cli.json,
    };

    match cli.command {
        // Init runs before any vault exists
        Commands::Init(args) => cmd_init(&ctx, args),

        // Records
        Commands::Add(args) => records::cmd_add(&ctx, args),
        Commands::Rm(args) => records::cmd_rm(&ctx, args),
        Commands::Calendar(args) => records::cmd_calendar(&ctx, args),
        Commands::Immunizations => records::cmd_immunizations(&ctx),
        Commands::Meds => records::cmd_meds(&ctx),
        Commands::Contacts => records::cmd_contacts(&ctx),
        Commands::Search(args) => records::cmd_search(&ctx, args),
        Commands::Tags(args) => records::cmd_tags(&ctx, args),

        // Messages and memory book
        Commands::Msg(cmd) => msg::cmd_msg(&ctx, cmd),
        Commands::Book(cmd) => book::cmd_book(&ctx, cmd),
    }
}

/// Log filter from the vault's `[log] level`, or the default when no
/// vault can be read. Errors are ignored here; the command itself reports them.
pub fn configured_log_level(cli: &Cli) -> String {
    start_dir(cli.vault_dir.as_deref())
        .ok()
        .and_then(|start| vault_io::discover_vault(&start).ok())
        .and_then(|root| vault_io::read_config(&root.join(VAULT_DIR)).ok())
        .map(|config| config.log.level)
        .unwrap_or_else(|| LogConfig::default().level)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Global flags shared by every command
pub struct Context {
    vault_dir: Option<String>,
    owner: Option<String>,
    json: bool,
}

impl Context {
    fn open(&self) -> Result<Session, Box<dyn std::error::Error>> {
        let start = start_dir(self.vault_dir.as_deref())?;
        let root = vault_io::discover_vault(&start)?;
        let vault = vault_io::load_vault(&root, self.owner.as_deref())?;
        let store = FileStore::open(&vault);
        Ok(Session {
            vault,
            store,
            json: self.json,
        })
    }
}

/// An opened vault and its owner's store for the duration of one command
struct Session {
    vault: Vault,
    store: FileStore,
    json: bool,
}

impl Session {
    fn date_format(&self) -> &str {
        &self.vault.config.display.date_format
    }

    /// The store for a mutating command. Holds the vault lock until the
    /// command ends.
    fn writer(&mut self) -> Result<&mut FileStore, StoreError> {
        self.store.lock()?;
        Ok(&mut self.store)
    }
}

fn start_dir(vault_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match vault_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
