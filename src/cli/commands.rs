use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ks", about = concat!("keepsake v", env!("CARGO_PKG_VERSION"), " - family records kept in a local vault"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different vault directory
    #[arg(short = 'C', long = "vault-dir", global = true)]
    pub vault_dir: Option<String>,

    /// Read and write another owner's records
    #[arg(long, global = true)]
    pub owner: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new vault in the current directory
    Init(InitArgs),
    /// Add a record from a JSON object
    Add(AddArgs),
    /// Delete a record
    Rm(RmArgs),
    /// Show records on a month/day calendar
    Calendar(CalendarArgs),
    /// Show immunizations grouped by year
    Immunizations,
    /// Show active medications by time of day
    Meds,
    /// Show emergency contacts by priority tier
    Contacts,
    /// Search records by text, category and tag
    Search(SearchArgs),
    /// List every tag in use
    Tags(TagsArgs),
    /// Scheduled messages
    Msg(MsgCmd),
    /// Memory book chapters and pages
    Book(BookCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Vault name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Record args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Record kind (appointment, immunization, medication, contact, document, pet)
    pub kind: String,
    /// Record fields as a JSON object; "id" may be omitted
    #[arg(id = "record_json", value_name = "JSON")]
    pub json: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Record kind
    pub kind: String,
    /// Record ID
    pub id: String,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Record kind to place on the calendar
    #[arg(long, default_value = "appointment")]
    pub kind: String,
    /// Only show records with this category/status
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive substring; "" matches everything)
    pub query: String,
    /// Limit search to one record kind
    #[arg(long)]
    pub kind: Option<String>,
    /// Only match records with this category/status ("all" for any)
    #[arg(long)]
    pub category: Option<String>,
    /// Only match records carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Limit to one record kind
    #[arg(long)]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Message args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct MsgCmd {
    #[command(subcommand)]
    pub action: MsgAction,
}

#[derive(Subcommand)]
pub enum MsgAction {
    /// Write a new message (draft unless --schedule)
    New(MsgNewArgs),
    /// List messages
    List(MsgListArgs),
    /// Schedule a draft for delivery
    Schedule(MsgScheduleArgs),
    /// Mark a message delivered
    Deliver(MsgIdArgs),
    /// Change a message that has not been delivered
    Edit(MsgEditArgs),
    /// Show scheduled messages whose delivery date has arrived
    Due(MsgDueArgs),
}

#[derive(Args)]
pub struct MsgNewArgs {
    /// Who the message is for
    #[arg(long = "to")]
    pub recipient: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub content: String,
    /// Delivery date (YYYY-MM-DD)
    #[arg(long = "on")]
    pub delivery_on: Option<NaiveDate>,
    /// Create the message already scheduled (requires --on)
    #[arg(long)]
    pub schedule: bool,
    /// Tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Args)]
pub struct MsgListArgs {
    /// Filter by status (draft, scheduled, delivered)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct MsgScheduleArgs {
    /// Message ID
    pub id: String,
    /// Delivery date (default: the draft's date, else today)
    #[arg(long = "on")]
    pub delivery_on: Option<NaiveDate>,
}

#[derive(Args)]
pub struct MsgIdArgs {
    /// Message ID
    pub id: String,
}

#[derive(Args)]
pub struct MsgEditArgs {
    /// Message ID
    pub id: String,
    #[arg(long = "to")]
    pub recipient: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long = "on")]
    pub delivery_on: Option<NaiveDate>,
    /// Replace tags (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Remove all tags
    #[arg(long, conflicts_with = "tag")]
    pub clear_tags: bool,
}

#[derive(Args)]
pub struct MsgDueArgs {
    /// Mark every due message delivered
    #[arg(long)]
    pub deliver: bool,
}

// ---------------------------------------------------------------------------
// Memory book args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BookCmd {
    #[command(subcommand)]
    pub action: BookAction,
}

#[derive(Subcommand)]
pub enum BookAction {
    /// Create a chapter
    Chapter(ChapterArgs),
    /// List chapters in order
    Chapters,
    /// Add a page to the end of the book
    Page(PageArgs),
    /// List pages in page order
    Pages(PagesArgs),
    /// Show a page with its previous and next pages
    Show(PageIdArgs),
    /// Change a page
    Edit(PageEditArgs),
    /// Delete a page (other pages keep their numbers)
    RmPage(PageIdArgs),
    /// Delete an empty chapter
    RmChapter(ChapterIdArgs),
    /// Table of contents
    Toc,
}

#[derive(Args)]
pub struct ChapterArgs {
    /// Chapter title
    pub title: String,
    /// Position among chapters (default: after the last)
    #[arg(long)]
    pub order: Option<u32>,
}

#[derive(Args)]
pub struct PageArgs {
    /// Chapter ID
    pub chapter: String,
    /// Page title
    pub title: String,
    #[arg(long, default_value = "")]
    pub content: String,
    /// Date the page is about (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct PagesArgs {
    /// Only pages in this chapter
    #[arg(long)]
    pub chapter: Option<String>,
}

#[derive(Args)]
pub struct PageIdArgs {
    /// Page ID
    pub id: String,
}

#[derive(Args)]
pub struct ChapterIdArgs {
    /// Chapter ID
    pub id: String,
}

#[derive(Args)]
pub struct PageEditArgs {
    /// Page ID
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Move the page to another chapter
    #[arg(long)]
    pub chapter: Option<String>,
}
