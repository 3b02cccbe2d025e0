//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::{AttachmentFilter, NoteDisplayMode};
use output::OutputFormat;

/// vault - scholar-organized notes with attachments and backups
#[derive(Parser, Debug)]
#[command(name = "vault", version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding vault.db and attachments (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add or list scholars
    Scholar {
        #[command(subcommand)]
        command: ScholarCommand,
    },

    /// Add or list a scholar's categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Add or list a category's subcategories
    Subcategory {
        #[command(subcommand)]
        command: SubcategoryCommand,
    },

    /// Create, inspect, and change notes
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },

    /// List attachments across all notes
    Attachments(AttachmentsArgs),

    /// Search notes by title, body, citation, container, or tag
    Search(SearchArgs),

    /// Show counts and recently updated notes
    Stats(StatsArgs),

    /// Show or set the note display mode
    Display(DisplayArgs),

    /// Export everything to a backup file
    Export(ExportArgs),

    /// Replace ALL data with the contents of a backup file
    Import(ImportArgs),

    /// Check for broken references, orphaned notes, and missing files
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ===========================================
// Corpus Commands
// ===========================================

#[derive(Subcommand, Debug)]
pub enum ScholarCommand {
    /// Add a scholar
    Add(ScholarAddArgs),
    /// List scholars
    Ls(FormatArgs),
}

/// Arguments for `scholar add`
#[derive(Parser, Debug)]
pub struct ScholarAddArgs {
    /// Scholar name
    pub name: String,

    /// Era, e.g. "classical"
    #[arg(long)]
    pub era: Option<String>,

    /// School of jurisprudence
    #[arg(long)]
    pub madhhab: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Add a category under a scholar
    Add(CategoryAddArgs),
    /// List a scholar's categories
    Ls(CategoryLsArgs),
}

/// Arguments for `category add`
#[derive(Parser, Debug)]
pub struct CategoryAddArgs {
    /// Scholar id or name
    pub scholar: String,

    /// Category name
    pub name: String,
}

/// Arguments for `category ls`
#[derive(Parser, Debug)]
pub struct CategoryLsArgs {
    /// Scholar id or name
    pub scholar: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

#[derive(Subcommand, Debug)]
pub enum SubcategoryCommand {
    /// Add a subcategory under a scholar's category
    Add(SubcategoryAddArgs),
    /// List a category's subcategories
    Ls(SubcategoryLsArgs),
}

/// Arguments for `subcategory add`
#[derive(Parser, Debug)]
pub struct SubcategoryAddArgs {
    /// Scholar id or name
    pub scholar: String,

    /// Category name
    pub category: String,

    /// Subcategory name
    pub name: String,
}

/// Arguments for `subcategory ls`
#[derive(Parser, Debug)]
pub struct SubcategoryLsArgs {
    /// Scholar id or name
    pub scholar: String,

    /// Category name
    pub category: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

// ===========================================
// Note Commands
// ===========================================

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// Create a note
    New(NoteNewArgs),
    /// List notes
    Ls(NoteLsArgs),
    /// Show a note with its tags and attachments
    Show(NoteShowArgs),
    /// Change a note's title, body, or citation
    Edit(NoteEditArgs),
    /// Toggle a note's pinned state
    Pin(NoteRefArgs),
    /// Move a note to another container
    Mv(NoteMvArgs),
    /// Delete a note with its tags and attachments
    Rm(NoteRefArgs),
    /// Add a tag to a note
    Tag(NoteTagArgs),
    /// Remove a tag from a note
    Untag(NoteTagArgs),
    /// Attach a file to a note
    Attach(NoteAttachArgs),
}

/// Arguments for `note new`
#[derive(Parser, Debug)]
pub struct NoteNewArgs {
    /// Note title
    #[arg(short = 'T', long)]
    pub title: Option<String>,

    /// Note body (markdown)
    #[arg(short, long)]
    pub body: Option<String>,

    /// Source reference, e.g. "Quran 2:153"
    #[arg(short, long)]
    pub citation: Option<String>,

    /// Container path, e.g. "Ibn Taymiyyah > Aqeedah" (default: General Notes)
    #[arg(short = 'C', long)]
    pub container: Option<String>,

    /// Tag for the note (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Pin the note
    #[arg(long)]
    pub pin: bool,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for `note ls`
#[derive(Parser, Debug)]
pub struct NoteLsArgs {
    /// Only notes in this container
    #[arg(short = 'C', long)]
    pub container: Option<String>,

    /// Only pinned notes
    #[arg(long)]
    pub pinned: bool,

    /// Filter by tag (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for `note show`
#[derive(Parser, Debug)]
pub struct NoteShowArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for `note edit`
#[derive(Parser, Debug)]
pub struct NoteEditArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// New title
    #[arg(short = 'T', long)]
    pub title: Option<String>,

    /// New body
    #[arg(short, long)]
    pub body: Option<String>,

    /// New citation
    #[arg(short, long)]
    pub citation: Option<String>,
}

/// Arguments naming a single note
#[derive(Parser, Debug)]
pub struct NoteRefArgs {
    /// Note ID, ID prefix, or title
    pub note: String,
}

/// Arguments for `note mv`
#[derive(Parser, Debug)]
pub struct NoteMvArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Destination container path
    pub container: String,
}

/// Arguments for `note tag` and `note untag`
#[derive(Parser, Debug)]
pub struct NoteTagArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Tag name
    pub tag: String,
}

/// Arguments for `note attach`
#[derive(Parser, Debug)]
pub struct NoteAttachArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// File to attach
    pub file: PathBuf,
}

// ===========================================
// Other Commands
// ===========================================

/// Output format option shared by listing commands
#[derive(Parser, Debug, Clone, Copy, Default)]
pub struct FormatArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `attachments` command
#[derive(Parser, Debug)]
pub struct AttachmentsArgs {
    /// Match against the display name
    pub query: Option<String>,

    /// Attachment type
    #[arg(long, default_value = "all")]
    pub filter: AttachmentFilter,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `display` command
#[derive(Parser, Debug)]
pub struct DisplayArgs {
    /// New display mode (list, icons, grid, book); prints the current one when omitted
    pub mode: Option<NoteDisplayMode>,
}

/// Arguments for the `export` command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output file, or a directory to place a timestamped backup in
    pub path: PathBuf,

    /// Write the JSON document only, without attachment files
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `import` command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Backup file (.zip or .json)
    pub path: PathBuf,

    /// Confirm that ALL existing data will be replaced
    #[arg(long)]
    pub yes: bool,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
