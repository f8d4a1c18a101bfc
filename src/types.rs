//! Shared types for the cakit application: the crate-wide Result alias and
//! the CLI command surface.
use clap::Subcommand;

use crate::NoteError;

/// A specialized Result type for cakit operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Available subcommands for the cakit application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    Add {
        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Body text of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Background color: a palette name (white, red, orange, yellow,
        /// green, teal, blue, darkblue, purple, pink) or any string
        #[clap(long)]
        color: Option<String>,

        /// Reminder timestamp (RFC 3339, or YYYY-MM-DDTHH:MM treated as UTC)
        #[clap(short, long)]
        reminder: Option<String>,

        /// Tags to attach to the note (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,

        /// Image reference (URL) to attach
        #[clap(short, long)]
        image: Option<String>,

        /// Checklist item; repeat the flag for multiple items
        #[clap(long = "item")]
        items: Vec<String>,
    },

    /// List notes in a view, optionally filtered
    List {
        /// Which collection to show: notes, archive, or trash
        #[clap(short, long, default_value = "notes")]
        view: String,

        /// Case-insensitive substring filter on title, content, and tags
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show note IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// Fuzzy-search active notes by title and content
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note (active or archived)
    Edit {
        /// ID of the note to edit
        id: i64,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New body text for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Replacement tags (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,
    },

    /// Move a note from the active collection to the archive
    Archive {
        /// ID of the note to archive
        id: i64,
    },

    /// Bring an archived or trashed note back to the active collection
    Restore {
        /// ID of the note to restore
        id: i64,
    },

    /// Move a note to the trash
    Delete {
        /// ID of the note to trash
        id: i64,
    },

    /// Permanently remove a note from the trash
    Purge {
        /// ID of the note to remove
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Toggle a checklist item on an active note
    Check {
        /// ID of the note
        id: i64,

        /// ID of the checklist item (shown by `list`)
        item: u32,

        /// Uncheck instead of check
        #[clap(short, long)]
        undo: bool,
    },

    /// Tag registry operations (add, remove, list)
    Tag {
        /// Tag to add to the registry
        #[clap(short, long)]
        add: Option<String>,

        /// Tag to delete from the registry and strip from every note
        #[clap(short, long)]
        remove: Option<String>,
    },
}
