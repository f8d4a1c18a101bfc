//! cakit note-keeping library
//!
//! This library provides the note lifecycle core: creating, editing,
//! archiving, trashing, searching, and tagging notes, persisted as JSON
//! collections in a local data directory.

mod cli;
mod config;
mod errors;
mod helper;
mod manager;
mod note;
mod query;
mod store;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use manager::*;
pub use note::*;
pub use query::*;
pub use store::*;
pub use types::*;
