//! CLI module for the cakit application
//!
//! This module handles the command-line interface for interacting with the
//! note collections through the manager's public API. All mutation goes
//! through [`NoteManager`]; this layer only collects input and renders
//! output.
use std::io::{stdin, stdout, Write};
use std::process::Command;

use console::style;
use log::info;
use shell_words::split;
use tempfile::Builder;

use crate::{
    filter_notes, parse_reminder, parse_tags, resolve_color, search_notes, Commands, Config, Note,
    NoteDraft, NoteError, NoteManager, Result, ViewKind,
};

/// CLI application handler - maps parsed commands onto manager operations.
pub struct App {
    manager: NoteManager,
    config: Config,
    verbose: bool,
}

impl App {
    pub fn new(manager: NoteManager, config: Config, verbose: bool) -> Self {
        Self {
            manager,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                content,
                color,
                reminder,
                tags,
                image,
                items,
            } => self.handle_add(title, content, color, reminder, tags, image, items)?,

            Commands::List {
                view,
                search,
                json,
                brief,
            } => self.handle_list(&view, search, json, brief)?,

            Commands::Search { query, limit, json } => self.handle_search(&query, limit, json)?,

            Commands::Edit {
                id,
                title,
                content,
                tags,
            } => self.handle_edit(id, title, content, tags)?,

            Commands::Archive { id } => {
                if self.manager.archive_note(id)? {
                    println!("Note {} archived", id);
                } else {
                    println!("Note {} is not in the active collection", id);
                }
            }

            Commands::Restore { id } => {
                if self.manager.restore_note(id)? {
                    println!("Note {} restored to the active collection", id);
                } else {
                    println!("Note {} is not archived or trashed", id);
                }
            }

            Commands::Delete { id } => {
                if self.manager.delete_note(id)? {
                    println!("Note {} moved to trash", id);
                } else {
                    println!("Note {} not found", id);
                }
            }

            Commands::Purge { id, force } => self.handle_purge(id, force)?,

            Commands::Check { id, item, undo } => {
                if self.manager.update_checklist_item(id, item, !undo)? {
                    println!(
                        "Item {} on note {} {}",
                        item,
                        id,
                        if undo { "unchecked" } else { "checked" }
                    );
                } else {
                    println!("No such checklist item on an active note");
                }
            }

            Commands::Tag { add, remove } => self.handle_tag(add, remove)?,
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_add(
        &mut self,
        title: String,
        content: Option<String>,
        color: Option<String>,
        reminder: Option<String>,
        tags: Option<String>,
        image: Option<String>,
        items: Vec<String>,
    ) -> Result<()> {
        let reminder = reminder.as_deref().map(parse_reminder).transpose()?;

        let draft = NoteDraft {
            title,
            content: content.unwrap_or_default(),
            color: color.as_deref().map(resolve_color),
            reminder,
            tags: parse_tags(tags),
            image,
            checklist: items.into_iter().map(|text| (text, false)).collect(),
        };

        match self.manager.create_note(draft)? {
            Some(id) => println!("Note created with ID: {}", id),
            None => println!("Nothing to save: title, content, and checklist are all empty"),
        }
        Ok(())
    }

    fn handle_list(
        &self,
        view: &str,
        search: Option<String>,
        json: bool,
        brief: bool,
    ) -> Result<()> {
        let view = ViewKind::from_name(view);
        let collection = self.manager.collection(view);

        let notes: Vec<&Note> = match &search {
            Some(term) => filter_notes(collection, term),
            None => collection.iter().collect(),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes found in {}", view.name());
            return Ok(());
        }

        if self.verbose {
            info!("Rendering {} notes from {}", notes.len(), view.name());
        }
        for note in notes {
            self.render_note(note, brief);
        }
        Ok(())
    }

    fn render_note(&self, note: &Note, brief: bool) {
        println!(
            "{}  {}",
            style(note.id).dim(),
            style(&note.title).bold()
        );
        if brief {
            return;
        }

        if !note.content.is_empty() {
            println!("    {}", note.content);
        }
        for item in &note.checklist {
            let mark = if item.checked { "[x]" } else { "[ ]" };
            println!("    {} {} {}", style(item.id).dim(), mark, item.text);
        }
        if !note.tags.is_empty() {
            println!("    {}", style(note.tags.join(", ")).cyan());
        }
        if let Some(reminder) = note.reminder {
            println!("    {}", style(format!("Reminder: {}", reminder)).yellow());
        }
        println!(
            "    {}",
            style(note.created_at.format("%Y-%m-%d %H:%M")).dim()
        );
    }

    fn handle_search(&self, query: &str, limit: usize, json: bool) -> Result<()> {
        let mut hits = search_notes(self.manager.notes(), query);
        hits.truncate(limit);

        if json {
            println!("{}", serde_json::to_string_pretty(&hits)?);
            return Ok(());
        }

        if hits.is_empty() {
            println!("No notes match '{}'", query);
            return Ok(());
        }
        for note in hits {
            self.render_note(note, true);
        }
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
        tags: Option<String>,
    ) -> Result<()> {
        let Some(session) = self.manager.begin_edit(id) else {
            println!("Note {} not found (trashed notes cannot be edited)", id);
            return Ok(());
        };

        let open_editor = title.is_none() && content.is_none() && tags.is_none();
        let mut draft = session.draft().clone();

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(content) = content {
            draft.content = content;
        } else if open_editor {
            draft.content = self.open_editor_for_content(&draft.content)?;
        }
        if let Some(tags) = tags {
            draft.tags = parse_tags(Some(tags));
        }

        match self.manager.commit_edit(session, draft)? {
            Some(new_id) => println!("Note {} updated (new ID: {})", id, new_id),
            None => println!("Edit discarded: the note would be empty"),
        }
        Ok(())
    }

    /// Round-trips content through the user's editor via a temp file.
    fn open_editor_for_content(&self, current: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".txt").tempfile()?;
        std::fs::write(temp_file.path(), current)?;

        let editor_cmd = self.config.get_editor_command();
        let parts = split(&editor_cmd).map_err(|e| NoteError::EditorError {
            message: format!("Failed to parse editor command '{}': {}", editor_cmd, e),
        })?;
        let (program, args) = parts.split_first().ok_or_else(|| NoteError::EditorError {
            message: "Editor command is empty".to_string(),
        })?;

        let status = Command::new(program)
            .args(args)
            .arg(temp_file.path())
            .status()
            .map_err(|e| NoteError::EditorError {
                message: format!("Failed to launch editor '{}': {}", editor_cmd, e),
            })?;
        if !status.success() {
            return Err(NoteError::EditorError {
                message: format!("Editor exited with status {}", status),
            });
        }

        Ok(std::fs::read_to_string(temp_file.path())?)
    }

    fn handle_purge(&mut self, id: i64, force: bool) -> Result<()> {
        if !force {
            print!("Permanently delete note {}? This cannot be undone [y/N]: ", id);
            stdout().flush()?;
            let mut answer = String::new();
            stdin().read_line(&mut answer)?;
            if !answer.trim().eq_ignore_ascii_case("y") {
                println!("Aborted");
                return Ok(());
            }
        }

        if self.manager.delete_note_permanently(id)? {
            println!("Note {} permanently deleted", id);
        } else {
            println!("Note {} is not in the trash", id);
        }
        Ok(())
    }

    fn handle_tag(&mut self, add: Option<String>, remove: Option<String>) -> Result<()> {
        if let Some(name) = add {
            if self.manager.add_tag(&name)? {
                println!("Tag '{}' added", name.trim());
            } else {
                println!("Tag '{}' is empty or already exists", name.trim());
            }
            return Ok(());
        }

        if let Some(name) = remove {
            if self.manager.delete_tag(&name)? {
                println!("Tag '{}' deleted", name);
            } else {
                println!("Tag '{}' is not registered", name);
            }
            return Ok(());
        }

        if self.manager.tags().is_empty() {
            println!("No tags registered");
            return Ok(());
        }
        for tag in self.manager.tags() {
            println!(
                "{}  {}",
                style(tag).cyan(),
                style(format!("{} notes", self.manager.tag_usage(tag))).dim()
            );
        }
        Ok(())
    }
}
