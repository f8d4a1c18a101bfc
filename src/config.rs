use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use which::which;

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where the note collections are stored
    pub data_dir: PathBuf,

    /// Default editor command (for the edit round-trip)
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            editor_command: None,
        }
    }
}

/// Platform data directory plus an app-specific segment, falling back to a
/// dot-directory in the home directory when the platform dir is unknown.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("cakit"))
        .or_else(|| dirs::home_dir().map(|dir| dir.join(".cakit")))
        .unwrap_or_else(|| PathBuf::from(".cakit"))
}

impl Config {
    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        // First try the configured editor
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        // Then try environment variable
        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        // Fall back to platform defaults
        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            // Try common Linux editors
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
