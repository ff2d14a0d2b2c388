use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A loaded source file and its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            filename: None,
            filepath: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a document with file metadata (used by the CLI when loading from disk)
    pub fn with_file_info(title: String, content: String, filepath: String, filename: String) -> Self {
        let mut doc = Self::new(title, content);
        doc.filepath = Some(filepath);
        doc.filename = Some(filename);
        doc
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Replace the content snapshot with the current buffer state
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}
