use chrono::NaiveDateTime;

use super::file_types::FileCategory;

/// name prefix used by the zero-byte placeholder records that register a tag before any
/// real file carries it. Placeholder records are invisible to search and excluded from
/// tag usage counts
pub static TAG_PLACEHOLDER_PREFIX: &str = ".tag-";

/// a single file's metadata row. Tags live embedded on the record as an array; there is
/// no separate tag table anywhere in the schema
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Debug, Clone, Eq, Hash)]
// for testing we have to ignore the modified_date field when doing equality checking otherwise it's an inconsistent pita
#[cfg_attr(not(test), derive(PartialEq))]
pub struct FileRecord {
    /// the id, will only be populated when pulled from the database
    pub id: Option<u32>,
    /// the workspace this record is scoped to; every query filters on it
    pub workspace_id: u32,
    pub project_id: Option<u32>,
    pub folder_id: Option<u32>,
    /// display name; derived from [`original_name`](Self::original_name) once at creation
    /// and independently editable afterwards
    pub name: String,
    /// the name the file was uploaded with, extension included. Never changes
    pub original_name: String,
    pub category: FileCategory,
    /// display-cased tag strings. No two entries are ever equal under trim+lowercase
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub file_size: u64,
    pub file_path: Option<String>,
    pub thumbnail: Option<String>,
    /// bumped on every write; recency signal for ranking and the `recent` view
    pub modified_date: NaiveDateTime,
}

#[cfg(test)]
impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.workspace_id == other.workspace_id
            && self.project_id == other.project_id
            && self.folder_id == other.folder_id
            && self.name == other.name
            && self.original_name == other.original_name
            && self.category == other.category
            && self.tags == other.tags
            && self.is_favorite == other.is_favorite
            && self.file_size == other.file_size
            && self.file_path == other.file_path
            && self.thumbnail == other.thumbnail
    }
}

impl FileRecord {
    /// whether this record is a zero-byte placeholder created only to register a tag name
    pub fn is_tag_placeholder(&self) -> bool {
        self.file_size == 0 && self.name.starts_with(TAG_PLACEHOLDER_PREFIX)
    }
}
