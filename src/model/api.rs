use chrono::NaiveDateTime;
use regex::Regex;
use rocket::serde::{Deserialize, Serialize};

use crate::model::file_types::FileCategory;
use crate::model::repository::FileRecord;

/// the wire shape of a file record. What the dashboard UI renders and what update
/// requests are diffed against
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone)]
#[serde(crate = "rocket::serde")]
pub struct FileApi {
    pub id: u32,
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u32>,
    #[serde(rename = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<u32>,
    /// this value may be unsafe, see [`sanitize_file_name`]
    pub name: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    pub tags: Vec<String>,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    #[serde(rename = "fileType")]
    pub file_type: FileCategory,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "modifiedDate")]
    pub modified_date: NaiveDateTime,
}

/// returns a sanitized file name based on [Rocket's file name sanitization](https://api.rocket.rs/master/rocket/fs/struct.FileName.html#sanitization)
/// but with the exception of parentheses being replaced with `leftParenthese` and `rightParenthese` respectively. It's hacky, but parentheses in file
/// names are super common and don't immediately mean it's malicious.
/// will return None if the entire file name is unsafe
pub fn sanitize_file_name(name: &str) -> Option<String> {
    //language=RegExp
    let reserved_name_regex = Regex::new("^CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9]$").unwrap();
    //language=RegExp
    let banned_chars = Regex::new("(^\\.\\.|^\\./)|[/\\\\<>|:&;#?*]").unwrap();
    if reserved_name_regex.is_match(&name.to_uppercase())
        || name.starts_with("..")
        || name.contains("./")
    {
        return None;
    }
    let replaced = banned_chars.replace_all(name, "");
    let replaced = replaced
        .to_string()
        .replace('(', "leftParenthese")
        .replace(')', "rightParenthese");
    Some(replaced)
}

impl From<FileRecord> for FileApi {
    fn from(value: FileRecord) -> Self {
        Self {
            id: value.id.unwrap(),
            workspace_id: value.workspace_id,
            project_id: value.project_id,
            folder_id: value.folder_id,
            name: value.name,
            original_name: value.original_name,
            tags: value.tags,
            is_favorite: value.is_favorite,
            file_type: value.category,
            file_size: value.file_size,
            file_path: value.file_path,
            thumbnail: value.thumbnail,
            modified_date: value.modified_date,
        }
    }
}

#[cfg(test)]
mod sanitize_file_name_tests {
    use crate::model::api::sanitize_file_name;

    #[test]
    fn sanitize_removes_invalid_names() {
        let invalid_names = vec![
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
            "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
            "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
        ];
        for name in invalid_names.iter() {
            assert_eq!(None, sanitize_file_name(name));
        }
    }

    #[test]
    fn sanitize_keeps_file_extension() {
        assert_eq!(Some("test.txt".to_string()), sanitize_file_name("test.txt"));
    }

    // files that are only extensions (like .bashrc) are allowed
    #[test]
    fn sanitize_keeps_files_with_only_extension() {
        assert_eq!(Some(".bashrc".to_string()), sanitize_file_name(".bashrc"));
    }

    #[test]
    fn sanitize_replaces_parentheses() {
        assert_eq!(
            Some("test leftParenthese1rightParenthese.txt".to_string()),
            sanitize_file_name("test (1).txt")
        );
    }

    #[test]
    fn sanitize_removes_path_traversal_attempts() {
        assert_eq!(None, sanitize_file_name("./folders/y.txt"));
        assert_eq!(None, sanitize_file_name("../whatever/a.txt"));
    }
}
