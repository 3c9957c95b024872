use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// the closed category set a file can belong to. Derived from the MIME type at upload
/// time by [crate::service::file_service::determine_category] and not changed afterwards
#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Copy, Clone)]
pub enum FileCategory {
    Document,
    Image,
    Video,
    Audio,
    Archive,
    Other,
}

impl From<&str> for FileCategory {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "document" => Self::Document,
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "archive" => Self::Archive,
            "other" => Self::Other,
            _ => {
                log::warn!(
                    "file category from database {value} does not match any branches in FileCategory#from"
                );
                Self::Other
            }
        }
    }
}

impl ToSql for FileCategory {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        match self {
            Self::Document => Ok("document".into()),
            Self::Image => Ok("image".into()),
            Self::Video => Ok("video".into()),
            Self::Audio => Ok("audio".into()),
            Self::Archive => Ok("archive".into()),
            Self::Other => Ok("other".into()),
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

impl Default for FileCategory {
    fn default() -> Self {
        Self::Other
    }
}
