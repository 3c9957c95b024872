use std::backtrace::Backtrace;

use crate::events;
use crate::model::api::{sanitize_file_name, FileApi};
use crate::model::error::file_errors::{
    CreateFileError, DeleteFileError, GetFileError, UpdateFileError,
};
use crate::model::file_types::FileCategory;
use crate::model::repository::FileRecord;
use crate::model::request::file_requests::{CreateFileRequest, UpdateFileRequest};
use crate::repository::{file_repository, open_connection};
use crate::search::dedupe_tags;

/// maps a MIME type onto the closed category set. Done once at creation; the category
/// never changes afterwards
pub fn determine_category(mime_type: &str) -> FileCategory {
    let mime = mime_type.trim().to_ascii_lowercase();
    let archive_types = [
        "application/zip",
        "application/gzip",
        "application/x-tar",
        "application/x-7z-compressed",
        "application/x-rar-compressed",
        "application/x-bzip2",
    ];
    let document_types = [
        "application/pdf",
        "application/json",
        "application/xml",
        "application/rtf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/vnd.ms-powerpoint",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ];
    if mime.starts_with("image/") {
        FileCategory::Image
    } else if mime.starts_with("video/") {
        FileCategory::Video
    } else if mime.starts_with("audio/") {
        FileCategory::Audio
    } else if archive_types.contains(&mime.as_str()) {
        FileCategory::Archive
    } else if mime.starts_with("text/") || document_types.contains(&mime.as_str()) {
        FileCategory::Document
    } else {
        FileCategory::Other
    }
}

/// strips the extension off an uploaded name to seed the display name. Extension-only
/// names like `.bashrc` stay whole
pub fn derive_display_name(original_name: &str) -> String {
    match original_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => original_name.to_string(),
    }
}

pub fn create_file(request: CreateFileRequest) -> Result<FileApi, CreateFileError> {
    let original_name = match sanitize_file_name(request.original_name.trim()) {
        Some(name) if !name.is_empty() => name,
        _ => return Err(CreateFileError::InvalidName),
    };
    let name = match request.name {
        Some(name) if !name.trim().is_empty() => match sanitize_file_name(name.trim()) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(CreateFileError::InvalidName),
        },
        _ => derive_display_name(&original_name),
    };
    let mut record = FileRecord {
        id: None,
        workspace_id: request.workspace_id,
        project_id: request.project_id,
        folder_id: request.folder_id,
        name,
        original_name,
        category: determine_category(&request.mime_type),
        tags: dedupe_tags(request.tags),
        is_favorite: false,
        file_size: request.file_size,
        file_path: request.file_path,
        thumbnail: None,
        modified_date: chrono::offset::Local::now().naive_local(),
    };
    let con = open_connection();
    let id = match file_repository::create_file(&record, &con) {
        Ok(id) => id,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to create file record. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(CreateFileError::DbError);
        }
    };
    con.close().unwrap();
    record.id = Some(id);
    events::publish_collection_changed(record.workspace_id);
    Ok(record.into())
}

pub fn get_file(id: u32) -> Result<FileApi, GetFileError> {
    let con = open_connection();
    let record = match file_repository::get_file(id, &con) {
        Ok(record) => record,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            con.close().unwrap();
            return Err(GetFileError::NotFound);
        }
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to retrieve file {id}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(GetFileError::DbError);
        }
    };
    con.close().unwrap();
    Ok(record.into())
}

pub fn update_file(request: UpdateFileRequest) -> Result<FileApi, UpdateFileError> {
    let con = open_connection();
    let mut record = match file_repository::get_file(request.id, &con) {
        Ok(record) => record,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            con.close().unwrap();
            return Err(UpdateFileError::NotFound);
        }
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to retrieve file {} for update. Exception is {e:?}\n{}",
                request.id,
                Backtrace::force_capture()
            );
            return Err(UpdateFileError::DbError);
        }
    };
    if let Some(name) = request.name {
        match sanitize_file_name(name.trim()) {
            Some(name) if !name.is_empty() => record.name = name,
            _ => {
                con.close().unwrap();
                return Err(UpdateFileError::InvalidName);
            }
        }
    }
    record.project_id = request.project_id;
    record.folder_id = request.folder_id;
    if let Some(tags) = request.tags {
        record.tags = dedupe_tags(tags);
    }
    if let Some(is_favorite) = request.is_favorite {
        record.is_favorite = is_favorite;
    }
    record.modified_date = chrono::offset::Local::now().naive_local();
    match file_repository::update_file(&record, &con) {
        Ok(()) => {}
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to update file {}. Exception is {e:?}\n{}",
                request.id,
                Backtrace::force_capture()
            );
            return Err(UpdateFileError::DbError);
        }
    };
    con.close().unwrap();
    events::publish_collection_changed(record.workspace_id);
    Ok(record.into())
}

pub fn delete_file(id: u32) -> Result<(), DeleteFileError> {
    let con = open_connection();
    // pull the record first so we know which workspace to broadcast for
    let record = match file_repository::get_file(id, &con) {
        Ok(record) => record,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            con.close().unwrap();
            return Err(DeleteFileError::NotFound);
        }
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to retrieve file {id} for delete. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(DeleteFileError::DbError);
        }
    };
    match file_repository::delete_file(id, &con) {
        Ok(()) => {}
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to delete file {id}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(DeleteFileError::DbError);
        }
    };
    con.close().unwrap();
    events::publish_collection_changed(record.workspace_id);
    Ok(())
}

#[cfg(test)]
mod determine_category_tests {
    use crate::model::file_types::FileCategory;
    use crate::service::file_service::determine_category;

    #[test]
    fn maps_mime_prefixes() {
        assert_eq!(FileCategory::Image, determine_category("image/png"));
        assert_eq!(FileCategory::Video, determine_category("video/mp4"));
        assert_eq!(FileCategory::Audio, determine_category("audio/flac"));
        assert_eq!(FileCategory::Document, determine_category("text/plain"));
    }

    #[test]
    fn maps_archive_and_document_types() {
        assert_eq!(FileCategory::Archive, determine_category("application/zip"));
        assert_eq!(
            FileCategory::Document,
            determine_category("application/pdf")
        );
    }

    #[test]
    fn unknown_types_fall_back_to_other() {
        assert_eq!(
            FileCategory::Other,
            determine_category("application/octet-stream")
        );
        assert_eq!(FileCategory::Other, determine_category(""));
    }
}

#[cfg(test)]
mod derive_display_name_tests {
    use crate::service::file_service::derive_display_name;

    #[test]
    fn strips_the_last_extension() {
        assert_eq!("report", derive_display_name("report.pdf"));
        assert_eq!("archive.tar", derive_display_name("archive.tar.gz"));
    }

    #[test]
    fn keeps_extension_only_names() {
        assert_eq!(".bashrc", derive_display_name(".bashrc"));
    }

    #[test]
    fn keeps_extensionless_names() {
        assert_eq!("README", derive_display_name("README"));
    }
}



#[cfg(test)]
mod delete_file_tests {
    use crate::model::error::file_errors::{DeleteFileError, GetFileError};
    use crate::service::file_service::{delete_file, get_file};
    use crate::test::{cleanup, create_file_db_entry, refresh_db};

    #[test]
    fn delete_file_works() {
        refresh_db();
        let id = create_file_db_entry(1, "doomed", &[]);
        delete_file(id).unwrap();
        assert_eq!(Err(GetFileError::NotFound), get_file(id));
        cleanup();
    }

    #[test]
    fn delete_file_not_found() {
        refresh_db();
        assert_eq!(Err(DeleteFileError::NotFound), delete_file(1));
        cleanup();
    }
}
