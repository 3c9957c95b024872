use std::fs::remove_file;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::model::file_types::FileCategory;
use crate::model::repository::FileRecord;
use crate::repository::{file_repository, initialize_db, open_connection};

/// every test thread gets its own database file, so tests can run in parallel without
/// stepping on each other's data
pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().replace("::", "_")
}

pub fn refresh_db() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    initialize_db().unwrap();
}

pub fn cleanup() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
}

pub fn now() -> NaiveDateTime {
    chrono::offset::Local::now().naive_local()
}

/// a plausible document record; tests override the fields they care about
pub fn file_fixture(workspace_id: u32, name: &str, tags: &[&str]) -> FileRecord {
    FileRecord {
        id: None,
        workspace_id,
        project_id: None,
        folder_id: None,
        name: name.to_string(),
        original_name: format!("{name}.txt"),
        category: FileCategory::Document,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_favorite: false,
        file_size: 10,
        file_path: None,
        thumbnail: None,
        modified_date: now(),
    }
}

pub fn create_file_db_entry(workspace_id: u32, name: &str, tags: &[&str]) -> u32 {
    let connection = open_connection();
    let id = file_repository::create_file(&file_fixture(workspace_id, name, tags), &connection)
        .unwrap();
    connection.close().unwrap();
    id
}
