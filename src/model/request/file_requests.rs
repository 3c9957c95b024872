use rocket::serde::Deserialize;

/// registers a new file's metadata after the blob itself has been uploaded out of band.
/// The display name is derived from `original_name` when `name` is absent, and the
/// category is derived from `mime_type`
#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct CreateFileRequest {
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<u32>,
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<u32>,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "fileSize", default)]
    pub file_size: u64,
    #[serde(rename = "filePath", default)]
    pub file_path: Option<String>,
}

/// partial update for a file record. `name`, `tags` and `is_favorite` are left alone
/// when absent; `project_id` and `folder_id` always replace the stored values so a
/// file can be moved out of a project or folder by sending null
#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct UpdateFileRequest {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<u32>,
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<u32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: Option<bool>,
}
