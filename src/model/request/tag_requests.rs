use rocket::serde::Deserialize;

#[derive(FromFormField, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TagSort {
    #[default]
    Name,
    /// usage count, descending
    Count,
    /// most recently modified file carrying the tag, descending
    Recent,
}

#[derive(FromFormField, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    /// tags carried by at least one real file
    Used,
    /// registered tags no real file carries
    Unused,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct CreateTagRequest {
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
    pub title: String,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct RenameTagRequest {
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
    #[serde(rename = "oldTitle")]
    pub old_title: String,
    #[serde(rename = "newTitle")]
    pub new_title: String,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct MergeTagRequest {
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
    pub source: String,
    pub target: String,
}
