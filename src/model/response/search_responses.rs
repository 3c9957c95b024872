use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::model::api::FileApi;
use crate::model::response::BasicMessage;

/// a single page of ranked search results. `total_count` is the true match count; when
/// it exceeds the result cap the UI shows "top {files.len()} of {total_count}"
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct SearchResultsApi {
    pub files: Vec<FileApi>,
    #[serde(rename = "totalCount")]
    pub total_count: u32,
    /// echo of the caller's request token, see [crate::model::request::search_requests::SearchRequest]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
}

#[derive(Responder)]
pub enum SearchFilesResponse {
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<SearchResultsApi>),
}
