use rocket::serde::json::Json;

use crate::model::error::file_errors::SearchFileError;
use crate::model::request::search_requests::{SearchRequest, ViewFilter};
use crate::model::response::search_responses::SearchFilesResponse;
use crate::model::response::BasicMessage;
use crate::service::search_service;

#[get("/search?<workspace>&<query>&<tags>&<view>&<generation>")]
pub fn search_files(
    workspace: u32,
    query: Option<String>,
    tags: Vec<String>,
    view: Option<ViewFilter>,
    generation: Option<u64>,
) -> SearchFilesResponse {
    let request = SearchRequest {
        workspace_id: workspace,
        query,
        tags,
        view: view.unwrap_or_default(),
        generation,
    };
    match search_service::search_files(request) {
        Ok(results) => SearchFilesResponse::Success(Json::from(results)),
        Err(SearchFileError::DbError) => SearchFilesResponse::FileDbError(BasicMessage::new(
            "Failed to search files. Check the server logs for details.",
        )),
    }
}
