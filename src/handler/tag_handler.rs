use rocket::serde::json::Json;

use crate::model::error::tag_errors::{
    CreateTagError, DeleteTagError, GetTagStatsError, MergeTagError, RenameTagError,
};
use crate::model::request::tag_requests::{
    CreateTagRequest, MergeTagRequest, RenameTagRequest, TagFilter, TagSort,
};
use crate::model::response::tag_responses::{
    CreateTagResponse, DeleteTagResponse, GetTagNamesResponse, GetTagStatsResponse,
    MergeTagResponse, RenameTagResponse,
};
use crate::model::response::BasicMessage;
use crate::service::tag_service;

#[get("/?<workspace>&<sort>&<filter>&<include_empty>")]
pub fn get_tag_stats(
    workspace: u32,
    sort: Option<TagSort>,
    filter: Option<TagFilter>,
    include_empty: Option<bool>,
) -> GetTagStatsResponse {
    match tag_service::get_tag_stats(
        workspace,
        sort.unwrap_or_default(),
        filter.unwrap_or_default(),
        include_empty.unwrap_or(false),
    ) {
        Ok(stats) => GetTagStatsResponse::Success(Json::from(stats)),
        Err(GetTagStatsError::DbError) => GetTagStatsResponse::TagDbError(BasicMessage::new(
            "Failed to aggregate tags. Check the server logs for details.",
        )),
    }
}

#[get("/names?<workspace>")]
pub fn get_tag_names(workspace: u32) -> GetTagNamesResponse {
    match tag_service::get_tag_names(workspace) {
        Ok(names) => GetTagNamesResponse::Success(Json::from(names)),
        Err(GetTagStatsError::DbError) => GetTagNamesResponse::TagDbError(BasicMessage::new(
            "Failed to aggregate tags. Check the server logs for details.",
        )),
    }
}

#[post("/", data = "<request>")]
pub fn create_tag(request: Json<CreateTagRequest>) -> CreateTagResponse {
    match tag_service::create_tag(request.into_inner()) {
        Ok(stat) => CreateTagResponse::Created(Json::from(stat)),
        Err(e) => match e {
            CreateTagError::InvalidTitle => CreateTagResponse::BadRequest(BasicMessage::new(
                "The tag title cannot be empty.",
            )),
            CreateTagError::AlreadyExists => CreateTagResponse::TagAlreadyExists(
                BasicMessage::new("A tag with that title already exists in the workspace."),
            ),
            CreateTagError::DbError => CreateTagResponse::TagDbError(BasicMessage::new(
                "Failed to create the tag. Check the server logs for details.",
            )),
        },
    }
}

#[put("/rename", data = "<request>")]
pub fn rename_tag(request: Json<RenameTagRequest>) -> RenameTagResponse {
    match tag_service::rename_tag(request.into_inner()) {
        Ok(result) => RenameTagResponse::Success(Json::from(result)),
        Err(e) => match e {
            RenameTagError::TagNotFound => RenameTagResponse::TagNotFound(BasicMessage::new(
                "No file in the workspace carries the passed tag.",
            )),
            RenameTagError::InvalidTitle => RenameTagResponse::BadRequest(BasicMessage::new(
                "The new tag title cannot be empty.",
            )),
            RenameTagError::TargetExists => RenameTagResponse::TargetExists(BasicMessage::new(
                "A tag with the new title already exists. Merge the tags instead.",
            )),
            RenameTagError::PartialFailure { updated, total } => RenameTagResponse::PartialFailure(
                BasicMessage::new(&format!(
                    "The rename stopped partway: {updated} of {total} files were updated. Rerun the rename to finish the rest."
                )),
            ),
            RenameTagError::DbError => RenameTagResponse::TagDbError(BasicMessage::new(
                "Failed to rename the tag. Check the server logs for details.",
            )),
        },
    }
}

#[put("/merge", data = "<request>")]
pub fn merge_tag(request: Json<MergeTagRequest>) -> MergeTagResponse {
    match tag_service::merge_tag(request.into_inner()) {
        Ok(result) => MergeTagResponse::Success(Json::from(result)),
        Err(e) => match e {
            MergeTagError::InvalidTitle => MergeTagResponse::BadRequest(BasicMessage::new(
                "Tag titles cannot be empty.",
            )),
            MergeTagError::PartialFailure { updated, total } => MergeTagResponse::PartialFailure(
                BasicMessage::new(&format!(
                    "The merge stopped partway: {updated} of {total} files were updated. Rerun the merge to finish the rest."
                )),
            ),
            MergeTagError::DbError => MergeTagResponse::TagDbError(BasicMessage::new(
                "Failed to merge the tags. Check the server logs for details.",
            )),
        },
    }
}

#[delete("/?<workspace>&<title>")]
pub fn delete_tag(workspace: u32, title: String) -> DeleteTagResponse {
    match tag_service::delete_tag(workspace, &title) {
        Ok(result) => DeleteTagResponse::Success(Json::from(result)),
        Err(e) => match e {
            DeleteTagError::PartialFailure { updated, total } => DeleteTagResponse::PartialFailure(
                BasicMessage::new(&format!(
                    "The delete stopped partway: {updated} of {total} files were updated. Rerun the delete to finish the rest."
                )),
            ),
            DeleteTagError::DbError => DeleteTagResponse::TagDbError(BasicMessage::new(
                "Failed to delete the tag. Check the server logs for details.",
            )),
        },
    }
}
