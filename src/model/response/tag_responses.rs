use rocket::serde::json::Json;

use crate::model::response::{BasicMessage, TagMutationApi, TagStatApi};

#[derive(Responder)]
pub enum GetTagStatsResponse {
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<TagStatApi>>),
}

#[derive(Responder)]
pub enum GetTagNamesResponse {
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<String>>),
}

#[derive(Responder)]
pub enum CreateTagResponse {
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 409, content_type = "json")]
    TagAlreadyExists(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 201, content_type = "json")]
    Created(Json<TagStatApi>),
}

#[derive(Responder)]
pub enum RenameTagResponse {
    #[response(status = 404, content_type = "json")]
    TagNotFound(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 409, content_type = "json")]
    TargetExists(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    PartialFailure(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<TagMutationApi>),
}

#[derive(Responder)]
pub enum MergeTagResponse {
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    PartialFailure(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<TagMutationApi>),
}

#[derive(Responder)]
pub enum DeleteTagResponse {
    #[response(status = 500, content_type = "json")]
    PartialFailure(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    TagDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<TagMutationApi>),
}
