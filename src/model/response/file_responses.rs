use rocket::serde::json::Json;

use crate::model::api::FileApi;
use crate::model::response::BasicMessage;

pub type NoContent = ();

#[derive(Responder)]
pub enum CreateFileResponse {
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 201, content_type = "json")]
    Created(Json<FileApi>),
}

#[derive(Responder)]
pub enum GetFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FileApi>),
}

#[derive(Responder)]
pub enum UpdateFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FileApi>),
}

#[derive(Responder)]
pub enum DeleteFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 204)]
    Deleted(NoContent),
}
