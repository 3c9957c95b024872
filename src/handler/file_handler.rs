use rocket::serde::json::Json;

use crate::model::error::file_errors::{CreateFileError, DeleteFileError, GetFileError, UpdateFileError};
use crate::model::request::file_requests::{CreateFileRequest, UpdateFileRequest};
use crate::model::response::file_responses::{
    CreateFileResponse, DeleteFileResponse, GetFileResponse, UpdateFileResponse,
};
use crate::model::response::BasicMessage;
use crate::service::file_service;

#[post("/", data = "<request>")]
pub fn create_file(request: Json<CreateFileRequest>) -> CreateFileResponse {
    match file_service::create_file(request.into_inner()) {
        Ok(file) => CreateFileResponse::Created(Json::from(file)),
        Err(e) => match e {
            CreateFileError::InvalidName => CreateFileResponse::BadRequest(BasicMessage::new(
                "The file name is empty or contains characters that are not allowed.",
            )),
            CreateFileError::DbError => CreateFileResponse::FileDbError(BasicMessage::new(
                "Failed to save the file record. Check the server logs for details.",
            )),
        },
    }
}

#[get("/<id>")]
pub fn get_file(id: u32) -> GetFileResponse {
    match file_service::get_file(id) {
        Ok(file) => GetFileResponse::Success(Json::from(file)),
        Err(GetFileError::NotFound) => GetFileResponse::FileNotFound(BasicMessage::new(
            "The file with the passed id could not be found.",
        )),
        Err(GetFileError::DbError) => GetFileResponse::FileDbError(BasicMessage::new(
            "Failed to retrieve the file record. Check the server logs for details.",
        )),
    }
}

#[put("/", data = "<request>")]
pub fn update_file(request: Json<UpdateFileRequest>) -> UpdateFileResponse {
    match file_service::update_file(request.into_inner()) {
        Ok(file) => UpdateFileResponse::Success(Json::from(file)),
        Err(e) => match e {
            UpdateFileError::NotFound => UpdateFileResponse::FileNotFound(BasicMessage::new(
                "The file with the passed id could not be found.",
            )),
            UpdateFileError::InvalidName => UpdateFileResponse::BadRequest(BasicMessage::new(
                "The file name is empty or contains characters that are not allowed.",
            )),
            UpdateFileError::DbError => UpdateFileResponse::FileDbError(BasicMessage::new(
                "Failed to update the file record. Check the server logs for details.",
            )),
        },
    }
}

#[delete("/<id>")]
pub fn delete_file(id: u32) -> DeleteFileResponse {
    match file_service::delete_file(id) {
        Ok(()) => DeleteFileResponse::Deleted(()),
        Err(DeleteFileError::NotFound) => DeleteFileResponse::FileNotFound(BasicMessage::new(
            "The file with the passed id could not be found.",
        )),
        Err(DeleteFileError::DbError) => DeleteFileResponse::FileDbError(BasicMessage::new(
            "Failed to delete the file record. Check the server logs for details.",
        )),
    }
}
