use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

pub mod api_responses;
pub mod file_responses;
pub mod search_responses;
pub mod tag_responses;

/// represents a basic json message
#[derive(Responder, Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct BasicMessage {
    pub message: String,
}

/// one entry of the tag-management panel: a distinct tag plus its usage statistics over
/// the workspace. Tags have no table of their own, so this is always derived
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct TagStatApi {
    pub tag: String,
    /// how many real (non-placeholder) files carry the tag
    pub count: u32,
    /// the ids of those files
    pub files: Vec<u32>,
    /// deterministic display color; a pure function of the tag string
    pub color: String,
}

/// result of a bulk tag rewrite (rename/merge/delete): how many files were updated
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(crate = "rocket::serde")]
pub struct TagMutationApi {
    pub updated: u32,
}

// ----------------------------------

impl BasicMessage {
    pub fn new(message: &str) -> Json<BasicMessage> {
        Json::from(BasicMessage {
            message: message.to_string(),
        })
    }
}

impl From<&str> for BasicMessage {
    fn from(value: &str) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<String> for BasicMessage {
    fn from(value: String) -> Self {
        Self { message: value }
    }
}
