use rocket::serde::json::Json;

use crate::model::response::api_responses::VersionApi;

#[get("/version")]
pub fn api_version() -> Json<VersionApi> {
    Json::from(VersionApi {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
