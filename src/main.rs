#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

use handler::{
    api_handler::api_version,
    file_handler::{create_file, delete_file, get_file, update_file},
    search_handler::search_files,
    tag_handler::{create_tag, delete_tag, get_tag_names, get_tag_stats, merge_tag, rename_tag},
};

use crate::repository::initialize_db;

mod config;
mod db_migrations;
mod events;
mod handler;
mod model;
mod repository;
mod search;
mod service;
#[cfg(test)]
mod test;

fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().ok();
    initialize_db().unwrap();
    events::collection_change_consumer(|event| async move {
        log::info!("workspace {} collection changed", event.workspace_id);
        true
    });
    rocket::build()
        .mount("/api", routes![api_version])
        .mount(
            "/files",
            routes![
                create_file,
                get_file,
                update_file,
                delete_file,
                search_files
            ],
        )
        .mount(
            "/tags",
            routes![
                get_tag_stats,
                get_tag_names,
                create_tag,
                rename_tag,
                merge_tag,
                delete_tag
            ],
        )
}

#[cfg(test)]
mod api_tests {
    use rocket::http::Status;
    use rocket::local::blocking::Client;

    use super::rocket;

    #[test]
    fn version() {
        let client = Client::tracked(rocket()).expect("Valid Rocket Instance");
        let res = client.get(uri!("/api/version")).dispatch();
        assert_eq!(res.status(), Status::Ok);
        assert_eq!(res.into_string().unwrap(), r#"{"version":"1.0.0"}"#);
    }
}

#[cfg(test)]
mod file_api_tests {
    use rocket::http::Status;
    use rocket::local::blocking::Client;

    use crate::model::api::FileApi;
    use crate::model::response::search_responses::SearchResultsApi;
    use crate::model::response::BasicMessage;
    use crate::test::refresh_db;

    use super::rocket;

    fn client() -> Client {
        Client::tracked(rocket()).unwrap()
    }

    #[test]
    fn create_then_search() {
        refresh_db();
        let client = client();
        let res = client
            .post(uri!("/files"))
            //language=json
            .body(r#"{"workspaceId":1,"originalName":"knife catalog.pdf","mimeType":"application/pdf","tags":["inventory"],"fileSize":4096}"#)
            .dispatch();
        assert_eq!(res.status(), Status::Created);
        let created: FileApi = res.into_json().unwrap();
        assert_eq!(created.name, String::from("knife catalog"));
        let res = client
            .get("/files/search?workspace=1&query=knife&generation=3")
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
        let body: SearchResultsApi = res.into_json().unwrap();
        assert_eq!(body.files.len(), 1);
        assert_eq!(body.files[0].id, created.id);
        assert_eq!(body.total_count, 1);
        assert_eq!(body.generation, Some(3));
    }

    #[test]
    fn create_file_bad_name() {
        refresh_db();
        let client = client();
        let res = client
            .post(uri!("/files"))
            //language=json
            .body(r#"{"workspaceId":1,"originalName":"../bad.pdf","mimeType":"application/pdf","tags":[],"fileSize":10}"#)
            .dispatch();
        assert_eq!(res.status(), Status::BadRequest);
    }

    #[test]
    fn get_file_not_found() {
        refresh_db();
        let client = client();
        let res = client.get(uri!("/files/1234")).dispatch();
        assert_eq!(res.status(), Status::NotFound);
        let body: BasicMessage = res.into_json().unwrap();
        assert_eq!(
            body.message,
            String::from("The file with the passed id could not be found.")
        );
    }

    #[test]
    fn delete_file() {
        refresh_db();
        let client = client();
        let res = client
            .post(uri!("/files"))
            //language=json
            .body(r#"{"workspaceId":1,"originalName":"doomed.txt","mimeType":"text/plain","tags":[],"fileSize":1}"#)
            .dispatch();
        let created: FileApi = res.into_json().unwrap();
        let res = client.delete(format!("/files/{}", created.id)).dispatch();
        assert_eq!(res.status(), Status::NoContent);
        let res = client.get(format!("/files/{}", created.id)).dispatch();
        assert_eq!(res.status(), Status::NotFound);
    }
}
