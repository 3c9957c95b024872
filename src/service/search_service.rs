use std::backtrace::Backtrace;

use itertools::Itertools;

use crate::config::FILE_DASHBOARD_CONFIG;
use crate::model::error::file_errors::SearchFileError;
use crate::model::request::search_requests::SearchRequest;
use crate::model::response::search_responses::SearchResultsApi;
use crate::repository::{file_repository, open_connection};
use crate::search::{build_search_spec, normalize, rank::rank};

/// runs a full search pass for one workspace: query spec, tag intersection, view filter,
/// ranking, and the result cap. `total_count` always reflects the uncapped match count
pub fn search_files(request: SearchRequest) -> Result<SearchResultsApi, SearchFileError> {
    let spec = match request.query {
        Some(query) => build_search_spec(&query),
        None => None,
    };
    let selected_tags: Vec<String> = request
        .tags
        .iter()
        .map(|tag| normalize(tag))
        .filter(|tag| !tag.is_empty())
        .unique()
        .collect();
    let limit = FILE_DASHBOARD_CONFIG.search.result_limit;
    let con = open_connection();
    let mut files = match file_repository::search_files(
        request.workspace_id,
        spec.as_ref(),
        &selected_tags,
        request.view,
        limit,
        &con,
    ) {
        Ok(files) => files,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to search files for workspace {}. Exception is {e:?}\n{}",
                request.workspace_id,
                Backtrace::force_capture()
            );
            return Err(SearchFileError::DbError);
        }
    };
    let total_count = match file_repository::count_search_files(
        request.workspace_id,
        spec.as_ref(),
        &selected_tags,
        request.view,
        &con,
    ) {
        Ok(count) => count,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to count search results for workspace {}. Exception is {e:?}\n{}",
                request.workspace_id,
                Backtrace::force_capture()
            );
            return Err(SearchFileError::DbError);
        }
    };
    con.close().unwrap();
    // without a query the repository order (newest first) already is the ranking
    if let Some(spec) = &spec {
        rank(&mut files, spec);
    }
    Ok(SearchResultsApi {
        files: files.into_iter().map(|f| f.into()).collect(),
        total_count,
        generation: request.generation,
    })
}
