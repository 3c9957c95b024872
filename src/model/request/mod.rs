pub mod file_requests;
pub mod search_requests;
pub mod tag_requests;
