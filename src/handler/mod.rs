pub mod api_handler;
pub mod file_handler;
pub mod search_handler;
pub mod tag_handler;
