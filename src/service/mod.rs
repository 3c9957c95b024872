pub mod file_service;
pub mod search_service;
pub mod tag_service;
