pub mod file_errors;
pub mod tag_errors;
