#[derive(PartialEq, Debug)]
pub enum CreateFileError {
    /// the original name was empty or entirely unsafe
    InvalidName,
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum GetFileError {
    /// the file was not found
    NotFound,
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum UpdateFileError {
    /// no file with that id can be found
    NotFound,
    /// the new display name was empty or entirely unsafe
    InvalidName,
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum DeleteFileError {
    /// the file was not found
    NotFound,
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum SearchFileError {
    /// an error with the database
    DbError,
}
