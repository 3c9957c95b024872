#[derive(PartialEq, Debug)]
pub enum GetTagStatsError {
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum CreateTagError {
    /// the title was empty after trimming
    InvalidTitle,
    /// a tag with the same normalized title already exists in the workspace
    AlreadyExists,
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum RenameTagError {
    /// no file in the workspace carries the old title
    TagNotFound,
    /// the new title was empty after trimming
    InvalidTitle,
    /// a distinct tag with the new title already exists; the caller has to merge instead
    TargetExists,
    /// one of the per-file rewrites failed partway through the batch. Files rewritten
    /// before the failure stay rewritten; re-running the same rename is safe
    PartialFailure { updated: u32, total: u32 },
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum MergeTagError {
    /// the target title was empty after trimming
    InvalidTitle,
    /// one of the per-file rewrites failed partway through the batch
    PartialFailure { updated: u32, total: u32 },
    /// an error with the database
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum DeleteTagError {
    /// one of the per-file rewrites failed partway through the batch
    PartialFailure { updated: u32, total: u32 },
    /// an error with the database
    DbError,
}
