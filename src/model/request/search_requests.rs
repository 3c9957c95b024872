/// which slice of the workspace a search runs against before any text matching
#[derive(FromFormField, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Favorites,
    /// files modified within the last 7 days
    Recent,
}

/// everything a single search round trip needs. Assembled by the handler from query
/// parameters; not persisted anywhere
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub workspace_id: u32,
    /// free text; ignored entirely when shorter than 2 trimmed characters
    pub query: Option<String>,
    /// selected tags, ANDed together (intersection), independent from the free-text matching
    pub tags: Vec<String>,
    pub view: ViewFilter,
    /// opaque client token echoed back in the response so callers can discard
    /// responses that no longer match their latest request
    pub generation: Option<u64>,
}
