use session::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Submitted text matches no campus name exactly.
    #[error("invalid search {query:?}: pick a campus from the list")]
    InvalidSearch { query: String },
    #[error("unknown campus {0:?}")]
    UnknownCampus(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}
