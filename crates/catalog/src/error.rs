#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("campus dataset is not valid JSON: {0}")]
    Parse(String),
    #[error("campus #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate campus name {name:?} (records #{first} and #{second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
    #[error("campus {name:?} has an invalid coordinate ({longitude}, {latitude})")]
    InvalidCoordinate {
        name: String,
        longitude: f64,
        latitude: f64,
    },
    #[error("campus dataset too large: {0} records")]
    TooLarge(usize),
    #[error("campus dataset io error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}
