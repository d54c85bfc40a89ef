use crate::http::error::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid variable {identifier}: expected exactly one matching sensor, found {matches}")]
    InvalidVariable { identifier: String, matches: usize },
}
