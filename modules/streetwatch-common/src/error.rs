use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreetWatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
