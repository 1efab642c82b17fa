use thiserror::Error;

pub type Result<T> = std::result::Result<T, NominatimError>;

#[derive(Debug, Error)]
pub enum NominatimError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No results for \"{0}\"")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NominatimError {
    fn from(err: reqwest::Error) -> Self {
        NominatimError::Network(err.to_string())
    }
}
