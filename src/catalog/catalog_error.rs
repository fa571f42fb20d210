use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    Network(String),
    /// The API answered with an error message instead of data.
    Api(String),
    JsonParse(String),
    Store(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(msg) => write!(f, "Network error: {msg}"),
            CatalogError::Api(msg) => write!(f, "Station API error: {msg}"),
            CatalogError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            CatalogError::Store(msg) => write!(f, "Saving catalog failed: {msg}"),
        }
    }
}

impl Error for CatalogError {}
