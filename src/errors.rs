use astra::Response;
// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, group rules, missing resources) or downstream layers (DB).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// A unique name is already taken.
    Conflict(String),
    /// Group name and secret do not match any group.
    InvalidCredentials,
    /// Geocoding returned nothing usable for the given query.
    GeocodeFailed(String),
    DbError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            ServerError::InvalidCredentials => write!(f, "Group name or secret is incorrect"),
            ServerError::GeocodeFailed(msg) => write!(f, "Location lookup failed: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

