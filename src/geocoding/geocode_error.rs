use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    Status(u16),
    Parse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Network(msg) => write!(f, "Network error: {msg}"),
            GeocodeError::Status(code) => write!(f, "Geocoder returned HTTP {code}"),
            GeocodeError::Parse(msg) => write!(f, "Unreadable geocoder response: {msg}"),
        }
    }
}

impl Error for GeocodeError {}
