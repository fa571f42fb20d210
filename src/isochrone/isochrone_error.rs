use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum IsochroneError {
    Network(String),
    Status(u16, String),
    Parse(String),
    UnexpectedShape(String),
}

impl fmt::Display for IsochroneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsochroneError::Network(msg) => write!(f, "Network error: {msg}"),
            IsochroneError::Status(code, body) => {
                write!(f, "Isochrone provider returned HTTP {code}: {body}")
            }
            IsochroneError::Parse(msg) => write!(f, "JSON parse error: {msg}"),
            IsochroneError::UnexpectedShape(msg) => write!(f, "Unexpected data shape: {msg}"),
        }
    }
}

impl Error for IsochroneError {}
