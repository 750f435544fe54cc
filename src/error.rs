use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Coordinate ({lon}, {lat}) is out of bounds")]
    OutOfBounds { lon: f64, lat: f64 },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

#[derive(Error, Debug)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated grid: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Missing header record: {0}")]
    MissingKey(&'static str),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Node count mismatch: header says {expected}, extent implies {actual}")]
    CountMismatch { expected: usize, actual: usize },
}
