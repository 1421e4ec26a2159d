use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("total travel time is zero; distance-per-time is undefined")]
    ZeroTotalTime,
    #[error("duplicate location: {name}")]
    DuplicateLocation { name: String },
    #[error("line {line}: unknown location `{name}`")]
    UnknownLocation { line: usize, name: String },
    #[error("travel time must be finite and non-negative, got {time}")]
    InvalidTravelTime { time: f64 },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The two endpoints of a trial coincide, so there is no direction to move along.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("endpoints coincide at ({x:.3}, {y:.3})")]
pub struct DegenerateGeometry {
    pub x: f64,
    pub y: f64,
}
