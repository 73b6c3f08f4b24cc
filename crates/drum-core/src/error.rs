use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid chart document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown lane '{lane}' at note {index}")]
    UnknownLane { index: usize, lane: String },

    #[error("Invalid time {time} at note {index}: must be finite and non-negative")]
    InvalidTime { index: usize, time: f64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown lane '{0}'")]
pub struct UnknownLane(pub String);
