use crate::overlap::ResourceConflict;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("{0}")]
    Conflict(#[from] ResourceConflict),

    #[error("Trip {0} already exists")]
    DuplicateTrip(String),

    #[error("Trip not found: {0}")]
    NotFound(String),

    #[error("Conflict not found: {0}")]
    ConflictNotFound(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
