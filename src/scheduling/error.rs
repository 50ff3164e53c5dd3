use thiserror::Error;

/// Domain error taxonomy for slot computation, availability validation
/// and authorization. Every variant is client-correctable; storage
/// failures travel separately through `DatabaseError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("shift configuration error: {0}")]
    Configuration(String),

    #[error("invalid time format: {0}")]
    InvalidFormat(String),

    #[error("end time must be after start time")]
    InvalidRange,

    #[error("window is not aligned with the configured slots; valid slots: {boundaries}")]
    SlotMisalignment { boundaries: String },

    #[error("conflicts with an existing availability window {start}-{end} on {day}")]
    ScheduleConflict {
        day: String,
        start: String,
        end: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("user {0} is not a professor")]
    RoleMismatch(String),

    #[error("teaching period {0} is not active")]
    InactivePeriod(String),

    #[error("not allowed to act on this professor's availability")]
    Permission,
}
