use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoatError {
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("database write failed: {0}")]
    Write(#[source] sqlx::Error),

    #[error("database read failed: {0}")]
    Read(#[source] sqlx::Error),

    #[error("note not found: {0}")]
    NotFound(String),

    #[error("invalid reorder: {0}")]
    InvalidReorder(String),
}

pub type NoatResult<T> = Result<T, NoatError>;
