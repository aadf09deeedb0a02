use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed table data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to replace table file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
