use thiserror::Error;
use tokio::runtime::TryCurrentError;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("CsvError: {0}")]
    Csv(#[from] csv::Error),
    #[error("InvalidConfig: {0}")]
    InvalidConfig(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("RuntimeUnavailable: {0}")]
    RuntimeUnavailable(#[from] TryCurrentError),
}
