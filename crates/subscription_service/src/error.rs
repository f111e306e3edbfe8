use models::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Subscription not found: {0}")]
    NotFound(u32),

    #[error("No free subscription id left")]
    IdsExhausted,

    #[error("Invalid subscription: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
