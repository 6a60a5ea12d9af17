use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum AttemptsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Attempt {0} is not in the table")]
    NotFound(i32),

    #[error("Attempt {0} is not visible to this viewer")]
    Forbidden(i32),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AttemptsError>;
