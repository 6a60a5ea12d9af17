use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Channel closed")]
    Closed,
}
