use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("cannot extract a domain from '{0}'")]
    InvalidUrl(String),

    #[error("external link from page {0} has no destination url")]
    MissingExternalUrl(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spill codec error: {0}")]
    SpillCodec(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
