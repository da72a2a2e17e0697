/// Errors that can occur while decoding extension descriptors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse descriptor JSON.
    #[error("failed to parse extension descriptor: {0}")]
    DescriptorParse(#[from] serde_json::Error),

    /// Descriptor parsed but one of its fields is unusable.
    #[error("invalid extension descriptor: {reason}")]
    InvalidDescriptor { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
