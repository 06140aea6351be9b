pub type ClipResult<T> = Result<T, ClipError>;

#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("unsupported property: {0}")]
    UnsupportedProperty(String),

    #[error("invalid roi: {0}")]
    InvalidRoi(String),

    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    #[error("feature error: {0}")]
    Feature(String),

    #[error("media error: {0}")]
    Media(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn unsupported_property(msg: impl Into<String>) -> Self {
        Self::UnsupportedProperty(msg.into())
    }

    pub fn invalid_roi(msg: impl Into<String>) -> Self {
        Self::InvalidRoi(msg.into())
    }

    pub fn size_mismatch(msg: impl Into<String>) -> Self {
        Self::SizeMismatch(msg.into())
    }

    pub fn feature(msg: impl Into<String>) -> Self {
        Self::Feature(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
