/// Result alias that carries the custom [`FolioError`] type.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// Free-form message for conditions that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The content document could not be fetched.
    #[error("failed to load content from `{path}`: {reason}")]
    ContentLoad { path: String, reason: String },
    /// The content document parsed but does not have the expected shape.
    #[error("malformed content: {0}")]
    MalformedContent(&'static str),
    /// A scroll-linked transform was configured with unusable breakpoints.
    #[error("invalid breakpoints: {0}")]
    InvalidBreakpoints(&'static str),
    /// A reveal schedule whose delays would not be ordered by index.
    #[error("invalid reveal schedule: {0}")]
    InvalidSchedule(&'static str),
    /// A layout lookup referenced an element that was never placed.
    #[error("unknown element `{0}`")]
    UnknownElement(String),
}

impl FolioError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Whether the error belongs to the content taxonomy that degrades to an
    /// empty project list instead of surfacing to the visitor.
    pub fn is_content_failure(&self) -> bool {
        matches!(
            self,
            Self::ContentLoad { .. } | Self::MalformedContent(_) | Self::Json(_)
        )
    }
}

impl From<&str> for FolioError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for FolioError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
