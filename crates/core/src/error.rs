/// Result alias that carries the custom [`ChoreographyError`] type.
pub type Result<T> = std::result::Result<T, ChoreographyError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ChoreographyError {
    /// Free-form failure surfaced to the command line driver.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// PNG encoding failed.
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
    /// Configuration or script file could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// A trail color string is not a valid CSS color.
    #[error("invalid color `{input}`: {source}")]
    Color {
        input: String,
        #[source]
        source: csscolorparser::ParseColorError,
    },
    /// An export was requested before anything was recorded.
    #[error("nothing recorded yet")]
    NothingRecorded,
}

impl From<&str> for ChoreographyError {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}
