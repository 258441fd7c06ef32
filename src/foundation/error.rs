/// Convenience result type used across chainview.
pub type ChainviewResult<T> = Result<T, ChainviewError>;

/// Top-level error taxonomy used by engine APIs.
///
/// `Connectivity`, `ConfigFetch` and `Layout` abort a render pass. `MalformedStage` is only ever
/// logged: the offending stage degrades to an "Unknown" node and the pass continues.
#[derive(thiserror::Error, Debug)]
pub enum ChainviewError {
    /// No live connection to the configuration source, or the transport failed.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Downloading or linearizing the configuration failed.
    #[error("config fetch error: {0}")]
    ConfigFetch(String),

    /// A stage descriptor that cannot be classified.
    #[error("malformed stage: {0}")]
    MalformedStage(String),

    /// Wire routing was requested before the surface measured a node.
    #[error("layout error: {0}")]
    Layout(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChainviewError {
    /// Build a [`ChainviewError::Connectivity`] value.
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Build a [`ChainviewError::ConfigFetch`] value.
    pub fn config_fetch(msg: impl Into<String>) -> Self {
        Self::ConfigFetch(msg.into())
    }

    /// Build a [`ChainviewError::MalformedStage`] value.
    pub fn malformed_stage(msg: impl Into<String>) -> Self {
        Self::MalformedStage(msg.into())
    }

    /// Build a [`ChainviewError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`ChainviewError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error aborts a render pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedStage(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
