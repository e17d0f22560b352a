//! Error types for figcanvas_render

use figcanvas_paint::{ConfigurationError, ImageError};
use figcanvas_text::TextError;
use thiserror::Error;

/// Errors raised while drawing a figure
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Resource(#[from] TextError),

    #[error("Math text requested but no math layout is configured")]
    MathUnavailable,

    #[error("Figure failed to draw: {0}")]
    Figure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("A render pass is already in progress")]
    PassInProgress,

    /// Wraps whatever aborted a pass; the cause is kept as `source()`
    #[error("Rendering failed")]
    RenderFailure(#[source] Box<RenderError>),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RenderError {
    /// Wrap an arbitrary figure-side error
    pub fn figure(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RenderError::Figure(err.into())
    }

    /// The error that started a failed pass
    pub fn root_cause(&self) -> &RenderError {
        match self {
            RenderError::RenderFailure(inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn render_failure_keeps_its_cause() {
        let err = RenderError::RenderFailure(Box::new(RenderError::MathUnavailable));
        assert_eq!(err.to_string(), "Rendering failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Math text requested but no math layout is configured")
        );
        assert!(matches!(err.root_cause(), RenderError::MathUnavailable));
    }

    #[test]
    fn configuration_errors_convert() {
        let err: RenderError = ConfigurationError::UnknownCapStyle("triangle".into()).into();
        assert!(matches!(err, RenderError::Configuration(_)));
        assert!(err.to_string().contains("triangle"));
    }

    #[test]
    fn figure_errors_box_strings() {
        let err = RenderError::figure("axis limits are inverted");
        assert_eq!(
            err.to_string(),
            "Figure failed to draw: axis limits are inverted"
        );
    }
}
