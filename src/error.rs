//! Error types for the authoring engine.
//!
//! Configuration and resource problems are reported when a value is assigned or first used,
//! never deferred to document finalisation.

/// Result type alias for authoring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a document.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Out-of-range value: negative line width, unknown mode name, empty font family,
    /// styled symbolic font, or centered/right text combined with bounded wrapping.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A font family was referenced before being registered.
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// Operation requires state that does not exist yet (usually an open page).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error while writing the document or talking to a printer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Font program could not be parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Picture could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// Symbol generator rejected the input
    #[error("Barcode error: {0}")]
    Barcode(String),
}

impl Error {
    /// Shorthand used by validators throughout the crate.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// Error for operations that need an open page.
    pub(crate) fn no_page(operation: &str) -> Self {
        Error::InvalidState(format!("{} requires an open page; call new_page first", operation))
    }
}
