//! Error types for document building.

/// Error raised while building a document.
///
/// Output already written before the error is not rolled back. Build into an
/// in-memory buffer and discard it when atomicity is needed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The underlying stream writer failed.
    #[error("output stream error")]
    Io(#[from] std::io::Error),

    /// A block kind name with no DocBook mapping.
    #[error("unknown block kind: {0}")]
    UnknownBlockKind(String),

    /// A definition term was started outside of any definition list.
    #[error("definition term without an enclosing definition list")]
    OrphanDefinitionTerm,

    /// An end event arrived with nothing open to close.
    #[error("{0} without a matching begin")]
    Unbalanced(&'static str),

    /// A numeric entity reference whose body is not a decimal or hex number.
    #[error("malformed numeric entity reference: {0}")]
    MalformedEntity(String),
}
