//! Error types for mapping loading and notation lookup.

use std::path::PathBuf;

/// Error while loading the notation-to-image mapping file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MappingError {
    /// Mapping file does not exist.
    #[error("emoticon mapping file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Mapping file exists but could not be read.
    #[error("failed to read emoticon mapping file {}", path.display())]
    Io {
        /// Path of the mapping file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// XML parsing error.
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error while decoding XML text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Document ended before all elements were closed.
    #[error("mapping document ended inside an open element")]
    UnexpectedEof,

    /// A mapping record lacks a required child element.
    #[error("mapping #{index} has no <{field}> element")]
    MissingField {
        /// Zero-based position of the record in the document.
        index: usize,
        /// Name of the missing element.
        field: &'static str,
    },

    /// A mapping record names something that is not an emoticon notation.
    #[error("mapping #{index} has invalid notation {notation:?}")]
    InvalidNotation {
        /// Zero-based position of the record in the document.
        index: usize,
        /// The notation text as written.
        notation: String,
    },
}

/// Error resolving a notation to its image.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No mapping entry exists for the notation.
    #[error("no emoticon mapped for {0:?}")]
    UnknownNotation(String),

    /// The mapping table could not be loaded.
    #[error("emoticon mappings unavailable")]
    Mapping(#[from] MappingError),
}
