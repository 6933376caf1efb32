use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to fetch `{locator}`: {reason}")]
    /// A glyph or background resource could not be retrieved, either because
    /// the transport failed or because the server answered with a non-success
    /// status
    ResourceFetch { locator: String, reason: String },

    #[error("failed to decode `{locator}`: {reason}")]
    /// The fetched bytes are not a usable image
    Decode { locator: String, reason: String },

    #[error("nothing to export: the sanitized input contains no glyphs")]
    /// Export was attempted with an empty token sequence
    EmptyInput,

    #[error("export surface unavailable: {0}")]
    /// The raster surface or the document writer could not be initialised
    ExportUnavailable(String),

    #[error("an export is already in progress")]
    /// A second export was triggered while one is still running
    ExportInProgress,

    #[error("invalid layout geometry: {0}")]
    /// The layout geometry violates one of its invariants
    InvalidGeometry(String),

    #[error("invalid configuration: {0}")]
    /// The configuration file is not valid JSON or has fields of the wrong type
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    /// An I/O error occurred while writing the output
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn fetch<L: ToString, R: ToString>(locator: L, reason: R) -> RenderError {
        RenderError::ResourceFetch {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn decode<L: ToString, R: ToString>(locator: L, reason: R) -> RenderError {
        RenderError::Decode {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}
