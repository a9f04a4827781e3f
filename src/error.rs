use thiserror::Error;

// ---------------------------------------------------------------------------
// Ingestion error taxonomy
// ---------------------------------------------------------------------------

/// Terminal failures of one ingestion attempt.
///
/// `Input` means the caller-supplied file violates a precondition (size or
/// declared media type) and is rejected before any decoding work.  `Parse`
/// means the byte stream could not be decoded or lacks the mandatory
/// title / header / data layout.  Neither variant leaves a partial dataset
/// behind; the caller must retry with a fresh input.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input rejected: {0}")]
    Input(String),

    #[error("spreadsheet could not be parsed: {0}")]
    Parse(String),
}

impl IngestError {
    pub fn input(reason: impl Into<String>) -> Self {
        IngestError::Input(reason.into())
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        IngestError::Parse(reason.into())
    }
}
