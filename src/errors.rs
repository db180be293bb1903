use thiserror::Error;

/// The failure taxonomy shared by both pipelines.
///
/// `status` doubles as the failure discriminant in the response
/// envelope, mirroring HTTP semantics.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required parameter: {0}")]
    Validation(&'static str),

    /// Unparseable image bytes, treated as a client error (400).
    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("storage backend failure: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("no image record found for the given id")]
    NotFound,

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn status(&self) -> i32 {
        match self {
            Self::Validation(_) => 400,
            Self::Decode(_) => 400,
            Self::Storage(_) => 500,
            Self::NotFound => 404,
            Self::Internal(_) => 500,
        }
    }
}
