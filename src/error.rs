use thiserror::Error;

/// Errors surfaced by the ytqa pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// The input has no extractable video identifier
    #[error("invalid video reference: {0:?} (expected a URL like https://www.youtube.com/watch?v=ID)")]
    InvalidReference(String),

    /// The caption service failed or had nothing for this video
    #[error("could not retrieve transcript for {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    /// The language model call failed
    #[error("generation failed: {0}")]
    Generation(String),

    /// Missing or unusable startup configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A gated action was requested before its prerequisites exist
    #[error("{0}")]
    NotReady(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
