pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod prompt;
pub mod session;
pub mod transcript;
pub mod video;
pub mod youtube;

use serde::Serialize;

pub use error::{Error, Result};
pub use video::{VideoRef, extract_video_id};

/// A single captioned fragment as returned by the caption service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// The fragments of one caption track, tagged with the track's language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Captions {
    pub language: String,
    pub fragments: Vec<CaptionFragment>,
}

/// Assembled caption text for a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub text: String,
    pub fragment_count: usize,
}

impl Transcript {
    /// True when there is caption text worth sending to the model
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
