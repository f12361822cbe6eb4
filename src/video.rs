use serde::Serialize;

use crate::{Error, Result};

/// A pasted video link with its identifier extracted once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRef {
    url: String,
    video_id: String,
}

impl VideoRef {
    pub fn parse(input: &str) -> Result<Self> {
        let video_id = extract_video_id(input)?;
        Ok(Self {
            url: input.trim().to_string(),
            video_id,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn thumbnail_url(&self) -> String {
        format!("http://img.youtube.com/vi/{}/0.jpg", self.video_id)
    }
}

/// Extract the video ID from a `...?v=ID` style link.
///
/// The identifier is everything after the first `=`, including any further
/// query parameters (`watch?v=abc&t=42` gives `abc&t=42`). A link without
/// `=`, or with nothing after it, is rejected.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    match input.split_once('=') {
        Some((_, id)) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(Error::InvalidReference(input.to_string())),
    }
}
