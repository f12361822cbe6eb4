use log::{debug, warn};

use crate::youtube::CaptionSource;
use crate::{CaptionFragment, Error, Result, Transcript, VideoRef};

/// Join fragment texts in order, each prefixed by a single space
pub fn assemble(fragments: &[CaptionFragment]) -> String {
    fragments.iter().fold(String::new(), |mut text, fragment| {
        text.push(' ');
        text.push_str(&fragment.text);
        text
    })
}

/// Fetch captions for `video` and assemble them into a transcript.
///
/// Any caption service failure is reported as `Error::TranscriptUnavailable`
/// carrying the service's own description of what went wrong.
pub async fn fetch_transcript(source: &dyn CaptionSource, video: &VideoRef) -> Result<Transcript> {
    let video_id = video.video_id();
    debug!("Fetching captions for {video_id}");

    let captions = source.fetch(video_id).await.map_err(|e| {
        warn!("Caption fetch failed for {video_id}: {e:#}");
        Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: format!("{e:#}"),
        }
    })?;

    Ok(Transcript {
        video_id: video_id.to_string(),
        text: assemble(&captions.fragments),
        fragment_count: captions.fragments.len(),
        language: captions.language,
    })
}
