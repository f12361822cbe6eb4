use serde::Serialize;

use crate::{Transcript, VideoRef};

/// What a command produced for one video
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Summary {
        video_id: String,
        thumbnail_url: String,
        summary: String,
    },
    Answer {
        video_id: String,
        thumbnail_url: String,
        question: String,
        answer: String,
    },
    Transcript {
        video_id: String,
        thumbnail_url: String,
        language: String,
        fragment_count: usize,
        transcript: String,
    },
}

impl Report {
    pub fn summary(video: &VideoRef, summary: String) -> Self {
        Report::Summary {
            video_id: video.video_id().to_string(),
            thumbnail_url: video.thumbnail_url(),
            summary,
        }
    }

    pub fn answer(video: &VideoRef, question: &str, answer: String) -> Self {
        Report::Answer {
            video_id: video.video_id().to_string(),
            thumbnail_url: video.thumbnail_url(),
            question: question.to_string(),
            answer,
        }
    }

    pub fn transcript(video: &VideoRef, transcript: &Transcript) -> Self {
        Report::Transcript {
            video_id: video.video_id().to_string(),
            thumbnail_url: video.thumbnail_url(),
            language: transcript.language.clone(),
            fragment_count: transcript.fragment_count,
            transcript: transcript.text.clone(),
        }
    }
}

/// Render a report as plain text, headed by the thumbnail link
pub fn render_text(report: &Report) -> String {
    match report {
        Report::Summary {
            thumbnail_url, summary, ..
        } => format!("Thumbnail: {thumbnail_url}\n\n### Summary\n{summary}"),
        Report::Answer {
            thumbnail_url,
            question,
            answer,
            ..
        } => format!("Thumbnail: {thumbnail_url}\n\nQuestion: {question}\n\n### Answer\n{answer}"),
        Report::Transcript { transcript, .. } => transcript.trim_start().to_string(),
    }
}

/// Render a report as pretty-printed JSON
pub fn render_json(report: &Report) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
