//! One user's interaction with one video at a time.
//!
//! A session holds the parsed link and the outcome of the last transcript
//! fetch. Summaries and answers are only available once a non-empty
//! transcript exists. Every operation takes `&mut self`, so a session never
//! has more than one request in flight.

use log::info;

use crate::generate::Generator;
use crate::prompt::Dispatcher;
use crate::transcript::fetch_transcript;
use crate::youtube::CaptionSource;
use crate::{Error, Result, Transcript, VideoRef};

pub struct Session<C, G> {
    captions: C,
    dispatcher: Dispatcher<G>,
    video: Option<VideoRef>,
    transcript: Option<Transcript>,
    failure: Option<String>,
}

impl<C: CaptionSource, G: Generator> Session<C, G> {
    pub fn new(captions: C, dispatcher: Dispatcher<G>) -> Self {
        Self {
            captions,
            dispatcher,
            video: None,
            transcript: None,
            failure: None,
        }
    }

    /// Parse `input`, then fetch and assemble its transcript.
    ///
    /// Previous state is discarded first, so a failed load leaves the
    /// session gated off.
    pub async fn load(&mut self, input: &str) -> Result<&Transcript> {
        self.video = None;
        self.transcript = None;
        self.failure = None;

        let video = self.video.insert(VideoRef::parse(input)?);
        info!("Loading video {}", video.video_id());

        match fetch_transcript(&self.captions, video).await {
            Ok(transcript) => Ok(&*self.transcript.insert(transcript)),
            Err(e) => {
                self.failure = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn video(&self) -> Option<&VideoRef> {
        self.video.as_ref()
    }

    /// Why the last transcript fetch failed, if it did
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// The assembled transcript, if the last fetch produced usable text
    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref().filter(|t| !t.is_empty())
    }

    pub fn can_summarize(&self) -> bool {
        self.transcript().is_some()
    }

    pub fn can_answer(&self, question: &str) -> bool {
        self.can_summarize() && !question.trim().is_empty()
    }

    pub async fn summarize(&mut self) -> Result<String> {
        let transcript = self.ready_transcript()?;
        self.dispatcher.summarize(&transcript.text).await
    }

    pub async fn answer(&mut self, question: &str) -> Result<String> {
        let transcript = self.ready_transcript()?;
        if question.trim().is_empty() {
            return Err(Error::NotReady("enter a question first"));
        }
        self.dispatcher.answer(&transcript.text, question).await
    }

    fn ready_transcript(&self) -> Result<&Transcript> {
        match (&self.transcript, &self.video) {
            (Some(t), _) if !t.is_empty() => Ok(t),
            (Some(_), _) => Err(Error::NotReady("this video has no caption text")),
            (None, Some(_)) => Err(Error::NotReady("no transcript; load a video with captions first")),
            (None, None) => Err(Error::NotReady("no video loaded; enter a video URL first")),
        }
    }
}
