use async_trait::async_trait;
use eyre::{Result, bail};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::{CaptionFragment, Captions};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Something that can list the caption fragments of a video, in order
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Captions>;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption fragments from YouTube's built-in captions via the InnerTube API
pub struct YouTubeCaptions {
    client: reqwest::Client,
    lang: String,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl CaptionSource for YouTubeCaptions {
    async fn fetch(&self, video_id: &str) -> Result<Captions> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tracks = caption_tracks(resp, video_id)?;
        let track = select_track(&tracks, &self.lang);
        if track.language_code != self.lang {
            info!(
                "No {} captions for {video_id}, using {} track instead",
                self.lang, track.language_code
            );
        }
        debug!("Using caption track: lang={}", track.language_code);

        let caption_xml = self
            .client
            .get(track_url(&track.base_url))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let fragments = parse_caption_xml(&caption_xml)?;
        debug!("Parsed {} caption fragments for {video_id}", fragments.len());
        Ok(Captions {
            language: track.language_code.clone(),
            fragments,
        })
    }
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    if html.contains("class=\"g-recaptcha\"") {
        bail!("YouTube is asking for a captcha; too many requests from this IP");
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn caption_tracks(resp: InnerTubePlayerResponse, video_id: &str) -> Result<Vec<CaptionTrack>> {
    if let Some(status) = resp.playability_status {
        if status.status != "OK" {
            let reason = status.reason.unwrap_or_else(|| status.status.to_lowercase());
            bail!("video {video_id} is unavailable: {reason}");
        }
    }

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        bail!("transcripts are disabled for video {video_id}");
    }

    Ok(tracks)
}

/// Requested language if present, otherwise the first track. `tracks` must be non-empty.
fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> &'a CaptionTrack {
    tracks.iter().find(|t| t.language_code == lang).unwrap_or(&tracks[0])
}

// srv3 tracks use a different XML layout than the one parsed below
fn track_url(base_url: &str) -> String {
    base_url.replace("&fmt=srv3", "")
}

fn parse_caption_xml(xml: &str) -> Result<Vec<CaptionFragment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                // Some tracks omit dur on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
            }
            Ok(Event::Empty(_)) => {}
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        fragments.push(CaptionFragment::new(text, start, dur));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(fragments)
}
