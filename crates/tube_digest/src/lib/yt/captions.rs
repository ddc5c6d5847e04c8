//! # Caption client
//!
//! Lists and downloads YouTube caption tracks over plain HTTP.
//!
//! Listing goes through the innertube player endpoint: the watch page is loaded
//! to obtain the innertube API key, then `youtubei/v1/player` is asked for the
//! video's caption tracks. Tracks are downloaded in the `json3` format.
//!
//! Requests can be routed through an outbound proxy, since YouTube blocks
//! caption requests from many datacenter IP ranges.

use std::{ops::Deref, sync::LazyLock};

use anyhow::Context;
use itertools::Itertools;
use regex::Regex;
use reqwest::{Client, Proxy, Url};
use serde::Deserialize;

use crate::{
    error::Error,
    link::VideoId,
    yt::{CaptionEntry, CaptionSource, CaptionTrack},
};

static INNERTUBE_API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([A-Za-z0-9_-]+)""#).unwrap());

/// Outbound proxy settings for caption requests
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    fn to_proxy(&self) -> anyhow::Result<Proxy> {
        let proxy = Proxy::all(&self.url).context("Invalid proxy url")?;
        Ok(match &self.username {
            Some(username) => proxy.basic_auth(username, self.password.as_deref().unwrap_or_default()),
            None => proxy,
        })
    }
}

#[derive(Debug, Clone)]
pub struct YtCaptionClient {
    client: Client,
    base_url: String,
}

impl Deref for YtCaptionClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl YtCaptionClient {
    const BASE_URL: &str = "https://www.youtube.com";
    const CLIENT_NAME: &str = "ANDROID";
    const CLIENT_VERSION: &str = "20.10.38";

    pub fn new(proxy: Option<&ProxyConfig>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            tracing::info!("Routing caption requests through proxy");
            builder = builder.proxy(proxy.to_proxy()?);
        }

        let client = builder.build().context("Failed to build caption http client")?;
        Ok(YtCaptionClient {
            client,
            base_url: Self::BASE_URL.into(),
        })
    }

    /// Sends watch page and player requests to `url` instead of youtube.com
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Loads the watch page html for `video_id`
    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &VideoId) -> anyhow::Result<WatchPage> {
        let html = self
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(WatchPage(html))
    }

    #[tracing::instrument(skip(self, api_key))]
    async fn fetch_player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> anyhow::Result<PlayerResponse> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": Self::CLIENT_NAME,
                    "clientVersion": Self::CLIENT_VERSION
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<PlayerResponse>()
            .await?;

        Ok(response)
    }
}

impl CaptionSource for YtCaptionClient {
    async fn list_tracks(&self, video_id: &VideoId) -> anyhow::Result<Vec<CaptionTrack>> {
        let page = self.fetch_watch_page(video_id).await?;
        if page.is_ip_blocked() {
            anyhow::bail!("YouTube is asking for a captcha; the request IP is likely blocked");
        }

        let api_key = page.innertube_api_key()?;
        let player = self.fetch_player_response(video_id, api_key).await?;

        Ok(player.caption_tracks())
    }

    #[tracing::instrument(skip_all, fields(language = %track.language_code))]
    async fn fetch_track(&self, track: &CaptionTrack) -> anyhow::Result<Vec<CaptionEntry>> {
        let timed_text = self
            .get(json3_url(&track.base_url)?)
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await
            .context("Caption track is not valid json3")?;

        Ok(timed_text.into_entries())
    }
}

/// The track url with any `fmt` parameter replaced by `fmt=json3`
fn json3_url(base_url: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url).context("Invalid caption track url")?;
    let pairs = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect_vec();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");
    Ok(url)
}

pub struct WatchPage(String);

impl Deref for WatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WatchPage {
    fn from(value: String) -> Self {
        WatchPage(value)
    }
}

impl WatchPage {
    pub fn innertube_api_key(&self) -> Result<&str, Error> {
        INNERTUBE_API_KEY_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .ok_or(Error::ParseError(
                "Failed to find INNERTUBE_API_KEY in the watch page",
            ))
    }

    pub fn is_ip_blocked(&self) -> bool {
        self.contains("class=\"g-recaptcha\"")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

impl PlayerResponse {
    /// Listed caption tracks; a video without captions has none
    pub fn caption_tracks(self) -> Vec<CaptionTrack> {
        self.captions
            .map(|c| c.player_captions_tracklist_renderer.caption_tracks)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Option<Vec<TimedTextSegment>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

impl TimedText {
    /// One entry per event, in the order YouTube sent them
    pub fn into_entries(self) -> Vec<CaptionEntry> {
        self.events
            .into_iter()
            .filter_map(|event| event.segs)
            .map(|segs| CaptionEntry {
                text: segs.into_iter().map(|s| s.utf8).collect::<String>(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innertube_key_extraction() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSyA-key_123","OTHER":1});</script>"#;
        let page = WatchPage::from(html.to_string());
        assert_eq!(page.innertube_api_key().unwrap(), "AIzaSyA-key_123");
    }

    #[test]
    fn test_innertube_key_missing() {
        let page = WatchPage::from("<html></html>".to_string());
        assert!(matches!(page.innertube_api_key(), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_recaptcha_page_is_blocked() {
        let page = WatchPage::from(r#"<div class="g-recaptcha" data-sitekey="x"></div>"#.to_string());
        assert!(page.is_ip_blocked());
    }

    #[test]
    fn test_player_response_tracks() {
        let json = r#"{
            "playabilityStatus": {"status": "OK"},
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {"baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=en&fmt=srv3", "languageCode": "en", "kind": "asr", "name": {"runs": []}},
                        {"baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=ko", "languageCode": "ko"}
                    ]
                }
            }
        }"#;

        let tracks = serde_json::from_str::<PlayerResponse>(json)
            .unwrap()
            .caption_tracks();
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_generated());
        assert_eq!(tracks[1].language_code, "ko");
        assert!(!tracks[1].is_generated());
    }

    #[test]
    fn test_player_response_without_captions() {
        let response: PlayerResponse =
            serde_json::from_str(r#"{"playabilityStatus": {"status": "OK"}}"#).unwrap();
        assert!(response.caption_tracks().is_empty());
    }

    #[test]
    fn test_json3_url_replaces_format() {
        let cases = [
            (
                "https://www.youtube.com/api/timedtext?v=x&fmt=srv3&lang=en",
                "https://www.youtube.com/api/timedtext?v=x&lang=en&fmt=json3",
            ),
            (
                "https://www.youtube.com/api/timedtext?v=x",
                "https://www.youtube.com/api/timedtext?v=x&fmt=json3",
            ),
            (
                "https://www.youtube.com/api/timedtext?fmt=srv3&v=x",
                "https://www.youtube.com/api/timedtext?v=x&fmt=json3",
            ),
            (
                "https://www.youtube.com/api/timedtext?fmt=vtt",
                "https://www.youtube.com/api/timedtext?fmt=json3",
            ),
        ];

        for (base_url, expected) in cases {
            assert_eq!(json3_url(base_url).unwrap().as_str(), expected, "{base_url}");
        }
    }

    #[test]
    fn test_json3_url_rejects_relative_url() {
        assert!(json3_url("/api/timedtext?v=x").is_err());
    }

    #[test]
    fn test_timed_text_entries_in_order() {
        let json = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 1000, "id": 1},
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "Never "}, {"utf8": "gonna"}]},
                {"tStartMs": 2000, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 3000, "segs": [{"utf8": "give you up"}]}
            ]
        }"#;

        let entries = serde_json::from_str::<TimedText>(json).unwrap().into_entries();
        let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Never gonna", "\n", "give you up"]);
        assert_eq!(crate::yt::join_entries(&entries), "Never gonna give you up");
    }
}
