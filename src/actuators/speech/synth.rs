use bytes::Bytes;
use futures_util::{StreamExt, stream::BoxStream};
use serde::Serialize;

use super::SpeechError;
use crate::config::SpeechConfig;

/// Anna Kim, a Korean voice.
pub const VOICE_ID: &str = "uyVNoMrnUku1dZyVEXwD";
pub const MODEL_ID: &str = "eleven_multilingual_v2";
/// Raw 16-bit little-endian mono PCM at 24 kHz, see [`super::PCM_SAMPLE_RATE`].
pub const OUTPUT_FORMAT: &str = "pcm_24000";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.9,
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Streaming text-to-speech client for ElevenLabs.
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    api_key: Box<str>,
    base_url: Box<str>,
    voice_id: Box<str>,
    model_id: Box<str>,
    voice_settings: VoiceSettings,
}

impl SpeechClient {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.eleven_api_key.clone(),
            base_url: config.eleven_base_url.clone(),
            voice_id: VOICE_ID.into(),
            model_id: MODEL_ID.into(),
            voice_settings: VoiceSettings::default(),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream?output_format={}",
            self.base_url.trim_end_matches('/'),
            self.voice_id,
            OUTPUT_FORMAT,
        )
    }

    /// Starts synthesis and hands back the audio body as it arrives.
    pub async fn synthesize(
        &self,
        text: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, SpeechError>>, SpeechError> {
        let request = SynthesisRequest {
            text,
            model_id: &self.model_id,
            voice_settings: self.voice_settings,
        };

        let response = self
            .http
            .post(self.stream_url())
            .header("xi-api-key", &*self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::ErrorResponse {
                status: status.as_u16(),
                body: body.trim().into(),
            });
        }

        tracing::info!(
            voice = %self.voice_id,
            model = %self.model_id,
            chars = text.chars().count(),
            "Speech synthesis started"
        );

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(SpeechError::from))
            .boxed())
    }
}
