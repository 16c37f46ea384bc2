//! Text-to-speech playback.
//!
//! Text goes to ElevenLabs, raw PCM comes back as a stream and is fed into an
//! [`AudioSink`] as it arrives. Nothing is kept once it has been played.

use futures_util::StreamExt;

mod pcm;
mod synth;

#[cfg(feature = "audio-output")]
mod playback;

pub use pcm::{PCM_SAMPLE_RATE, PcmDecoder};
#[cfg(feature = "audio-output")]
pub use playback::CpalSink;
pub use synth::{MODEL_ID, OUTPUT_FORMAT, SpeechClient, VOICE_ID, VoiceSettings};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Error response from speech API ({status}): {body}")]
    ErrorResponse { status: u16, body: Box<str> },

    #[error("No default output device available")]
    NoOutputDevice,

    #[error("No output config supports {0} Hz")]
    NoOutputConfig(u32),

    #[error("Audio playback failed: {0}")]
    Playback(Box<str>),
}

/// Where decoded mono samples end up.
#[allow(async_fn_in_trait)]
pub trait AudioSink {
    async fn play(&mut self, samples: &[i16]) -> Result<(), SpeechError>;

    /// Called once after the last chunk; returns when playback is done.
    async fn finish(&mut self) -> Result<(), SpeechError>;
}

/// Synthesizes `text` and streams the audio into `sink`.
pub async fn speak<S: AudioSink>(
    client: &SpeechClient,
    sink: &mut S,
    text: &str,
) -> Result<(), SpeechError> {
    let mut stream = client.synthesize(text).await?;
    let mut decoder = PcmDecoder::default();
    let mut total_samples = 0usize;

    while let Some(chunk) = stream.next().await {
        let samples = decoder.decode(&chunk?);
        total_samples += samples.len();
        if !samples.is_empty() {
            sink.play(&samples).await?;
        }
    }

    if decoder.has_remainder() {
        tracing::warn!("Audio stream ended on half a sample, dropping it");
    }

    sink.finish().await?;
    tracing::info!(
        samples = total_samples,
        seconds = total_samples as f64 / PCM_SAMPLE_RATE as f64,
        "Speech played"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::config::SpeechConfig;

    const STREAM_PATH: &str = "/v1/text-to-speech/uyVNoMrnUku1dZyVEXwD/stream";

    #[derive(Default)]
    struct RecordingSink {
        samples: Vec<i16>,
        writes: usize,
        finished: bool,
    }

    impl AudioSink for RecordingSink {
        async fn play(&mut self, samples: &[i16]) -> Result<(), SpeechError> {
            assert!(!self.finished, "play after finish");
            self.samples.extend_from_slice(samples);
            self.writes += 1;
            Ok(())
        }

        async fn finish(&mut self) -> Result<(), SpeechError> {
            self.finished = true;
            Ok(())
        }
    }

    struct FailingSink;

    impl AudioSink for FailingSink {
        async fn play(&mut self, _: &[i16]) -> Result<(), SpeechError> {
            Err(SpeechError::Playback("device unplugged".into()))
        }

        async fn finish(&mut self) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    fn client_for(server: &mockito::Server) -> SpeechClient {
        SpeechClient::new(&SpeechConfig::new("test-eleven-key", server.url()))
    }

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|sample| sample.to_le_bytes()).collect()
    }

    #[tokio::test]
    async fn streams_audio_into_sink() {
        let samples: Vec<i16> = (0..480).map(|i| (i * 37 % 2000 - 1000) as i16).collect();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::UrlEncoded("output_format".into(), "pcm_24000".into()))
            .match_header("xi-api-key", "test-eleven-key")
            .match_body(Matcher::Json(json!({
                "text": "좋아요! 같이 해보자요.",
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {"stability": 0.5, "similarity_boost": 0.9},
            })))
            .with_status(200)
            .with_header("content-type", "audio/pcm")
            .with_body(pcm(&samples))
            .create_async()
            .await;

        let mut sink = RecordingSink::default();
        speak(&client_for(&server), &mut sink, "좋아요! 같이 해보자요.").await.unwrap();

        mock.assert_async().await;
        assert_eq!(sink.samples, samples);
        assert!(sink.writes >= 1);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn empty_audio_still_finishes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(Vec::<u8>::new())
            .create_async()
            .await;

        let mut sink = RecordingSink::default();
        speak(&client_for(&server), &mut sink, "...").await.unwrap();

        mock.assert_async().await;
        assert!(sink.samples.is_empty());
        assert_eq!(sink.writes, 0);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn api_error_is_returned_before_playback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"detail": {"status": "invalid_api_key"}}"#)
            .create_async()
            .await;

        let mut sink = RecordingSink::default();
        let error = speak(&client_for(&server), &mut sink, "hello").await.unwrap_err();

        mock.assert_async().await;
        match error {
            SpeechError::ErrorResponse { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_api_key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!sink.finished);
    }

    #[tokio::test]
    async fn sink_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(pcm(&[1, 2, 3]))
            .create_async()
            .await;

        let error = speak(&client_for(&server), &mut FailingSink, "hello").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(error, SpeechError::Playback(_)));
    }

    #[tokio::test]
    async fn odd_length_body_drops_trailing_byte() {
        let mut body = pcm(&[10, -10]);
        body.push(0x7f);
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let mut sink = RecordingSink::default();
        speak(&client_for(&server), &mut sink, "hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(sink.samples, vec![10, -10]);
        assert!(sink.finished);
    }
}
