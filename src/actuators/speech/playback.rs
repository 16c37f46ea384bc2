use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use tokio::time::Instant;

use super::{AudioSink, PCM_SAMPLE_RATE, SpeechError};

const BUFFER_SECONDS: usize = 5;
const POLL_INTERVAL: Duration = Duration::from_millis(20);
const TAIL: Duration = Duration::from_millis(200);
/// Grace period on top of the buffered audio's own length when draining.
const DRAIN_SLACK: Duration = Duration::from_secs(2);

/// First error reported by the audio thread, if any.
#[derive(Clone, Default)]
struct StreamHealth(Arc<OnceLock<Box<str>>>);

impl StreamHealth {
    fn report(&self, error: impl std::fmt::Display) {
        let _ = self.0.set(error.to_string().into());
    }

    fn check(&self) -> Result<(), SpeechError> {
        match self.0.get() {
            Some(reason) => Err(SpeechError::Playback(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Plays mono PCM on the default output device.
///
/// Samples are fanned out to every device channel and handed to the audio
/// thread through a ring buffer that only ever holds whole frames.
pub struct CpalSink {
    _stream: cpal::Stream,
    producer: HeapProducer<i16>,
    channels: usize,
    health: StreamHealth,
}

impl CpalSink {
    pub fn open_default() -> Result<Self, SpeechError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SpeechError::NoOutputDevice)?;

        let rate = SampleRate(PCM_SAMPLE_RATE);
        let supported = device
            .supported_output_configs()
            .map_err(playback_error)?
            .filter(|config| {
                matches!(config.sample_format(), SampleFormat::I16 | SampleFormat::F32)
                    && config.min_sample_rate() <= rate
                    && config.max_sample_rate() >= rate
            })
            .min_by_key(|config| (config.sample_format() != SampleFormat::I16, config.channels()))
            .ok_or(SpeechError::NoOutputConfig(PCM_SAMPLE_RATE))?
            .with_sample_rate(rate);

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let channels = usize::from(config.channels);
        tracing::info!(?sample_format, channels, "Opening audio output");

        let capacity = PCM_SAMPLE_RATE as usize * channels * BUFFER_SECONDS;
        let (producer, mut consumer) = HeapRb::<i16>::new(capacity).split();
        let health = StreamHealth::default();
        let on_error = {
            let health = health.clone();
            move |error: cpal::StreamError| {
                tracing::error!("Audio output stream error: {}", error);
                health.report(error);
            }
        };

        let stream = match sample_format {
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    fill(data, &mut consumer, channels, |sample| sample, 0);
                },
                on_error,
                None,
            ),
            _ => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill(data, &mut consumer, channels, |sample| f32::from(sample) / 32768.0, 0.0);
                },
                on_error,
                None,
            ),
        }
        .map_err(playback_error)?;
        stream.play().map_err(playback_error)?;

        Ok(Self {
            _stream: stream,
            producer,
            channels,
            health,
        })
    }
}

impl AudioSink for CpalSink {
    async fn play(&mut self, samples: &[i16]) -> Result<(), SpeechError> {
        let frames = fan_out(samples, self.channels);
        push_frames(&mut self.producer, &frames, self.channels, &self.health).await
    }

    async fn finish(&mut self) -> Result<(), SpeechError> {
        drain(&self.producer, self.channels, &self.health, DRAIN_SLACK).await?;
        // The device may still hold the last callback's worth of samples.
        tokio::time::sleep(TAIL).await;
        self.health.check()
    }
}

fn fan_out(samples: &[i16], channels: usize) -> Vec<i16> {
    samples
        .iter()
        .flat_map(|&sample| std::iter::repeat_n(sample, channels))
        .collect()
}

/// Pushes whole frames as room frees up, waiting on the audio thread.
async fn push_frames(
    producer: &mut HeapProducer<i16>,
    frames: &[i16],
    channels: usize,
    health: &StreamHealth,
) -> Result<(), SpeechError> {
    let mut pending = frames;
    while !pending.is_empty() {
        health.check()?;
        let room = producer.free_len() / channels * channels;
        let pushed = producer.push_slice(&pending[..room.min(pending.len())]);
        pending = &pending[pushed..];
        if !pending.is_empty() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    Ok(())
}

/// Waits until the audio thread has consumed everything queued.
///
/// Gives up once the queued audio should have played out plus `slack`.
async fn drain(
    producer: &HeapProducer<i16>,
    channels: usize,
    health: &StreamHealth,
    slack: Duration,
) -> Result<(), SpeechError> {
    let queued_frames = producer.len() / channels;
    let deadline = Instant::now()
        + Duration::from_secs_f64(queued_frames as f64 / f64::from(PCM_SAMPLE_RATE))
        + slack;

    while !producer.is_empty() {
        health.check()?;
        if Instant::now() >= deadline {
            return Err(SpeechError::Playback(
                format!("audio output stalled with {} samples queued", producer.len()).into(),
            ));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    Ok(())
}

fn fill<T: Copy>(
    data: &mut [T],
    consumer: &mut HeapConsumer<i16>,
    channels: usize,
    convert: impl Fn(i16) -> T,
    silence: T,
) {
    let available = consumer.len().min(data.len()) / channels * channels;
    let (audible, rest) = data.split_at_mut(available);
    for out in audible.iter_mut() {
        *out = consumer.pop().map_or(silence, &convert);
    }
    rest.fill(silence);
}

fn playback_error(error: impl std::fmt::Display) -> SpeechError {
    SpeechError::Playback(error.to_string().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_out_repeats_each_sample_per_channel() {
        assert_eq!(fan_out(&[1, -2], 2), vec![1, 1, -2, -2]);
        assert_eq!(fan_out(&[7], 1), vec![7]);
    }

    #[tokio::test]
    async fn push_waits_for_room_and_keeps_frames_whole() {
        let (mut producer, mut consumer) = HeapRb::<i16>::new(5).split();
        let frames = [1, 1, 2, 2, 3, 3, 4, 4];

        let reader = tokio::spawn(async move {
            let mut seen = Vec::new();
            while seen.len() < 8 {
                assert_eq!(consumer.len() % 2, 0, "half a frame in the buffer");
                while let Some(sample) = consumer.pop() {
                    seen.push(sample);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            seen
        });

        push_frames(&mut producer, &frames, 2, &StreamHealth::default()).await.unwrap();
        assert_eq!(reader.await.unwrap(), frames);
    }

    #[tokio::test]
    async fn push_stops_when_stream_failed() {
        let (mut producer, _consumer) = HeapRb::<i16>::new(2).split();
        let health = StreamHealth::default();
        health.report("device unplugged");

        let error = push_frames(&mut producer, &[1, 2, 3, 4], 1, &health).await.unwrap_err();
        match error {
            SpeechError::Playback(reason) => assert_eq!(&*reason, "device unplugged"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn drain_stops_when_stream_failed() {
        let (mut producer, _consumer) = HeapRb::<i16>::new(8).split();
        producer.push_slice(&[1, 2]);
        let health = StreamHealth::default();
        health.report("device unplugged");

        let error = drain(&producer, 1, &health, DRAIN_SLACK).await.unwrap_err();
        assert!(matches!(error, SpeechError::Playback(_)));
    }

    #[tokio::test]
    async fn drain_gives_up_when_nothing_consumes() {
        let (mut producer, _consumer) = HeapRb::<i16>::new(8).split();
        producer.push_slice(&[1, 2, 3, 4]);

        let error = drain(&producer, 2, &StreamHealth::default(), Duration::from_millis(50))
            .await
            .unwrap_err();
        match error {
            SpeechError::Playback(reason) => assert!(reason.contains("stalled")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn drain_returns_once_empty() {
        let (producer, _consumer) = HeapRb::<i16>::new(8).split();
        drain(&producer, 2, &StreamHealth::default(), Duration::ZERO).await.unwrap();
    }

    #[test]
    fn fill_pads_with_silence() {
        let (mut producer, mut consumer) = HeapRb::<i16>::new(16).split();
        producer.push_slice(&[5, 5, 6, 6]);

        let mut data = [9i16; 6];
        fill(&mut data, &mut consumer, 2, |sample| sample, 0);

        assert_eq!(data, [5, 5, 6, 6, 0, 0]);
        assert!(consumer.is_empty());
    }

    #[test]
    fn fill_never_splits_a_frame() {
        let (mut producer, mut consumer) = HeapRb::<i16>::new(16).split();
        producer.push_slice(&[1, 1, 2, 2, 3, 3]);

        let mut data = [0.5f32; 3];
        fill(&mut data, &mut consumer, 2, |sample| f32::from(sample), 0.0);

        assert_eq!(data, [1.0, 1.0, 0.0]);
        assert_eq!(consumer.len(), 4);
    }
}
