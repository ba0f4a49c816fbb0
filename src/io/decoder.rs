//! Audio decoding using Symphonia
//!
//! Decodes any container/codec pair registered in Symphonia's default
//! registry into mono `f32` samples at the stream's native sample rate. No
//! resampling is performed. Multi-channel audio is averaged to mono.

use super::AudioSignal;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to a mono signal
///
/// The file extension, when present, is passed to the format probe as a
/// hint. The file itself is only read, never moved or deleted.
///
/// # Errors
///
/// Returns `AnalysisError::Io` if the file cannot be opened and
/// `AnalysisError::DecodingError` if no decodable audio track is found.
/// A stream that decodes to zero samples is *not* an error here; the
/// pipeline reports it as [`AnalysisError::EmptyAudio`].
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioSignal, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path)?;
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    decode_source(Box::new(file), hint)
}

/// Decode an in-memory audio buffer to a mono signal
///
/// # Arguments
///
/// * `bytes` - Encoded audio (e.g. the full contents of a WAV file)
/// * `extension` - Optional format hint such as `"wav"`
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<AudioSignal, AnalysisError> {
    log::debug!("Decoding {} bytes of in-memory audio", bytes.len());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    decode_source(Box::new(Cursor::new(bytes)), hint)
}

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<AudioSignal, AnalysisError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Stream has no sample rate".to_string()))?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend(downmix_interleaved(buffer.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupt packets are skipped rather than failing the whole file
                skipped_packets += 1;
                log::warn!("Skipping undecodable packet: {}", msg);
            }
            Err(err) => return Err(err.into()),
        }
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz ({} packets skipped)",
        samples.len(),
        sample_rate,
        skipped_packets
    );

    Ok(AudioSignal::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_mono_wav() {
        let pcm: Vec<i16> = (0..4000).map(|i| ((i % 100) as i16 - 50) * 200).collect();
        let signal = decode_bytes(wav_bytes(&pcm, 1, 16000), Some("wav")).unwrap();

        assert_eq!(signal.sample_rate, 16000);
        assert_eq!(signal.len(), 4000);
        assert!((signal.samples[0] - (-50.0 * 200.0 / 32768.0)).abs() < 1e-4);
    }

    #[test]
    fn test_decode_stereo_is_downmixed() {
        // Left = +0.5 full scale, right = -0.5: average is silence
        let mut pcm = Vec::new();
        for _ in 0..1000 {
            pcm.push(16384i16);
            pcm.push(-16384i16);
        }
        let signal = decode_bytes(wav_bytes(&pcm, 2, 22050), Some("wav")).unwrap();

        assert_eq!(signal.sample_rate, 22050);
        assert_eq!(signal.len(), 1000);
        assert!(signal.samples.iter().all(|s| s.abs() < 1e-4));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_bytes(vec![0x13; 512], None);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_file("/nonexistent/voice.wav");
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }
}
