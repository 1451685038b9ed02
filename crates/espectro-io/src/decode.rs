//! Audio file decoding via symphonia.
//!
//! Format validation is a thin extension guard in front of the decoder:
//! files that do not look like audio are rejected before any playback state
//! is built, so a bad selection never leaves a half-wired pipeline behind.

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::{Error, Result};

/// File extensions accepted by the loader.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "m4a", "flac"];

/// Whether a path carries one of the supported audio extensions.
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|&s| s == ext)
        })
}

/// A decoded track: mono samples plus the rate they were decoded at.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Mono samples in `[-1, 1]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioData {
    /// Track duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file to mono f32 samples.
///
/// The extension guard runs first; decode failures propagate as
/// [`Error::Decode`] and leave no partial state behind.
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    if !is_supported_file(path) {
        return Err(Error::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        ));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

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
        .ok_or(Error::NoAudioTrack)?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(Error::UnknownSampleRate)?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A corrupt packet is recoverable; skip it
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let interleaved = sample_buf.samples();

        if channels == 1 {
            samples.extend_from_slice(interleaved);
        } else {
            for frame in interleaved.chunks(channels) {
                let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
                samples.push(mono);
            }
        }
    }

    tracing::info!(
        samples = samples.len(),
        sample_rate,
        duration = samples.len() as f32 / sample_rate as f32,
        "decoded audio file"
    );

    Ok(AudioData {
        samples,
        sample_rate,
    })
}
