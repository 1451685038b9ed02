//! Real-time audio output via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Output stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Sample rate in Hz. The device is asked for this rate; host mixers
    /// resample when they must.
    pub sample_rate: u32,
    /// Output device name (uses default if `None`).
    pub output_device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            output_device: None,
        }
    }
}

/// List all available audio output devices.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                let sample_rate = device
                    .default_output_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(48000);

                devices.push(AudioDevice {
                    name,
                    default_sample_rate: sample_rate,
                });
            }
        }
    }

    Ok(devices)
}

/// Get the default audio output device info.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();

    Ok(host.default_output_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            default_sample_rate: d
                .default_output_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000),
        })
    }))
}

/// Real-time output-only audio stream.
///
/// The stream runs until [`stop`](Self::stop) or drop; the generate
/// callback fills interleaved f32 buffers on the audio thread.
pub struct OutputStream {
    #[allow(dead_code)]
    host: Host,
    device: Device,
    config: StreamConfig,
    running: Arc<AtomicBool>,
    _stream: Option<Stream>,
}

impl OutputStream {
    /// Create an output stream on the configured (or default) device.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();

        let device = match &config.output_device {
            Some(name) => find_output_device(&host, name)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        tracing::info!(
            device = device_name(&device).unwrap_or_else(|_| "unknown".into()),
            sample_rate = config.sample_rate,
            "opened output device"
        );

        Ok(Self {
            host,
            device,
            config,
            running: Arc::new(AtomicBool::new(false)),
            _stream: None,
        })
    }

    /// Output channel count of the device.
    pub fn channels(&self) -> u16 {
        self.device
            .default_output_config()
            .map(|c| c.channels())
            .unwrap_or(2)
    }

    /// Start the stream with a generate callback.
    ///
    /// Returns immediately; the callback keeps running on the audio thread
    /// until [`stop`](Self::stop). A stopped stream writes silence rather
    /// than stale audio.
    pub fn start<F>(&mut self, mut generate: F) -> Result<()>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let default_config = self
            .device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        let stream_config = cpal::StreamConfig {
            channels: default_config.channels(),
            sample_rate: self.config.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let stream = self
            .device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if running.load(Ordering::SeqCst) {
                        generate(data);
                    } else {
                        data.fill(0.0);
                    }
                },
                |err| tracing::error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        self._stream = Some(stream);

        Ok(())
    }

    /// Stop the audio stream. The device is released when the stream drops.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the stream is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Find an output device by exact name, partial name, or index.
///
/// The `name_or_index` can be:
/// - A numeric index (e.g., "0", "1")
/// - An exact device name
/// - A partial device name (case-insensitive fuzzy match)
fn find_output_device(host: &Host, name_or_index: &str) -> Result<Device> {
    let devices: Vec<_> = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    // Try parsing as index first
    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    // Try exact match
    for device in &devices {
        if device_name(device).is_ok_and(|n| n == name_or_index) {
            return Ok(device.clone());
        }
    }

    // Try case-insensitive partial match
    let search_lower = name_or_index.to_lowercase();
    let mut matches: Vec<_> = devices
        .iter()
        .filter_map(|d| {
            device_name(d).ok().and_then(|name| {
                if name.to_lowercase().contains(&search_lower) {
                    Some((d.clone(), name))
                } else {
                    None
                }
            })
        })
        .collect();

    match matches.len() {
        0 => Err(Error::DeviceNotFound(format!(
            "no output device matching '{name_or_index}'"
        ))),
        1 => Ok(matches.remove(0).0),
        _ => {
            let names: Vec<_> = matches.iter().map(|(_, n)| n.as_str()).collect();
            tracing::warn!(
                "'{}' matches multiple output devices: {:?}; using {}",
                name_or_index,
                names,
                names[0]
            );
            Ok(matches.remove(0).0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices() {
        // Verifies the call doesn't panic; actual device availability
        // depends on the system
        let result = list_output_devices();
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_device() {
        let result = default_output_device();
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert!(config.output_device.is_none());
    }
}
