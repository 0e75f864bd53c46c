//! Startup settings. `Default` gives a 48 kHz stereo stream with a one second buffer, a 256 Hz
//! tone and an 800x600 backbuffer stretched over a 1280x720 window.

use handmade_core::frame_driver::{DEFAULT_MAX_CONSECUTIVE_QUERY_FAILURES, DriverSettings};
use handmade_core::ring_buffer::SoundFormat;
use handmade_core::sound::{DEFAULT_TONE_HZ, DEFAULT_TONE_VOLUME, ToneParameters};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub sound: SoundConfig,
    pub window: WindowConfig,
    pub frame_loop: LoopConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundConfig {
    pub enabled: bool,
    pub samples_per_second: u32,
    pub channels: u16,
    pub tone_hz: u32,
    pub tone_volume: i16,
    /// Latency is `samples_per_second / latency_divisor` sample frames.
    pub latency_divisor: u32,
    pub buffer_seconds: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            enabled: true,
            samples_per_second: 48000,
            channels: 2,
            tone_hz: DEFAULT_TONE_HZ,
            tone_volume: DEFAULT_TONE_VOLUME,
            latency_divisor: 15,
            buffer_seconds: 1,
        }
    }
}

impl SoundConfig {
    pub fn format(&self) -> SoundFormat {
        SoundFormat {
            channels: self.channels,
            ..SoundFormat::stereo_16(self.samples_per_second)
        }
    }

    pub fn buffer_size(&self) -> u32 {
        self.format()
            .bytes_per_second()
            .saturating_mul(self.buffer_seconds.max(1))
    }

    pub fn latency_sample_count(&self) -> u32 {
        self.samples_per_second / self.latency_divisor.max(1)
    }

    pub fn tone(&self) -> ToneParameters {
        ToneParameters {
            tone_hz: self.tone_hz,
            volume: self.tone_volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backbuffer_width: usize,
    pub backbuffer_height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Handmade".to_owned(),
            width: 1280,
            height: 720,
            backbuffer_width: 800,
            backbuffer_height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    pub target_frames_per_second: u32,
    pub max_consecutive_query_failures: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            target_frames_per_second: 60,
            max_consecutive_query_failures: DEFAULT_MAX_CONSECUTIVE_QUERY_FAILURES,
        }
    }
}

impl Config {
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            format: self.sound.format(),
            buffer_size: self.sound.buffer_size(),
            latency_sample_count: self.sound.latency_sample_count(),
            framebuffer_width: self.window.backbuffer_width,
            framebuffer_height: self.window.backbuffer_height,
            tone: self.sound.tone(),
            max_consecutive_query_failures: self.frame_loop.max_consecutive_query_failures,
        }
    }
}
