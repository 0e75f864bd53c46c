use handmade_common::audio::{device_period, AudioDriver, CircularBuffer, SharedCircularBuffer};
use handmade_core::ring_buffer::SoundFormat;

use std::error;

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::Sdl;

use tracing::{debug, warn};

/// Plays a `CircularBuffer` through an SDL playback device. The device's callback thread plays
/// the part of the hardware, draining the buffer and moving its play cursor.
pub struct SdlAudioDriver {
    device: AudioDevice<SampleCallback>,
    sound_buffer: SharedCircularBuffer,
}

impl SdlAudioDriver {
    pub fn new(
        sdl_context: &Sdl,
        format: SoundFormat,
        buffer_size: u32,
        latency_sample_count: u32,
    ) -> Result<SdlAudioDriver, Box<dyn error::Error>> {
        let sound_buffer = SharedCircularBuffer::new(CircularBuffer::new(format, buffer_size)?);

        let audio_subsystem = sdl_context.audio()?;

        let desired_spec = AudioSpecDesired {
            freq: Some(format.samples_per_second as i32),
            channels: Some(format.channels as u8),
            samples: Some(device_period(latency_sample_count)),
        };

        let device = audio_subsystem.open_playback(None, &desired_spec, |spec| {
            debug!(
                "audio device: {} Hz, {} channels, {} sample frames per callback",
                spec.freq, spec.channels, spec.samples
            );
            // The device reads a whole period ahead of what is audible.
            sound_buffer.set_write_lead(spec.samples as u32);
            SampleCallback {
                sound_buffer: sound_buffer.clone(),
            }
        })?;

        let period = device.spec().samples as u32;
        if period >= latency_sample_count {
            return Err(format!(
                "audio device pulls {} sample frames per callback, more than the {} frame latency",
                period, latency_sample_count
            )
            .into());
        }

        if device.spec().freq as u32 != format.samples_per_second {
            warn!(
                "audio device opened at {} Hz instead of {} Hz",
                device.spec().freq,
                format.samples_per_second
            );
        }

        // The callback outputs silence until the frame loop starts playback.
        device.resume();

        Ok(SdlAudioDriver {
            device,
            sound_buffer,
        })
    }
}

impl AudioDriver for SdlAudioDriver {
    type Buffer = SharedCircularBuffer;

    fn sound_buffer(&self) -> Self::Buffer {
        self.sound_buffer.clone()
    }

    fn sample_rate(&self) -> u32 {
        self.device.spec().freq as u32
    }
}

struct SampleCallback {
    sound_buffer: SharedCircularBuffer,
}

impl AudioCallback for SampleCallback {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        self.sound_buffer.read_samples(out);
    }
}
