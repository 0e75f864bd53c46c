use handmade_core::ring_buffer::{FormatError, SoundFormat};

use super::{AudioDriver, CircularBuffer};

/// Hands out circular buffers that no device ever reads. The play cursor stays at zero, so
/// after the first fill every frame's lock region is empty.
pub struct NullAudioDriver {
    buffer: CircularBuffer,
}

impl NullAudioDriver {
    pub fn new(format: SoundFormat, buffer_size: u32) -> Result<NullAudioDriver, FormatError> {
        Ok(NullAudioDriver {
            buffer: CircularBuffer::new(format, buffer_size)?,
        })
    }
}

impl AudioDriver for NullAudioDriver {
    type Buffer = CircularBuffer;

    fn sound_buffer(&self) -> Self::Buffer {
        self.buffer.clone()
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.format().samples_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handmade_core::frame_driver::{DriverSettings, FrameDriver};

    #[test]
    fn frames_run_without_a_device() {
        let settings = DriverSettings::new(48000);
        let driver = NullAudioDriver::new(settings.format, settings.buffer_size).unwrap();
        assert_eq!(driver.sample_rate(), 48000);

        let mut sound_buffer = driver.sound_buffer();
        let mut frame_driver = FrameDriver::new(settings).unwrap();
        assert_eq!(frame_driver.advance_frame(&mut sound_buffer), Ok(3200));
        assert_eq!(frame_driver.advance_frame(&mut sound_buffer), Ok(0));
        assert!(sound_buffer.is_playing());
    }

    #[test]
    fn rejects_unaligned_buffer() {
        assert!(NullAudioDriver::new(SoundFormat::stereo_16(48000), 1001).is_err());
    }
}
