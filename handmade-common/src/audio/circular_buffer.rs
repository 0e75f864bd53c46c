//! A software stand-in for a hardware secondary sound buffer.
//!
//! The application side sees the `SoundBuffer` interface: cursors, two-region locks, looping
//! playback. The device side (an audio callback thread) drains it with `read_samples`, which
//! moves the play cursor forward exactly like a sound card would.

use handmade_core::ring_buffer::{FormatError, SoundFormat};
use handmade_core::sink::{Cursors, DeviceError, LockedRange, SoundBuffer};

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

/// Default gap between the play and write cursors: ten milliseconds of audio.
const WRITE_LEAD_DIVISOR: u32 = 100;

const MIN_DEVICE_PERIOD: u32 = 64;
const MAX_DEVICE_PERIOD: u32 = 4096;

/// Sample frames the device should pull per callback for a given latency: the largest power
/// of two no bigger than a quarter of the latency. A callback that drains more than the
/// latency window in one go runs the play cursor past the application's write position.
pub fn device_period(latency_sample_count: u32) -> u16 {
    let quarter = (latency_sample_count / 4).max(1);
    let period = if quarter.is_power_of_two() {
        quarter
    } else {
        quarter.next_power_of_two() / 2
    };
    period.clamp(MIN_DEVICE_PERIOD, MAX_DEVICE_PERIOD) as u16
}

#[derive(Debug, Clone)]
pub struct CircularBuffer {
    format: SoundFormat,
    memory: Vec<u8>,
    play_cursor: u32,
    write_lead: u32,
    locked: Option<LockedRange>,
    playing: bool,
}

impl CircularBuffer {
    pub fn new(format: SoundFormat, buffer_size: u32) -> Result<CircularBuffer, FormatError> {
        format.validate(buffer_size)?;

        let bytes_per_sample = format.bytes_per_sample();
        let write_lead = (format.samples_per_second / WRITE_LEAD_DIVISOR * bytes_per_sample)
            .min(buffer_size - bytes_per_sample);

        Ok(CircularBuffer {
            format,
            memory: vec![0; buffer_size as usize],
            play_cursor: 0,
            write_lead,
            locked: None,
            playing: false,
        })
    }

    pub fn format(&self) -> SoundFormat {
        self.format
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Sets how far the write cursor runs ahead of the play cursor. A real device reads one
    /// period ahead, so this is normally the callback period.
    pub fn set_write_lead(&mut self, sample_frames: u32) {
        let bytes_per_sample = self.format.bytes_per_sample();
        self.write_lead = sample_frames
            .saturating_mul(bytes_per_sample)
            .min(self.size() - bytes_per_sample);
    }

    /// Device side: copies the next `out.len()` interleaved samples starting at the play
    /// cursor and moves the cursor past them, wrapping at the end. Produces silence and leaves
    /// the cursor alone until playback has started.
    pub fn read_samples(&mut self, out: &mut [i16]) {
        if !self.playing {
            out.fill(0);
            return;
        }

        let size = self.memory.len();
        let mut cursor = self.play_cursor as usize;
        for sample in out.iter_mut() {
            *sample = i16::from_le_bytes([self.memory[cursor], self.memory[cursor + 1]]);
            cursor = (cursor + 2) % size;
        }
        self.play_cursor = cursor as u32;
    }
}

impl SoundBuffer for CircularBuffer {
    fn size(&self) -> u32 {
        self.memory.len() as u32
    }

    fn current_position(&mut self) -> Result<Cursors, DeviceError> {
        Ok(Cursors {
            play: self.play_cursor,
            write: (self.play_cursor + self.write_lead) % self.size(),
        })
    }

    fn lock(&mut self, offset: u32, bytes: u32) -> Result<LockedRange, DeviceError> {
        if self.locked.is_some() {
            return Err(DeviceError::AlreadyLocked);
        }
        let range = LockedRange::split(offset, bytes, self.size())?;
        self.locked = Some(range);
        Ok(range)
    }

    fn write_regions(&mut self, range: &LockedRange, fill: &mut dyn FnMut(&mut [u8], &mut [u8])) {
        if self.locked.as_ref() != Some(range) {
            warn!("write to a sound buffer range that is not locked");
            return;
        }

        let (head, tail) = self.memory.split_at_mut(range.offset as usize);
        fill(
            &mut tail[..range.first_len as usize],
            &mut head[..range.second_len as usize],
        );
    }

    fn unlock(&mut self, range: LockedRange) {
        match self.locked.take() {
            Some(locked) if locked == range => {}
            other => {
                warn!("{}", DeviceError::NotLocked);
                self.locked = other;
            }
        }
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.playing = true;
        Ok(())
    }
}

/// A `CircularBuffer` shared between the frame loop and the audio callback thread.
#[derive(Debug, Clone)]
pub struct SharedCircularBuffer {
    inner: Arc<Mutex<CircularBuffer>>,
    size: u32,
}

impl SharedCircularBuffer {
    pub fn new(buffer: CircularBuffer) -> SharedCircularBuffer {
        SharedCircularBuffer {
            size: buffer.size(),
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Device side of the buffer. Outputs silence if the application side panicked while
    /// holding the buffer.
    pub fn read_samples(&self, out: &mut [i16]) {
        match self.inner.lock() {
            Ok(mut buffer) => buffer.read_samples(out),
            Err(_) => out.fill(0),
        }
    }

    pub fn set_write_lead(&self, sample_frames: u32) {
        match self.buffer() {
            Ok(mut buffer) => buffer.set_write_lead(sample_frames),
            Err(e) => warn!("{}", e),
        }
    }

    fn buffer(&self) -> Result<MutexGuard<'_, CircularBuffer>, DeviceError> {
        self.inner.lock().map_err(|_| DeviceError::Lost)
    }
}

impl SoundBuffer for SharedCircularBuffer {
    fn size(&self) -> u32 {
        self.size
    }

    fn current_position(&mut self) -> Result<Cursors, DeviceError> {
        self.buffer()?.current_position()
    }

    fn lock(&mut self, offset: u32, bytes: u32) -> Result<LockedRange, DeviceError> {
        self.buffer()?.lock(offset, bytes)
    }

    fn write_regions(&mut self, range: &LockedRange, fill: &mut dyn FnMut(&mut [u8], &mut [u8])) {
        match self.buffer() {
            Ok(mut buffer) => buffer.write_regions(range, fill),
            Err(e) => warn!("{}", e),
        }
    }

    fn unlock(&mut self, range: LockedRange) {
        match self.buffer() {
            Ok(mut buffer) => buffer.unlock(range),
            Err(e) => warn!("{}", e),
        }
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.buffer()?.play()
    }
}
