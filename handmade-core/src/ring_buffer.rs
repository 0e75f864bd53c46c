//! Tracks the application's write position inside the hardware's looping sound buffer and
//! decides, once per frame, which bytes are safe to overwrite.
//!
//! The play cursor is owned by the device and moves on its own. The application keeps a
//! running count of sample frames it has written; that count modulo the buffer length is the
//! next byte to write. Each frame the writable range runs from there up to
//! `latency_sample_count` frames past the play cursor.

use crate::sink::Cursors;

use thiserror::Error;

/// PCM layout of the sound buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SoundFormat {
    pub samples_per_second: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl SoundFormat {
    pub fn stereo_16(samples_per_second: u32) -> SoundFormat {
        SoundFormat {
            samples_per_second,
            channels: 2,
            bits_per_sample: 16,
        }
    }

    /// Size of one sample frame across all channels (the block align).
    pub fn bytes_per_sample(&self) -> u32 {
        self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    pub fn bytes_per_second(&self) -> u32 {
        self.samples_per_second * self.bytes_per_sample()
    }

    /// Checks that this is a 16-bit PCM layout and that `buffer_size` holds a whole number of
    /// sample frames.
    pub fn validate(&self, buffer_size: u32) -> Result<(), FormatError> {
        if self.samples_per_second == 0 {
            return Err(FormatError::ZeroSampleRate);
        }
        if self.channels == 0 {
            return Err(FormatError::ZeroChannels);
        }
        if self.bits_per_sample != 16 {
            return Err(FormatError::UnsupportedBitDepth(self.bits_per_sample));
        }

        let bytes_per_sample = self.bytes_per_sample();
        if buffer_size == 0 || buffer_size % bytes_per_sample != 0 {
            return Err(FormatError::BufferNotAligned {
                buffer_size,
                bytes_per_sample,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("channel count must be non-zero")]
    ZeroChannels,

    #[error("{0} channels are not supported")]
    UnsupportedChannelCount(u16),

    #[error("{0} bits per sample is not supported")]
    UnsupportedBitDepth(u16),

    #[error("buffer of {buffer_size} bytes is not a whole number of {bytes_per_sample} byte frames")]
    BufferNotAligned {
        buffer_size: u32,
        bytes_per_sample: u32,
    },

    #[error("latency of {latency_sample_count} samples must be at least one and fit a {buffer_samples} sample buffer")]
    InvalidLatency {
        latency_sample_count: u32,
        buffer_samples: u32,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("play cursor {cursor} is outside the {buffer_size} byte buffer")]
    OutOfRange { cursor: u32, buffer_size: u32 },

    #[error("play cursor moved backward from {previous} to {current}")]
    MovedBackward { previous: u32, current: u32 },
}

/// The byte range to fill this frame. Derived fresh every frame and never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LockRegion {
    pub byte_to_lock: u32,
    pub bytes_to_write: u32,
}

pub struct RingBufferState {
    format: SoundFormat,
    buffer_size: u32,
    // Sample frames logically written since the stream opened. Never decreases.
    sample_index: u64,
    latency_sample_count: u32,
    last_play_cursor: Option<u32>,
}

impl RingBufferState {
    pub fn new(
        format: SoundFormat,
        buffer_size: u32,
        latency_sample_count: u32,
    ) -> Result<RingBufferState, FormatError> {
        format.validate(buffer_size)?;

        let buffer_samples = buffer_size / format.bytes_per_sample();
        if latency_sample_count == 0 || latency_sample_count >= buffer_samples {
            return Err(FormatError::InvalidLatency {
                latency_sample_count,
                buffer_samples,
            });
        }

        Ok(RingBufferState {
            format,
            buffer_size,
            sample_index: 0,
            latency_sample_count,
            last_play_cursor: None,
        })
    }

    pub fn format(&self) -> SoundFormat {
        self.format
    }

    pub fn samples_per_second(&self) -> u32 {
        self.format.samples_per_second
    }

    pub fn bytes_per_sample(&self) -> u32 {
        self.format.bytes_per_sample()
    }

    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    pub fn latency_sample_count(&self) -> u32 {
        self.latency_sample_count
    }

    pub fn latency_bytes(&self) -> u32 {
        self.latency_sample_count * self.bytes_per_sample()
    }

    /// The next byte the application will write.
    pub fn byte_to_lock(&self) -> u32 {
        let buffer_samples = (self.buffer_size / self.bytes_per_sample()) as u64;
        (self.sample_index % buffer_samples) as u32 * self.bytes_per_sample()
    }

    /// Where writing should stop: `latency_sample_count` frames past the play cursor.
    pub fn target_cursor(&self, play_cursor: u32) -> u32 {
        ((play_cursor as u64 + self.latency_bytes() as u64) % self.buffer_size as u64) as u32
    }

    /// Computes the range to overwrite for the given play cursor. Pure: nothing is mutated.
    pub fn compute_lock_region(&self, play_cursor: u32) -> Result<LockRegion, CursorError> {
        self.check_range(play_cursor)?;

        let byte_to_lock = self.byte_to_lock();
        let target_cursor = self.target_cursor(play_cursor);

        let bytes_to_write = if byte_to_lock == target_cursor {
            0
        } else if byte_to_lock > target_cursor {
            (self.buffer_size - byte_to_lock) + target_cursor
        } else {
            target_cursor - byte_to_lock
        };

        Ok(LockRegion {
            byte_to_lock,
            bytes_to_write,
        })
    }

    /// Forward distance from the play cursor to the next byte the application will write.
    pub fn lead_bytes(&self, play_cursor: u32) -> u32 {
        self.forward_distance(play_cursor, self.byte_to_lock())
    }

    /// True when the play cursor has passed data the application has not written yet, so the
    /// next write position is no longer inside the latency window.
    pub fn is_lapped(&self, play_cursor: u32) -> bool {
        self.lead_bytes(play_cursor) > self.latency_bytes()
    }

    /// Validates a freshly polled play cursor against the buffer bounds and the previous poll.
    ///
    /// A jump of more than half the buffer is read as the cursor moving backward. The tracker
    /// re-anchors on the new position either way so one bad poll does not poison the next.
    pub fn observe_play_cursor(&mut self, play_cursor: u32) -> Result<(), CursorError> {
        self.check_range(play_cursor)?;

        let previous = self.last_play_cursor.replace(play_cursor);
        match previous {
            Some(previous)
                if self.forward_distance(previous, play_cursor) > self.buffer_size / 2 =>
            {
                Err(CursorError::MovedBackward {
                    previous,
                    current: play_cursor,
                })
            }
            _ => Ok(()),
        }
    }

    /// Records that `samples` frames were written at `byte_to_lock`.
    pub fn advance(&mut self, samples: u32) {
        self.sample_index += samples as u64;
    }

    /// Moves the write position forward so it sits inside the latency window again.
    ///
    /// Prefers the hardware write cursor when it is inside the window, otherwise restarts at the
    /// play cursor. Returns the number of sample frames skipped.
    pub fn resync(&mut self, cursors: Cursors) -> u64 {
        let bytes_per_sample = self.bytes_per_sample();
        let write_lead = self.forward_distance(cursors.play, cursors.write);
        let anchor = if write_lead + bytes_per_sample <= self.latency_bytes() {
            cursors.write
        } else {
            cursors.play
        };

        let skip_bytes = self.forward_distance(self.byte_to_lock(), anchor);
        let skipped = skip_bytes.div_ceil(bytes_per_sample) as u64;
        self.sample_index += skipped;
        skipped
    }

    fn check_range(&self, play_cursor: u32) -> Result<(), CursorError> {
        if play_cursor >= self.buffer_size {
            Err(CursorError::OutOfRange {
                cursor: play_cursor,
                buffer_size: self.buffer_size,
            })
        } else {
            Ok(())
        }
    }

    fn forward_distance(&self, from: u32, to: u32) -> u32 {
        ((to as u64 + self.buffer_size as u64 - from as u64) % self.buffer_size as u64) as u32
    }
}
