use super::DeviceError;

/// Hardware read and write positions inside the circular buffer, in bytes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Cursors {
    pub play: u32,
    pub write: u32,
}

/// A byte range handed out by `SoundBuffer::lock`.
///
/// The first region starts at `offset`. The second region always starts at byte 0 and is only
/// non-empty when the range wraps past the end of the buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LockedRange {
    pub offset: u32,
    pub first_len: u32,
    pub second_len: u32,
}

impl LockedRange {
    pub fn split(offset: u32, bytes: u32, buffer_size: u32) -> Result<LockedRange, DeviceError> {
        if offset >= buffer_size || bytes > buffer_size {
            return Err(DeviceError::OutOfBounds {
                offset,
                bytes,
                buffer_size,
            });
        }

        let first_len = bytes.min(buffer_size - offset);
        Ok(LockedRange {
            offset,
            first_len,
            second_len: bytes - first_len,
        })
    }

    pub fn len(&self) -> u32 {
        self.first_len + self.second_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The platform's looping secondary buffer. Its play cursor moves on its own while the
/// application writes ahead of it.
pub trait SoundBuffer {
    fn size(&self) -> u32;

    fn current_position(&mut self) -> Result<Cursors, DeviceError>;

    /// Begins exclusive write access to `bytes` bytes starting at `offset`. Every successful
    /// call must be paired with exactly one `unlock` of the returned range.
    fn lock(&mut self, offset: u32, bytes: u32) -> Result<LockedRange, DeviceError>;

    /// Hands the two views of a locked range to `fill`.
    fn write_regions(&mut self, range: &LockedRange, fill: &mut dyn FnMut(&mut [u8], &mut [u8]));

    fn unlock(&mut self, range: LockedRange);

    /// Starts looping playback.
    fn play(&mut self) -> Result<(), DeviceError>;
}

impl<B: SoundBuffer + ?Sized> SoundBuffer for Box<B> {
    fn size(&self) -> u32 {
        (**self).size()
    }

    fn current_position(&mut self) -> Result<Cursors, DeviceError> {
        (**self).current_position()
    }

    fn lock(&mut self, offset: u32, bytes: u32) -> Result<LockedRange, DeviceError> {
        (**self).lock(offset, bytes)
    }

    fn write_regions(&mut self, range: &LockedRange, fill: &mut dyn FnMut(&mut [u8], &mut [u8])) {
        (**self).write_regions(range, fill);
    }

    fn unlock(&mut self, range: LockedRange) {
        (**self).unlock(range);
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        (**self).play()
    }
}

/// Exclusive write access to a locked range. The range is unlocked when the guard drops, on
/// every exit path.
pub struct Lock<'a, B: SoundBuffer + ?Sized> {
    buffer: &'a mut B,
    range: LockedRange,
}

impl<'a, B: SoundBuffer + ?Sized> Lock<'a, B> {
    pub fn acquire(buffer: &'a mut B, offset: u32, bytes: u32) -> Result<Self, DeviceError> {
        let range = buffer.lock(offset, bytes)?;
        Ok(Lock { buffer, range })
    }

    pub fn range(&self) -> LockedRange {
        self.range
    }

    /// Copies interleaved 16-bit samples into the locked regions as little-endian PCM, first
    /// region then second. Returns the number of bytes written.
    pub fn write_samples(&mut self, samples: &[i16]) -> usize {
        let mut source = samples.iter().flat_map(|sample| sample.to_le_bytes());
        let mut written = 0;
        self.buffer.write_regions(&self.range, &mut |first, second| {
            for dest in first.iter_mut().chain(second.iter_mut()) {
                match source.next() {
                    Some(byte) => {
                        *dest = byte;
                        written += 1;
                    }
                    None => break,
                }
            }
        });
        written
    }

    pub fn fill_silence(&mut self) {
        self.buffer.write_regions(&self.range, &mut |first, second| {
            first.fill(0);
            second.fill(0);
        });
    }
}

impl<B: SoundBuffer + ?Sized> Drop for Lock<'_, B> {
    fn drop(&mut self) {
        self.buffer.unlock(self.range);
    }
}
