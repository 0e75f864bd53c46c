//! One iteration of the frame loop: poll the play cursor, work out the lock region, let the
//! game produce exactly that many samples and this frame's pixels, copy the samples into the
//! sound buffer and present the pixels.

use crate::error::{AudioError, StartupError};
use crate::framebuffer::{AllocationError, Framebuffer, HeapAllocator, PixelAllocator};
use crate::game::Game;
use crate::ring_buffer::{FormatError, LockRegion, RingBufferState, SoundFormat};
use crate::sink::{DeviceError, Lock, SoundBuffer, Surface};
use crate::sound::{SoundOutputBuffer, ToneParameters};

use tracing::{debug, error, info, trace, warn};

pub const DEFAULT_MAX_CONSECUTIVE_QUERY_FAILURES: u32 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    pub format: SoundFormat,
    pub buffer_size: u32,
    pub latency_sample_count: u32,
    pub framebuffer_width: usize,
    pub framebuffer_height: usize,
    pub tone: ToneParameters,
    pub max_consecutive_query_failures: u32,
}

impl DriverSettings {
    /// One second of 16-bit stereo at `samples_per_second`, with a fifteenth of a second of
    /// latency and an 800x600 framebuffer.
    pub fn new(samples_per_second: u32) -> DriverSettings {
        let format = SoundFormat::stereo_16(samples_per_second);
        DriverSettings {
            format,
            buffer_size: format.bytes_per_second(),
            latency_sample_count: samples_per_second / 15,
            framebuffer_width: 800,
            framebuffer_height: 600,
            tone: ToneParameters::default(),
            max_consecutive_query_failures: DEFAULT_MAX_CONSECUTIVE_QUERY_FAILURES,
        }
    }
}

/// What happened during one call to `FrameDriver::run_frame`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub audio: Result<u32, AudioError>,
    pub rendered: bool,
    pub presented: bool,
}

impl FrameReport {
    pub fn samples_written(&self) -> u32 {
        *self.audio.as_ref().unwrap_or(&0)
    }
}

/// Owns the ring buffer state, the framebuffer and the game for the lifetime of the stream.
pub struct FrameDriver<A: PixelAllocator = HeapAllocator> {
    ring: RingBufferState,
    framebuffer: Framebuffer<A>,
    game: Game,
    samples: Vec<i16>,
    sound_is_playing: bool,
    consecutive_query_failures: u32,
    max_consecutive_query_failures: u32,
    samples_written: u64,
}

impl FrameDriver<HeapAllocator> {
    pub fn new(settings: DriverSettings) -> Result<Self, StartupError> {
        FrameDriver::with_allocator(settings, HeapAllocator)
    }
}

impl<A: PixelAllocator> FrameDriver<A> {
    pub fn with_allocator(settings: DriverSettings, allocator: A) -> Result<Self, StartupError> {
        let ring = RingBufferState::new(
            settings.format,
            settings.buffer_size,
            settings.latency_sample_count,
        )?;
        if settings.format.channels != 2 {
            return Err(FormatError::UnsupportedChannelCount(settings.format.channels).into());
        }

        let framebuffer = Framebuffer::with_allocator(
            allocator,
            settings.framebuffer_width,
            settings.framebuffer_height,
        )?;

        // Room for a full buffer of interleaved samples; no frame ever needs more.
        let sample_values = (settings.buffer_size / ring.bytes_per_sample()) as usize * 2;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(sample_values)
            .map_err(|_| AllocationError {
                bytes: sample_values * 2,
            })?;
        samples.resize(sample_values, 0);

        info!(
            "sound stream: {} Hz, {} byte buffer, {} samples of latency",
            settings.format.samples_per_second,
            settings.buffer_size,
            settings.latency_sample_count
        );

        Ok(FrameDriver {
            ring,
            framebuffer,
            game: Game::new(settings.tone),
            samples,
            sound_is_playing: false,
            consecutive_query_failures: 0,
            max_consecutive_query_failures: settings.max_consecutive_query_failures.max(1),
            samples_written: 0,
        })
    }

    pub fn ring(&self) -> &RingBufferState {
        &self.ring
    }

    pub fn framebuffer(&self) -> &Framebuffer<A> {
        &self.framebuffer
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn sound_is_playing(&self) -> bool {
        self.sound_is_playing
    }

    pub fn consecutive_query_failures(&self) -> u32 {
        self.consecutive_query_failures
    }

    /// Total sample frames copied into the sound buffer since startup.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Replaces the framebuffer's memory. On failure the framebuffer stays empty and frames
    /// are neither rendered nor presented until a later resize succeeds.
    pub fn resize_framebuffer(&mut self, width: usize, height: usize) -> Result<(), AllocationError> {
        self.framebuffer.resize(width, height).inspect_err(|e| {
            warn!("{}; rendering disabled until the next resize", e);
        })
    }

    /// Writes silence over the whole sound buffer. Call before playback starts.
    pub fn clear_sound_buffer<B>(&mut self, sound_buffer: &mut B) -> Result<(), DeviceError>
    where
        B: SoundBuffer + ?Sized,
    {
        let mut lock = Lock::acquire(sound_buffer, 0, self.ring.buffer_size())?;
        lock.fill_silence();
        Ok(())
    }

    /// One audio fill cycle on its own. Returns the number of sample frames written.
    pub fn advance_frame<B>(&mut self, sound_buffer: &mut B) -> Result<u32, AudioError>
    where
        B: SoundBuffer + ?Sized,
    {
        let region = self.plan_audio(sound_buffer)?;
        let sample_count = self.sample_count(region);

        let phase = self.game.phase();
        let samples_per_second = self.ring.samples_per_second();
        let mut output =
            SoundOutputBuffer::new(samples_per_second, &mut self.samples[..sample_count * 2]);
        self.game.output_sound(&mut output);

        let written = self.write_audio(sound_buffer, region, sample_count, phase);
        self.ensure_playing(sound_buffer);
        written
    }

    /// A full frame: audio fill, game update and presentation to a `dest_width` by
    /// `dest_height` area of `surface`.
    pub fn run_frame<B, S>(
        &mut self,
        sound_buffer: &mut B,
        surface: &mut S,
        dest_width: u32,
        dest_height: u32,
    ) -> FrameReport
    where
        B: SoundBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        let region = self.plan_audio(sound_buffer);
        let sample_count = region.as_ref().map_or(0, |region| self.sample_count(*region));

        let phase = self.game.phase();
        let samples_per_second = self.ring.samples_per_second();
        let mut output =
            SoundOutputBuffer::new(samples_per_second, &mut self.samples[..sample_count * 2]);
        self.game.update_and_render(&mut self.framebuffer, &mut output);
        let rendered = !self.framebuffer.is_empty();

        let audio =
            region.and_then(|region| self.write_audio(sound_buffer, region, sample_count, phase));
        self.ensure_playing(sound_buffer);

        let presented = match self.framebuffer.present(surface, dest_width, dest_height) {
            Ok(presented) => presented,
            Err(e) => {
                warn!("{}", e);
                false
            }
        };

        FrameReport {
            audio,
            rendered,
            presented,
        }
    }

    fn sample_count(&self, region: LockRegion) -> usize {
        (region.bytes_to_write / self.ring.bytes_per_sample()) as usize
    }

    /// Polls the device and works out this frame's lock region.
    fn plan_audio<B>(&mut self, sound_buffer: &mut B) -> Result<LockRegion, AudioError>
    where
        B: SoundBuffer + ?Sized,
    {
        let cursors = match sound_buffer.current_position() {
            Ok(cursors) => cursors,
            Err(e) => return Err(self.query_failed(AudioError::DeviceQueryFailed(e))),
        };
        if let Err(e) = self.ring.observe_play_cursor(cursors.play) {
            return Err(self.query_failed(e.into()));
        }
        if self.consecutive_query_failures > 0 {
            info!(
                "sound device answered again after {} failed queries",
                self.consecutive_query_failures
            );
            self.consecutive_query_failures = 0;
        }

        if self.sound_is_playing && self.ring.is_lapped(cursors.play) {
            let skipped = self.ring.resync(cursors);
            warn!(
                "sound underrun: play cursor {} passed write position, skipped {} samples",
                cursors.play, skipped
            );
        }

        let region = self.ring.compute_lock_region(cursors.play)?;
        trace!(
            "play {} write {} lock {} bytes {}",
            cursors.play, cursors.write, region.byte_to_lock, region.bytes_to_write
        );
        Ok(region)
    }

    fn write_audio<B>(
        &mut self,
        sound_buffer: &mut B,
        region: LockRegion,
        sample_count: usize,
        phase_before: f32,
    ) -> Result<u32, AudioError>
    where
        B: SoundBuffer + ?Sized,
    {
        let bytes_per_sample = self.ring.bytes_per_sample();
        let bytes = sample_count as u32 * bytes_per_sample;

        let mut lock = match Lock::acquire(sound_buffer, region.byte_to_lock, bytes) {
            Ok(lock) => lock,
            Err(e) => {
                // The block is regenerated next frame for the same region.
                self.game.set_phase(phase_before);
                return Err(AudioError::LockFailed(e));
            }
        };
        let written = lock.write_samples(&self.samples[..sample_count * 2]) as u32 / bytes_per_sample;
        drop(lock);

        self.ring.advance(written);
        self.samples_written += written as u64;
        Ok(written)
    }

    fn ensure_playing<B>(&mut self, sound_buffer: &mut B)
    where
        B: SoundBuffer + ?Sized,
    {
        if self.sound_is_playing {
            return;
        }
        match sound_buffer.play() {
            Ok(()) => {
                debug!("sound playback started");
                self.sound_is_playing = true;
            }
            Err(e) => warn!("unable to start sound playback: {}", e),
        }
    }

    fn query_failed(&mut self, error: AudioError) -> AudioError {
        self.consecutive_query_failures += 1;
        let failures = self.consecutive_query_failures;

        if failures >= self.max_consecutive_query_failures {
            if failures == self.max_consecutive_query_failures {
                error!("sound device stopped responding: {}", error);
            }
            return AudioError::DeviceUnresponsive {
                consecutive_failures: failures,
            };
        }
        if failures == 1 {
            warn!("skipping audio fill: {}", error);
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StartupError;
    use crate::ring_buffer::CursorError;
    use crate::sink::{Cursors, DeviceError, LockedRange, MemorySurface};
    use crate::sound::SineWave;

    use std::collections::VecDeque;

    const SAMPLE_RATE: u32 = 48000;

    /// A sound buffer whose cursors and failures are scripted by the test.
    struct ScriptedBuffer {
        memory: Vec<u8>,
        cursors: Cursors,
        query_failures: VecDeque<DeviceError>,
        lock_failures: VecDeque<DeviceError>,
        play_failures: VecDeque<DeviceError>,
        locked: Option<LockedRange>,
        locks: usize,
        unlocks: usize,
        playing: bool,
    }

    impl ScriptedBuffer {
        fn new(size: u32) -> Self {
            ScriptedBuffer {
                memory: vec![0x55; size as usize],
                cursors: Cursors::default(),
                query_failures: VecDeque::new(),
                lock_failures: VecDeque::new(),
                play_failures: VecDeque::new(),
                locked: None,
                locks: 0,
                unlocks: 0,
                playing: false,
            }
        }

        fn move_play_cursor(&mut self, bytes: u32) {
            let size = self.memory.len() as u32;
            self.cursors.play = (self.cursors.play + bytes) % size;
            self.cursors.write = (self.cursors.play + 64) % size;
        }

        fn sample_frame(&self, frame: usize) -> (i16, i16) {
            let at = (frame * 4) % self.memory.len();
            let bytes = &self.memory[at..at + 4];
            (
                i16::from_le_bytes([bytes[0], bytes[1]]),
                i16::from_le_bytes([bytes[2], bytes[3]]),
            )
        }
    }

    impl SoundBuffer for ScriptedBuffer {
        fn size(&self) -> u32 {
            self.memory.len() as u32
        }

        fn current_position(&mut self) -> Result<Cursors, DeviceError> {
            match self.query_failures.pop_front() {
                Some(e) => Err(e),
                None => Ok(self.cursors),
            }
        }

        fn lock(&mut self, offset: u32, bytes: u32) -> Result<LockedRange, DeviceError> {
            if self.locked.is_some() {
                return Err(DeviceError::AlreadyLocked);
            }
            if let Some(e) = self.lock_failures.pop_front() {
                return Err(e);
            }
            let range = LockedRange::split(offset, bytes, self.size())?;
            self.locked = Some(range);
            self.locks += 1;
            Ok(range)
        }

        fn write_regions(&mut self, range: &LockedRange, fill: &mut dyn FnMut(&mut [u8], &mut [u8])) {
            assert_eq!(self.locked.as_ref(), Some(range));
            let (head, tail) = self.memory.split_at_mut(range.offset as usize);
            fill(
                &mut tail[..range.first_len as usize],
                &mut head[..range.second_len as usize],
            );
        }

        fn unlock(&mut self, range: LockedRange) {
            assert_eq!(self.locked.take(), Some(range));
            self.unlocks += 1;
        }

        fn play(&mut self) -> Result<(), DeviceError> {
            match self.play_failures.pop_front() {
                Some(e) => Err(e),
                None => {
                    self.playing = true;
                    Ok(())
                }
            }
        }
    }

    fn small_settings() -> DriverSettings {
        DriverSettings {
            buffer_size: 1000 * 4,
            latency_sample_count: 300,
            framebuffer_width: 8,
            framebuffer_height: 6,
            max_consecutive_query_failures: 3,
            ..DriverSettings::new(SAMPLE_RATE)
        }
    }

    fn continuous_sine(frames: usize) -> Vec<i16> {
        let mut samples = vec![0; frames * 2];
        SineWave::new().output(
            ToneParameters::default(),
            &mut SoundOutputBuffer::new(SAMPLE_RATE, &mut samples),
        );
        samples
    }

    #[test]
    fn default_settings_match_one_second_buffer() {
        let settings = DriverSettings::new(SAMPLE_RATE);
        assert_eq!(settings.buffer_size, 192000);
        assert_eq!(settings.latency_sample_count, 3200);

        let driver = FrameDriver::new(settings).unwrap();
        assert_eq!(driver.ring().latency_bytes(), 12800);
        assert_eq!(driver.framebuffer().width(), 800);
    }

    #[test]
    fn first_frame_fills_latency_and_starts_playback() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);

        assert_eq!(driver.advance_frame(&mut buffer), Ok(300));
        assert_eq!(driver.ring().sample_index(), 300);
        assert_eq!(driver.ring().byte_to_lock(), 1200);
        assert!(buffer.playing);
        assert!(driver.sound_is_playing());
        assert_eq!((buffer.locks, buffer.unlocks), (1, 1));

        // Untouched past the latency window.
        assert_eq!(&buffer.memory[1200..1204], &[0x55; 4]);
    }

    #[test]
    fn caught_up_frame_writes_nothing_but_still_unlocks() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        driver.advance_frame(&mut buffer).unwrap();

        let index = driver.ring().sample_index();
        let phase = driver.game().phase();
        assert_eq!(driver.advance_frame(&mut buffer), Ok(0));
        assert_eq!(driver.ring().sample_index(), index);
        assert_eq!(driver.game().phase(), phase);
        assert_eq!((buffer.locks, buffer.unlocks), (2, 2));
    }

    #[test]
    fn samples_stay_continuous_across_the_wrap() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);

        let mut total = 0;
        total += driver.advance_frame(&mut buffer).unwrap() as usize;
        // 220 frames per poll walks the cursor around the 1000 frame buffer more than once.
        for _ in 0..7 {
            buffer.move_play_cursor(220 * 4);
            total += driver.advance_frame(&mut buffer).unwrap() as usize;
        }
        assert_eq!(total, 300 + 7 * 220);
        assert_eq!(driver.samples_written(), total as u64);

        // The last 1000 frames written are exactly the tail of one uninterrupted sine.
        let expected = continuous_sine(total);
        for frame in total - 1000..total {
            let (left, right) = buffer.sample_frame(frame);
            assert_eq!(left, expected[frame * 2]);
            assert_eq!(right, expected[frame * 2 + 1]);
        }
    }

    #[test]
    fn failed_query_skips_audio_but_presents_video() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        let mut surface = MemorySurface::new(16, 12);
        buffer.query_failures.push_back(DeviceError::Lost);

        let report = driver.run_frame(&mut buffer, &mut surface, 16, 12);
        assert_eq!(
            report.audio,
            Err(AudioError::DeviceQueryFailed(DeviceError::Lost))
        );
        assert_eq!(report.samples_written(), 0);
        assert!(report.rendered);
        assert!(report.presented);
        assert_eq!(surface.blits(), 1);
        assert_eq!(driver.ring().sample_index(), 0);
        assert_eq!(buffer.locks, 0);

        let report = driver.run_frame(&mut buffer, &mut surface, 16, 12);
        assert_eq!(report.audio, Ok(300));
        assert_eq!(driver.consecutive_query_failures(), 0);
    }

    #[test]
    fn persistent_query_failure_is_reported_as_unresponsive() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        for _ in 0..4 {
            buffer
                .query_failures
                .push_back(DeviceError::Unavailable("gone".into()));
        }

        assert!(matches!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::DeviceQueryFailed(_))
        ));
        assert!(matches!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::DeviceQueryFailed(_))
        ));
        assert_eq!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::DeviceUnresponsive {
                consecutive_failures: 3
            })
        );
        assert_eq!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::DeviceUnresponsive {
                consecutive_failures: 4
            })
        );

        assert_eq!(driver.advance_frame(&mut buffer), Ok(300));
        assert_eq!(driver.consecutive_query_failures(), 0);
    }

    #[test]
    fn out_of_range_cursor_is_an_invalid_cursor() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        buffer.cursors.play = 4000;

        let error = driver.advance_frame(&mut buffer).unwrap_err();
        assert_eq!(
            error,
            AudioError::InvalidCursor(CursorError::OutOfRange {
                cursor: 4000,
                buffer_size: 4000,
            })
        );
        assert!(error.is_query_failure());
        assert_eq!(driver.consecutive_query_failures(), 1);
        assert_eq!(buffer.locks, 0);
    }

    #[test]
    fn backward_cursor_skips_one_fill() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        buffer.cursors.play = 800;
        driver.advance_frame(&mut buffer).unwrap();

        buffer.cursors.play = 400;
        assert!(matches!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::InvalidCursor(CursorError::MovedBackward { .. }))
        ));

        buffer.cursors.play = 480;
        assert!(driver.advance_frame(&mut buffer).is_ok());
    }

    #[test]
    fn denied_lock_keeps_sample_index() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        buffer.lock_failures.push_back(DeviceError::Lost);

        assert_eq!(
            driver.advance_frame(&mut buffer),
            Err(AudioError::LockFailed(DeviceError::Lost))
        );
        assert_eq!(driver.ring().sample_index(), 0);
        assert_eq!((buffer.locks, buffer.unlocks), (0, 0));
        assert!(buffer.locked.is_none());

        assert_eq!(driver.advance_frame(&mut buffer), Ok(300));
    }

    #[test]
    fn denied_lock_keeps_the_waveform_continuous() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        let mut surface = MemorySurface::new(16, 12);
        assert_eq!(driver.advance_frame(&mut buffer), Ok(300));

        buffer.move_play_cursor(100 * 4);
        buffer.lock_failures.push_back(DeviceError::Lost);
        let report = driver.run_frame(&mut buffer, &mut surface, 16, 12);
        assert_eq!(report.audio, Err(AudioError::LockFailed(DeviceError::Lost)));

        assert_eq!(driver.advance_frame(&mut buffer), Ok(100));
        let expected = continuous_sine(400);
        for frame in 0..400 {
            let (left, right) = buffer.sample_frame(frame);
            assert_eq!(left, expected[frame * 2], "frame {}", frame);
            assert_eq!(right, expected[frame * 2 + 1], "frame {}", frame);
        }
    }

    #[test]
    fn lapped_play_cursor_resyncs_forward() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        driver.advance_frame(&mut buffer).unwrap();

        // A stall lets the play cursor run 400 frames, well past the 300 we had queued.
        buffer.move_play_cursor(400 * 4);
        let before = driver.ring().sample_index();
        let written = driver.advance_frame(&mut buffer).unwrap();

        assert!(driver.ring().sample_index() > before + written as u64);
        assert_eq!(
            driver.ring().byte_to_lock(),
            driver.ring().target_cursor(buffer.cursors.play)
        );
        assert!(!driver.ring().is_lapped(buffer.cursors.play));
    }

    #[test]
    fn playback_start_is_retried() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        buffer
            .play_failures
            .push_back(DeviceError::Unavailable("busy".into()));

        driver.advance_frame(&mut buffer).unwrap();
        assert!(!driver.sound_is_playing());
        driver.advance_frame(&mut buffer).unwrap();
        assert!(driver.sound_is_playing());
        assert!(buffer.playing);
    }

    #[test]
    fn clear_sound_buffer_writes_silence() {
        let mut driver = FrameDriver::new(small_settings()).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);

        driver.clear_sound_buffer(&mut buffer).unwrap();
        assert!(buffer.memory.iter().all(|&b| b == 0));
        assert_eq!((buffer.locks, buffer.unlocks), (1, 1));
    }

    struct FailAfter(usize);

    impl PixelAllocator for FailAfter {
        fn allocate(&mut self, bytes: usize) -> Option<Vec<u8>> {
            if self.0 == 0 {
                return None;
            }
            self.0 -= 1;
            Some(vec![0; bytes])
        }
    }

    #[test]
    fn failed_resize_disables_render_and_present() {
        let mut driver = FrameDriver::with_allocator(small_settings(), FailAfter(1)).unwrap();
        let mut buffer = ScriptedBuffer::new(4000);
        let mut surface = MemorySurface::new(16, 12);

        let report = driver.run_frame(&mut buffer, &mut surface, 16, 12);
        assert!(report.rendered && report.presented);
        let last_frame = surface.pixel(15, 11);

        assert_eq!(
            driver.resize_framebuffer(32, 32),
            Err(AllocationError { bytes: 32 * 32 * 4 })
        );
        assert!(driver.framebuffer().pixels().is_none());

        let report = driver.run_frame(&mut buffer, &mut surface, 16, 12);
        assert!(!report.rendered);
        assert!(!report.presented);
        assert_eq!(surface.blits(), 1);
        assert_eq!(surface.pixel(15, 11), last_frame);
        // Audio is unaffected by the missing framebuffer.
        assert!(report.audio.is_ok());
    }

    #[test]
    fn startup_allocation_failure_is_fatal() {
        let result = FrameDriver::with_allocator(small_settings(), FailAfter(0));
        assert_eq!(
            result.err(),
            Some(StartupError::Allocation(AllocationError {
                bytes: 8 * 6 * 4
            }))
        );
    }

    #[test]
    fn mono_streams_are_rejected() {
        let mut settings = small_settings();
        settings.format.channels = 1;
        settings.buffer_size = 2000;
        assert_eq!(
            FrameDriver::new(settings).err(),
            Some(StartupError::Format(FormatError::UnsupportedChannelCount(1)))
        );
    }
}
