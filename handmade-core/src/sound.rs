use std::f32::consts::TAU;

pub const DEFAULT_TONE_HZ: u32 = 256;
pub const DEFAULT_TONE_VOLUME: i16 = 3000;

// Full deflection of an analog stick, as far as the tone mapping is concerned.
const STICK_RANGE: i32 = 30000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToneParameters {
    pub tone_hz: u32,
    pub volume: i16,
}

impl Default for ToneParameters {
    fn default() -> Self {
        ToneParameters {
            tone_hz: DEFAULT_TONE_HZ,
            volume: DEFAULT_TONE_VOLUME,
        }
    }
}

impl ToneParameters {
    /// Bends the tone around 512 Hz by up to 256 Hz with the stick's vertical axis.
    pub fn with_stick(self, stick_y: i16) -> ToneParameters {
        let tone_hz = 512 + (256 * stick_y as i32) / STICK_RANGE;
        ToneParameters {
            tone_hz: tone_hz.max(1) as u32,
            ..self
        }
    }

    /// Length of one wave cycle in whole sample frames.
    pub fn wave_period(&self, samples_per_second: u32) -> u32 {
        (samples_per_second / self.tone_hz.max(1)).max(1)
    }
}

/// Destination for one frame's worth of interleaved stereo samples.
pub struct SoundOutputBuffer<'a> {
    samples_per_second: u32,
    samples: &'a mut [i16],
}

impl<'a> SoundOutputBuffer<'a> {
    /// `samples` holds two values (left, right) per sample frame.
    pub fn new(samples_per_second: u32, samples: &'a mut [i16]) -> Self {
        SoundOutputBuffer {
            samples_per_second,
            samples,
        }
    }

    pub fn samples_per_second(&self) -> u32 {
        self.samples_per_second
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn samples(&self) -> &[i16] {
        self.samples
    }
}

/// Sine oscillator whose phase carries across calls, so consecutive blocks join without a
/// click wherever the ring buffer splits them.
#[derive(Debug, Clone, Default)]
pub struct SineWave {
    t_sine: f32,
}

impl SineWave {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn phase(&self) -> f32 {
        self.t_sine
    }

    /// Moves the oscillator to `phase` radians, wrapped into one cycle.
    pub fn set_phase(&mut self, phase: f32) {
        self.t_sine = phase.rem_euclid(TAU);
    }

    /// Writes exactly `buffer.sample_count()` frames. An empty buffer leaves the phase alone.
    pub fn output(&mut self, tone: ToneParameters, buffer: &mut SoundOutputBuffer) {
        let wave_period = tone.wave_period(buffer.samples_per_second);
        let step = TAU / wave_period as f32;

        for frame in buffer.samples.chunks_exact_mut(2) {
            let value = (self.t_sine.sin() * tone.volume as f32) as i16;
            frame[0] = value;
            frame[1] = value;

            self.t_sine += step;
            if self.t_sine >= TAU {
                self.t_sine -= TAU;
            }
        }
    }
}
