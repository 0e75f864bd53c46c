use crate::framebuffer::{Framebuffer, PixelAllocator};
use crate::sound::{SineWave, SoundOutputBuffer, ToneParameters};

/// Placeholder game: a scrolling gradient and a steady tone.
#[derive(Debug, Clone, Default)]
pub struct Game {
    tone: ToneParameters,
    sine_wave: SineWave,
    x_offset: i32,
    y_offset: i32,
}

impl Game {
    pub fn new(tone: ToneParameters) -> Self {
        Game {
            tone,
            ..Default::default()
        }
    }

    pub fn tone(&self) -> ToneParameters {
        self.tone
    }

    pub fn set_tone(&mut self, tone: ToneParameters) {
        self.tone = tone;
    }

    /// Oscillator phase in radians, carried across frames.
    pub fn phase(&self) -> f32 {
        self.sine_wave.phase()
    }

    /// Rewinds the oscillator, e.g. when a generated block never reached the sound buffer.
    pub fn set_phase(&mut self, phase: f32) {
        self.sine_wave.set_phase(phase);
    }

    pub fn offsets(&self) -> (i32, i32) {
        (self.x_offset, self.y_offset)
    }

    /// Scrolls the gradient and bends the tone with an analog stick position.
    pub fn apply_stick(&mut self, stick_x: i16, stick_y: i16) {
        self.x_offset += stick_x as i32 / 4096;
        self.y_offset += stick_y as i32 / 4096;
        self.tone = self.tone.with_stick(stick_y);
    }

    /// Produces this frame's samples and pixels from the same game state.
    pub fn update_and_render<A: PixelAllocator>(
        &mut self,
        framebuffer: &mut Framebuffer<A>,
        sound_buffer: &mut SoundOutputBuffer,
    ) {
        self.output_sound(sound_buffer);
        self.render_frame(framebuffer);
    }

    pub fn output_sound(&mut self, sound_buffer: &mut SoundOutputBuffer) {
        self.sine_wave.output(self.tone, sound_buffer);
    }

    /// Returns false when the framebuffer has no memory to draw into.
    pub fn render_frame<A: PixelAllocator>(&self, framebuffer: &mut Framebuffer<A>) -> bool {
        render_gradient(framebuffer, self.x_offset, self.y_offset)
    }
}

fn render_gradient<A: PixelAllocator>(
    framebuffer: &mut Framebuffer<A>,
    x_offset: i32,
    y_offset: i32,
) -> bool {
    framebuffer.fill_with(|x, y| {
        let red = (x as i32).wrapping_add(x_offset) as u8 as u32;
        let green = (y as i32).wrapping_add(y_offset) as u8 as u32;
        let blue = green;
        (red << 16) | (green << 8) | blue
    })
}

#[test]
fn test_gradient() {
    let mut framebuffer = Framebuffer::new(300, 4).unwrap();
    let mut game = Game::default();
    assert!(game.render_frame(&mut framebuffer));

    assert_eq!(framebuffer.pixel(0, 0), Some(0x000000));
    assert_eq!(framebuffer.pixel(5, 3), Some(0x050303));
    // Red wraps every 256 columns.
    assert_eq!(framebuffer.pixel(257, 1), Some(0x010101));

    game.apply_stick(4096 * 2, -4096);
    assert_eq!(game.offsets(), (2, -1));
    game.render_frame(&mut framebuffer);
    assert_eq!(framebuffer.pixel(0, 0), Some(0x02FFFF));
}

#[test]
fn test_update_and_render_fills_both_outputs() {
    let mut framebuffer = Framebuffer::new(4, 4).unwrap();
    let mut game = Game::new(ToneParameters::default());
    let mut samples = vec![0; 64 * 2];
    let mut sound_buffer = SoundOutputBuffer::new(48000, &mut samples);

    game.update_and_render(&mut framebuffer, &mut sound_buffer);

    assert_eq!(sound_buffer.sample_count(), 64);
    assert!(sound_buffer.samples().iter().any(|&s| s != 0));
    assert_eq!(framebuffer.pixel(3, 2), Some(0x030202));
}

#[test]
fn test_stick_changes_tone() {
    let mut game = Game::default();
    game.apply_stick(0, 30000);
    assert_eq!(game.tone().tone_hz, 768);
}
