use crate::sdl_surface::SdlSurface;

use handmade_common::config::Config;
use handmade_core::error::StartupError;
use handmade_core::frame_driver::FrameDriver;
use handmade_core::sink::SoundBuffer;
use handmade_core::sound::ToneParameters;
use handmade_core::time_source::{FrameTimer, TimeSource};

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::EventPump;

use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace};

// How far an arrow key pushes the virtual stick.
const STICK_DEFLECTION: i16 = 30000;

pub struct App<'t, B: SoundBuffer, T: TimeSource> {
    driver: FrameDriver,
    sound_buffer: B,
    surface: SdlSurface<'t>,
    event_pump: EventPump,

    time_source: T,
    timer: FrameTimer,
    target_frames_per_second: u32,

    base_tone: ToneParameters,
    stick: (i16, i16),
    running: bool,
}

impl<'t, B, T> App<'t, B, T>
where
    B: SoundBuffer,
    T: TimeSource,
{
    pub fn new(
        config: &Config,
        mut sound_buffer: B,
        surface: SdlSurface<'t>,
        event_pump: EventPump,
        time_source: T,
    ) -> Result<App<'t, B, T>, StartupError> {
        let mut driver = FrameDriver::new(config.driver_settings())?;
        driver.clear_sound_buffer(&mut sound_buffer)?;

        Ok(App {
            driver,
            sound_buffer,
            surface,
            event_pump,

            time_source,
            timer: FrameTimer::new(),
            target_frames_per_second: config.frame_loop.target_frames_per_second.max(1),

            base_tone: config.sound.tone(),
            stick: (0, 0),
            running: true,
        })
    }

    pub fn run(&mut self) {
        self.timer.start(self.time_source.time_ns());

        // Main event/frame loop
        while self.running {
            self.handle_events();
            self.update_stick();

            let (width, height) = self.surface.output_size();
            let report = self
                .driver
                .run_frame(&mut self.sound_buffer, &mut self.surface, width, height);

            let remaining_ns = self
                .timer
                .remaining_ns(self.time_source.time_ns(), self.target_frames_per_second);
            if remaining_ns > 0 {
                thread::sleep(Duration::from_nanos(remaining_ns));
            }

            if let Some(timing) = self.timer.tick(self.time_source.time_ns()) {
                trace!(
                    "{:.2} ms/frame, {:.1} fps, {} samples",
                    timing.ms_per_frame,
                    timing.frames_per_second,
                    report.samples_written()
                );
            }
        }

        info!(
            "stopped after {} frames, {} samples written",
            self.timer.frames(),
            self.driver.samples_written()
        );
    }

    fn handle_events(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.running = false,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => {
                    debug!("window resized to {}x{}", width, height);
                }
                _ => {}
            }
        }
    }

    /// Arrow keys stand in for an analog stick. Letting go restores the configured tone.
    fn update_stick(&mut self) {
        let keyboard = self.event_pump.keyboard_state();
        let axis = |negative: Scancode, positive: Scancode| {
            match (
                keyboard.is_scancode_pressed(negative),
                keyboard.is_scancode_pressed(positive),
            ) {
                (true, false) => -STICK_DEFLECTION,
                (false, true) => STICK_DEFLECTION,
                _ => 0,
            }
        };
        let stick = (
            axis(Scancode::Left, Scancode::Right),
            axis(Scancode::Down, Scancode::Up),
        );

        let game = self.driver.game_mut();
        if stick != (0, 0) {
            game.apply_stick(stick.0, stick.1);
        } else if self.stick != (0, 0) {
            game.set_tone(self.base_tone);
        }
        self.stick = stick;
    }
}
