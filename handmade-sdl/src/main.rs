use crate::app::App;
use crate::sdl_audio_driver::SdlAudioDriver;
use crate::sdl_surface::SdlSurface;

use handmade_common::audio::{AudioDriver, NullAudioDriver};
use handmade_common::config::Config;
use handmade_common::logger;
use handmade_common::time::SystemTimeSource;
use handmade_core::error::StartupError;
use handmade_core::sink::SoundBuffer;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use std::error::Error;
use std::process;

use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use tracing::{error, info};

mod app;
mod sdl_audio_driver;
mod sdl_surface;

#[derive(Debug, Parser)]
#[command(
    name = "handmade",
    about = "Plays a tone and draws a gradient through a looping sound buffer"
)]
struct Opt {
    /// Disable audio
    #[arg(long = "noaudio")]
    disable_audio: bool,

    /// Sound buffer sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Pitch of the tone in Hz
    #[arg(long)]
    tone_hz: Option<u32>,

    /// Latency is one over this many seconds of audio
    #[arg(long)]
    latency_divisor: Option<u32>,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

impl Opt {
    fn config(&self) -> Config {
        let mut config = Config::default();
        config.sound.enabled = !self.disable_audio;
        if let Some(sample_rate) = self.sample_rate {
            config.sound.samples_per_second = sample_rate;
        }
        if let Some(tone_hz) = self.tone_hz {
            config.sound.tone_hz = tone_hz;
        }
        if let Some(latency_divisor) = self.latency_divisor {
            config.sound.latency_divisor = latency_divisor;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(fps) = self.fps {
            config.frame_loop.target_frames_per_second = fps;
        }
        config
    }
}

fn main() {
    let opt = Opt::parse();
    logger::initialize(&opt.verbose);

    if let Err(e) = run(&opt.config()) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(&config.window.title, config.window.width, config.window.height)
        .position_centered()
        .resizable()
        .build()?;
    let canvas = window.into_canvas().present_vsync().build()?;
    let texture_creator = canvas.texture_creator();
    let event_pump = sdl_context.event_pump()?;

    let format = config.sound.format();
    let buffer_size = config.sound.buffer_size();

    // Locals drop in reverse order: the app, then the audio device, then SDL itself.
    if config.sound.enabled {
        let audio_driver = SdlAudioDriver::new(
            &sdl_context,
            format,
            buffer_size,
            config.sound.latency_sample_count(),
        )?;
        info!("Audio sample rate: {}", audio_driver.sample_rate());
        run_app(config, audio_driver.sound_buffer(), canvas, &texture_creator, event_pump)?;
    } else {
        let audio_driver = NullAudioDriver::new(format, buffer_size)?;
        info!("Audio disabled");
        run_app(config, audio_driver.sound_buffer(), canvas, &texture_creator, event_pump)?;
    }

    Ok(())
}

fn run_app<B: SoundBuffer>(
    config: &Config,
    sound_buffer: B,
    canvas: Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    event_pump: EventPump,
) -> Result<(), StartupError> {
    let surface = SdlSurface::new(canvas, texture_creator);
    let mut app = App::new(config, sound_buffer, surface, event_pump, SystemTimeSource)?;
    app.run();
    Ok(())
}
