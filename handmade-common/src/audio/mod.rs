mod audio_driver;
mod circular_buffer;
mod null_audio_driver;

pub use audio_driver::AudioDriver;
pub use circular_buffer::{CircularBuffer, SharedCircularBuffer, device_period};
pub use null_audio_driver::NullAudioDriver;
