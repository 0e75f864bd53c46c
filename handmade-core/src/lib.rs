pub mod error;
pub mod frame_driver;
pub mod framebuffer;
pub mod game;
pub mod ring_buffer;
pub mod sink;
pub mod sound;
pub mod time_source;
