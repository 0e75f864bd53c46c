mod sound_buffer;
mod surface;

pub use self::sound_buffer::*;
pub use self::surface::*;

use thiserror::Error;

/// Failures reported by the platform collaborators behind `SoundBuffer` and `Surface`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("sound device unavailable: {0}")]
    Unavailable(String),

    #[error("sound device lost")]
    Lost,

    #[error("sound buffer is already locked")]
    AlreadyLocked,

    #[error("sound buffer range was not locked")]
    NotLocked,

    #[error("range {offset}+{bytes} does not fit a {buffer_size} byte buffer")]
    OutOfBounds {
        offset: u32,
        bytes: u32,
        buffer_size: u32,
    },

    #[error("unable to present to surface: {0}")]
    Surface(String),
}
