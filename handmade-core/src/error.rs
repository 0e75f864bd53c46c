use crate::framebuffer::AllocationError;
use crate::ring_buffer::{CursorError, FormatError};
use crate::sink::DeviceError;

use thiserror::Error;

/// Why a frame's audio fill was skipped. All of these are recoverable: the frame loop keeps
/// running and video is still presented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("unable to query sound buffer position")]
    DeviceQueryFailed(#[source] DeviceError),

    #[error("sound device reported an invalid cursor")]
    InvalidCursor(#[from] CursorError),

    #[error("sound buffer lock denied")]
    LockFailed(#[source] DeviceError),

    #[error("sound device has failed {consecutive_failures} position queries in a row")]
    DeviceUnresponsive { consecutive_failures: u32 },
}

impl AudioError {
    /// Invalid cursors count as failed queries.
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            AudioError::DeviceQueryFailed(_)
                | AudioError::InvalidCursor(_)
                | AudioError::DeviceUnresponsive { .. }
        )
    }
}

/// Failures that stop the application before the first frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("invalid sound format")]
    Format(#[from] FormatError),

    #[error("out of memory during startup")]
    Allocation(#[from] AllocationError),

    #[error("unable to initialize sound device")]
    Device(#[from] DeviceError),
}
