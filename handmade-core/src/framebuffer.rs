//! The off-screen pixel buffer the game draws into and the platform presents.
//!
//! Pixels are XRGB8888 stored as native-endian `u32`s, four bytes each, row 0 at the top. Fill
//! and presentation both use that orientation; nothing is flipped in between.

use crate::sink::{DestRect, DeviceError, PixelView, Surface};

use thiserror::Error;
use tracing::debug;

pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to allocate {bytes} bytes of pixel memory")]
pub struct AllocationError {
    pub bytes: usize,
}

/// Source of pixel memory. Returning `None` reports an allocation failure.
pub trait PixelAllocator {
    fn allocate(&mut self, bytes: usize) -> Option<Vec<u8>>;
}

/// Allocates zeroed memory from the global heap without aborting when it runs out.
#[derive(Debug, Default, Copy, Clone)]
pub struct HeapAllocator;

impl PixelAllocator for HeapAllocator {
    fn allocate(&mut self, bytes: usize) -> Option<Vec<u8>> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes).ok()?;
        data.resize(bytes, 0);
        Some(data)
    }
}

/// Owns the pixel memory and its geometry.
///
/// After a failed resize the buffer is empty: no memory, zero width, height and pitch. Drawing
/// into or presenting an empty buffer does nothing.
pub struct Framebuffer<A: PixelAllocator = HeapAllocator> {
    data: Option<Vec<u8>>,
    width: usize,
    height: usize,
    pitch: usize,
    allocator: A,
}

impl Framebuffer<HeapAllocator> {
    pub fn new(width: usize, height: usize) -> Result<Self, AllocationError> {
        Framebuffer::with_allocator(HeapAllocator, width, height)
    }
}

impl<A: PixelAllocator> Framebuffer<A> {
    pub fn with_allocator(allocator: A, width: usize, height: usize) -> Result<Self, AllocationError> {
        let mut framebuffer = Framebuffer {
            data: None,
            width: 0,
            height: 0,
            pitch: 0,
            allocator,
        };
        framebuffer.resize(width, height)?;
        Ok(framebuffer)
    }

    /// Releases the current pixels, then allocates `width * height` pixels for the new size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), AllocationError> {
        self.release();

        let bytes = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(AllocationError { bytes: usize::MAX })?;

        match self.allocator.allocate(bytes) {
            Some(data) if data.len() == bytes => {
                self.data = Some(data);
                self.width = width;
                self.height = height;
                self.pitch = width * BYTES_PER_PIXEL;
                debug!("framebuffer resized to {}x{}", width, height);
                Ok(())
            }
            _ => Err(AllocationError { bytes }),
        }
    }

    fn release(&mut self) {
        self.data = None;
        self.width = 0;
        self.height = 0;
        self.pitch = 0;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn pixels(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let data = self.data.as_ref()?;
        let start = y * self.pitch + x * BYTES_PER_PIXEL;
        let bytes = &data[start..start + BYTES_PER_PIXEL];
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Calls `shade(x, y)` for every pixel, top row first. Returns false, without calling
    /// `shade`, when the buffer is empty.
    pub fn fill_with<F>(&mut self, mut shade: F) -> bool
    where
        F: FnMut(usize, usize) -> u32,
    {
        let (width, pitch) = (self.width, self.pitch);
        let data = match self.data.as_mut() {
            Some(data) if pitch > 0 => data,
            _ => return false,
        };

        for (y, row) in data.chunks_exact_mut(pitch).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).take(width).enumerate() {
                pixel.copy_from_slice(&shade(x, y).to_ne_bytes());
            }
        }
        true
    }

    /// Stretches the whole buffer over a `dest_width` by `dest_height` area of `surface`.
    /// Returns `Ok(false)` when there was nothing to present.
    pub fn present<S>(
        &self,
        surface: &mut S,
        dest_width: u32,
        dest_height: u32,
    ) -> Result<bool, DeviceError>
    where
        S: Surface + ?Sized,
    {
        let pixels = match self.data.as_deref() {
            Some(pixels) if self.width > 0 && self.height > 0 => pixels,
            _ => return Ok(false),
        };
        if dest_width == 0 || dest_height == 0 {
            return Ok(false);
        }

        surface.blit(
            DestRect::sized(dest_width, dest_height),
            PixelView {
                pixels,
                width: self.width,
                height: self.height,
                pitch: self.pitch,
            },
        )?;
        Ok(true)
    }
}
