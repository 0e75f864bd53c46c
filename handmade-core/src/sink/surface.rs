use super::DeviceError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DestRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DestRect {
    pub fn sized(width: u32, height: u32) -> DestRect {
        DestRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Borrowed XRGB8888 pixels, row 0 at the top.
#[derive(Debug, Copy, Clone)]
pub struct PixelView<'a> {
    pub pixels: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
}

/// A display target that can stretch a pixel buffer into a destination rectangle.
pub trait Surface {
    fn blit(&mut self, dest: DestRect, source: PixelView<'_>) -> Result<(), DeviceError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn blit(&mut self, dest: DestRect, source: PixelView<'_>) -> Result<(), DeviceError> {
        (**self).blit(dest, source)
    }
}

/// A surface backed by CPU memory. Blits are stretched with nearest-neighbour sampling.
pub struct MemorySurface {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
    blits: usize,
}

impl MemorySurface {
    pub fn new(width: usize, height: usize) -> Self {
        MemorySurface {
            pixels: vec![0; width * height],
            width,
            height,
            blits: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Number of blits that reached this surface.
    pub fn blits(&self) -> usize {
        self.blits
    }
}

impl Surface for MemorySurface {
    fn blit(&mut self, dest: DestRect, source: PixelView<'_>) -> Result<(), DeviceError> {
        if source.width == 0 || source.height == 0 {
            return Ok(());
        }
        if source.pitch < source.width * 4 {
            return Err(DeviceError::Surface(format!(
                "pitch of {} bytes is too small for {} pixels",
                source.pitch, source.width
            )));
        }
        if source.pixels.len() < source.pitch * source.height {
            return Err(DeviceError::Surface(format!(
                "{} bytes is too small for {} rows of {} bytes",
                source.pixels.len(),
                source.height,
                source.pitch
            )));
        }

        for dy in 0..dest.height as i64 {
            let y = dest.y as i64 + dy;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            let sy = (dy as usize * source.height) / dest.height as usize;
            let row = &source.pixels[sy * source.pitch..];

            for dx in 0..dest.width as i64 {
                let x = dest.x as i64 + dx;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let sx = (dx as usize * source.width) / dest.width as usize;
                let bytes = &row[sx * 4..sx * 4 + 4];
                self.pixels[y as usize * self.width + x as usize] =
                    u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
        }

        self.blits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn stretches_to_larger_destination() {
        let source = pixels(&[1, 2, 3, 4]);
        let mut surface = MemorySurface::new(4, 4);
        surface
            .blit(
                DestRect::sized(4, 4),
                PixelView {
                    pixels: &source,
                    width: 2,
                    height: 2,
                    pitch: 8,
                },
            )
            .unwrap();

        assert_eq!(surface.pixel(0, 0), Some(1));
        assert_eq!(surface.pixel(1, 1), Some(1));
        assert_eq!(surface.pixel(3, 0), Some(2));
        assert_eq!(surface.pixel(0, 3), Some(3));
        assert_eq!(surface.pixel(3, 3), Some(4));
        assert_eq!(surface.blits(), 1);
    }

    #[test]
    fn shrinks_to_smaller_destination() {
        let source = pixels(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        let mut surface = MemorySurface::new(2, 2);
        surface
            .blit(
                DestRect::sized(2, 2),
                PixelView {
                    pixels: &source,
                    width: 4,
                    height: 4,
                    pitch: 16,
                },
            )
            .unwrap();

        assert_eq!(surface.pixel(0, 0), Some(1));
        assert_eq!(surface.pixel(1, 0), Some(3));
        assert_eq!(surface.pixel(0, 1), Some(9));
        assert_eq!(surface.pixel(1, 1), Some(11));
    }

    #[test]
    fn rejects_short_pixel_data() {
        let source = pixels(&[1, 2, 3]);
        let mut surface = MemorySurface::new(2, 2);
        let result = surface.blit(
            DestRect::sized(2, 2),
            PixelView {
                pixels: &source,
                width: 2,
                height: 2,
                pitch: 8,
            },
        );
        assert!(result.is_err());
        assert_eq!(surface.blits(), 0);
    }

    #[test]
    fn rejects_pitch_shorter_than_a_row() {
        let source = pixels(&[1, 2, 3, 4]);
        let mut surface = MemorySurface::new(4, 4);
        let result = surface.blit(
            DestRect::sized(4, 4),
            PixelView {
                pixels: &source,
                width: 4,
                height: 1,
                pitch: 4,
            },
        );
        assert!(matches!(result, Err(DeviceError::Surface(_))));
        assert_eq!(surface.blits(), 0);
        assert_eq!(surface.pixel(3, 0), Some(0));
    }
}
