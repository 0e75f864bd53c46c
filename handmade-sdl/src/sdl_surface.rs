use handmade_core::sink::{DestRect, DeviceError, PixelView, Surface};

use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use tracing::debug;

/// Presents framebuffers through a streaming texture that is stretched over the window.
pub struct SdlSurface<'t> {
    canvas: Canvas<Window>,
    texture_creator: &'t TextureCreator<WindowContext>,
    texture: Option<Texture<'t>>,
}

impl<'t> SdlSurface<'t> {
    pub fn new(
        mut canvas: Canvas<Window>,
        texture_creator: &'t TextureCreator<WindowContext>,
    ) -> SdlSurface<'t> {
        canvas.set_draw_color(Color::BLACK);
        canvas.clear();
        canvas.present();

        SdlSurface {
            canvas,
            texture_creator,
            texture: None,
        }
    }

    /// Size of the window's drawable area in pixels.
    pub fn output_size(&self) -> (u32, u32) {
        self.canvas.window().drawable_size()
    }

    fn ensure_texture(&mut self, width: u32, height: u32) -> Result<(), DeviceError> {
        let reusable = self.texture.as_ref().is_some_and(|texture| {
            let query = texture.query();
            query.width == width && query.height == height
        });
        if reusable {
            return Ok(());
        }

        let texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB888, width, height)
            .map_err(|e| DeviceError::Surface(e.to_string()))?;
        debug!("created {}x{} streaming texture", width, height);
        self.texture = Some(texture);
        Ok(())
    }
}

impl Surface for SdlSurface<'_> {
    fn blit(&mut self, dest: DestRect, source: PixelView<'_>) -> Result<(), DeviceError> {
        self.ensure_texture(source.width as u32, source.height as u32)?;
        let texture = match self.texture.as_mut() {
            Some(texture) => texture,
            None => return Ok(()),
        };

        texture
            .update(None, source.pixels, source.pitch)
            .map_err(|e| DeviceError::Surface(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(
                texture,
                None,
                Some(Rect::new(dest.x, dest.y, dest.width, dest.height)),
            )
            .map_err(DeviceError::Surface)?;
        self.canvas.present();
        Ok(())
    }
}
