use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::{Canvas, Color};

const CLEAR_COLOR: Color = Color(0);

/// Owns the pixel surface. The canvas has a fixed logical resolution and is
/// scaled to the window surface on present.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    canvas_width: u32,
    canvas_height: u32,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, canvas_width: u32, canvas_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            canvas_width,
            canvas_height,
            size.width,
            size.height,
        )?;
        Ok(Self {
            window,
            pixels,
            canvas_width,
            canvas_height,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            self.canvas_width,
            self.canvas_height,
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        canvas_width: u32,
        canvas_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(canvas_width, canvas_height, surface)
    }

    /// Clears the canvas, lets `draw` paint the frame, then presents it.
    pub(crate) fn render_frame<F>(&mut self, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let mut canvas = Canvas::new(
            self.pixels.frame_mut(),
            self.canvas_width,
            self.canvas_height,
        );
        canvas.cls(CLEAR_COLOR);
        draw(&mut canvas);
        self.pixels.render()
    }
}
