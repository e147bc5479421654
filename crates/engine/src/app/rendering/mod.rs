mod canvas;
mod font;
mod palette;
mod renderer;

pub use canvas::Canvas;
pub use palette::Color;
pub(crate) use renderer::Renderer;
