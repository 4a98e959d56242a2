mod colormap;
mod error;
mod frame;
mod style;
mod svg;

pub use colormap::Colormap;
pub use error::RenderError;
pub use frame::{Frame, FrameRenderer, FrameRequest};
pub use style::RenderStyle;
pub use svg::SvgRenderer;
