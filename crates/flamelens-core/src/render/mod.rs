//! Painting frames onto a [`Canvas`].

pub mod canvas;
pub mod engine;
pub mod flags;
pub mod provider;
pub mod text;

pub use canvas::{Canvas, Font, FontStyle};
pub use engine::{PaintState, PaintStats, RenderEngine, RenderSettings};
pub use flags::RenderFlags;
pub use provider::{
    default_font, ColorFn, ColorModel, DimmingColorProvider, FontFn, RenderConfig, TextCandidates,
    TextFn,
};
pub use text::{clip_right, frame_text, ELLIPSIS};
