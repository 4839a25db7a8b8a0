//! Flamegraph layout, projection, rendering and interaction.
//!
//! The crate turns a weighted call tree into a flat list of [`FrameBox`]es in
//! normalized `[0, 1]` space, and drives a [`FlamegraphView`] that paints them
//! through any [`Canvas`] implementation.

pub mod animation;
pub mod color;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod search;
pub mod task;
pub mod tree;
pub mod view;
pub mod viewport;

pub use animation::{Easing, ZoomAnimation, DEFAULT_ZOOM_DURATION};
pub use color::{hash_name, Color, Palette, Theme};
pub use frame::{FrameBox, FrameEquality, FrameId, FrameModel, ModelRect};
pub use geometry::{CanvasSize, DevicePoint, DeviceRect};
pub use interaction::{ClickAction, HoverListener, InteractionPhase, PointerButton, PointerEvent};
pub use layout::{flatten, flatten_by, flatten_tree, sibling_weight_sum, WeightRange};
pub use render::{
    default_font, Canvas, ColorFn, ColorModel, DimmingColorProvider, Font, FontFn, FontStyle,
    PaintState, PaintStats, RenderConfig, RenderEngine, RenderFlags, RenderSettings,
    TextCandidates, TextFn,
};
pub use search::{search_frames, SearchOutcome, SearchRequest};
pub use task::{LatestWins, Sequencer, Ticket};
pub use tree::FrameNode;
pub use view::FlamegraphView;
pub use viewport::{Mode, ModelPoint, Projection, Viewport};
