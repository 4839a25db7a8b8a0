//! Model space <-> device space. Zoom is horizontal only; rows keep their height.

use serde::{Deserialize, Serialize};

use crate::frame::ModelRect;
use crate::geometry::{CanvasSize, DevicePoint, DeviceRect};

pub const MAX_ZOOM: f64 = 1.0e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Flamegraph,
    Icicle,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Flamegraph => Mode::Icicle,
            Mode::Icicle => Mode::Flamegraph,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Flamegraph => "flamegraph",
            Mode::Icicle => "icicle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub canvas: CanvasSize,
    pub row_height: f64,
    pub max_depth: usize,
}

impl Projection {
    pub fn new(canvas: CanvasSize, row_height: f64, max_depth: usize) -> Self {
        Self {
            canvas,
            row_height,
            max_depth,
        }
    }

    pub fn row_count(&self) -> usize {
        self.max_depth + 1
    }

    pub fn content_height(&self) -> f64 {
        self.row_count() as f64 * self.row_height
    }
}

/// `depth` is `None` above or below every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPoint {
    pub x: f64,
    pub depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub mode: Mode,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity(Mode::default())
    }
}

impl Viewport {
    pub fn identity(mode: Mode) -> Self {
        Self {
            zoom: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            mode,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.zoom == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }

    pub fn row_index(&self, depth: usize, proj: &Projection) -> usize {
        match self.mode {
            Mode::Icicle => depth,
            Mode::Flamegraph => proj.max_depth.saturating_sub(depth),
        }
    }

    fn depth_of_row(&self, row: usize, proj: &Projection) -> Option<usize> {
        if row > proj.max_depth {
            return None;
        }
        Some(match self.mode {
            Mode::Icicle => row,
            Mode::Flamegraph => proj.max_depth - row,
        })
    }

    fn scale_x(&self, proj: &Projection) -> f64 {
        proj.canvas.width * self.zoom
    }

    pub fn model_to_device(&self, rect: ModelRect, proj: &Projection) -> DeviceRect {
        let scale = self.scale_x(proj);
        let row = self.row_index(rect.depth, proj) as f64;
        DeviceRect::new(
            rect.start_x * scale + self.translate_x,
            row * proj.row_height + self.translate_y,
            rect.width() * scale,
            proj.row_height,
        )
    }

    pub fn device_to_model(&self, point: DevicePoint, proj: &Projection) -> ModelPoint {
        let scale = self.scale_x(proj);
        let x = if scale > 0.0 {
            (point.x - self.translate_x) / scale
        } else {
            0.0
        };
        let depth = if proj.row_height > 0.0 {
            let row = ((point.y - self.translate_y) / proj.row_height).floor();
            if row >= 0.0 && row.is_finite() {
                self.depth_of_row(row as usize, proj)
            } else {
                None
            }
        } else {
            None
        };
        ModelPoint { x, depth }
    }

    /// Inverse of [`Viewport::model_to_device`]. The depth is read at the row centre.
    pub fn device_to_model_rect(&self, rect: DeviceRect, proj: &Projection) -> Option<ModelRect> {
        let left = self.device_to_model(DevicePoint::new(rect.x, rect.y + rect.height / 2.0), proj);
        let right = self.device_to_model(DevicePoint::new(rect.right(), rect.y), proj);
        Some(ModelRect {
            start_x: left.x,
            end_x: right.x,
            depth: left.depth?,
        })
    }

    pub fn visible_range(&self, proj: &Projection) -> (f64, f64) {
        let scale = self.scale_x(proj);
        if scale <= 0.0 {
            return (0.0, 1.0);
        }
        let start = -self.translate_x / scale;
        (start, start + proj.canvas.width / scale)
    }

    pub fn reset(&self) -> Viewport {
        Viewport::identity(self.mode)
    }

    /// Viewport that maps `rect` to the full canvas width, keeping as many of
    /// its ancestors on screen as fit.
    pub fn zoomed_to(&self, rect: ModelRect, proj: &Projection) -> Option<Viewport> {
        let width = rect.width();
        if !(width > 0.0) || proj.canvas.is_degenerate() {
            return None;
        }
        let zoom = 1.0 / width;
        if !zoom.is_finite() {
            return None;
        }
        let translate_x = -rect.start_x * proj.canvas.width * zoom;

        let frame_row = self.row_index(rect.depth, proj) as f64;
        let root_row = self.row_index(0, proj) as f64;
        let top = frame_row.min(root_row) * proj.row_height;
        let bottom = (frame_row.max(root_row) + 1.0) * proj.row_height;
        let canvas_h = proj.canvas.height;

        let translate_y = if bottom - top <= canvas_h {
            self.translate_y.clamp(-top, canvas_h - bottom)
        } else {
            match self.mode {
                Mode::Icicle => canvas_h - (frame_row + 1.0) * proj.row_height,
                Mode::Flamegraph => -frame_row * proj.row_height,
            }
        };

        Some(Viewport {
            zoom,
            translate_x,
            translate_y,
            mode: self.mode,
        })
    }

    pub fn zoom_at(&self, anchor: DevicePoint, factor: f64, proj: &Projection) -> Viewport {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        let zoom = (self.zoom * factor).clamp(1.0, MAX_ZOOM);
        let applied = zoom / self.zoom;
        let translate_x = anchor.x - (anchor.x - self.translate_x) * applied;
        Viewport {
            zoom,
            translate_x,
            ..*self
        }
        .clamped(proj)
    }

    pub fn pan_by(&self, dx: f64, dy: f64, proj: &Projection) -> Viewport {
        Viewport {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..*self
        }
        .clamped(proj)
    }

    /// Keeps zoom in `[1, MAX_ZOOM]` and the content covering the canvas horizontally.
    pub fn clamped(&self, proj: &Projection) -> Viewport {
        let zoom = if self.zoom.is_finite() {
            self.zoom.clamp(1.0, MAX_ZOOM)
        } else {
            1.0
        };
        let width = proj.canvas.width;
        let translate_x = self.translate_x.clamp(width - width * zoom, 0.0);

        let slack = proj.canvas.height - proj.content_height();
        let translate_y = if slack >= 0.0 {
            self.translate_y.clamp(0.0, slack)
        } else {
            self.translate_y.clamp(slack, 0.0)
        };

        Viewport {
            zoom,
            translate_x,
            translate_y,
            mode: self.mode,
        }
    }

    pub fn lerp(&self, to: &Viewport, t: f64) -> Viewport {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Viewport {
            zoom: mix(self.zoom, to.zoom),
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            mode: to.mode,
        }
    }
}
