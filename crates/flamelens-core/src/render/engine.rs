use std::collections::HashSet;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::color::Theme;
use crate::frame::{FrameId, FrameModel};
use crate::geometry::{DevicePoint, DeviceRect};
use crate::render::canvas::Canvas;
use crate::render::flags::RenderFlags;
use crate::render::provider::{DimmingColorProvider, RenderConfig};
use crate::render::text::frame_text;
use crate::viewport::{Mode, Projection, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Leave a gap on the trailing edges of each frame.
    pub frame_gaps: bool,
    pub gap_width: f64,
    pub rounded: bool,
    pub corner_radius: f64,
    pub text_padding: f64,
    pub border_width: f64,
    /// Frames whose visible width is below this get no text.
    pub min_text_width: f64,
    pub paint_hovered_border: bool,
    pub theme: Theme,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_gaps: true,
            gap_width: 1.0,
            rounded: false,
            corner_radius: 5.0,
            text_padding: 2.0,
            border_width: 1.0,
            min_text_width: 12.0,
            paint_hovered_border: false,
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    pub painted: usize,
    pub culled: usize,
    pub texts: usize,
    pub elapsed: Duration,
}

/// Interaction state read by one paint pass.
#[derive(Debug, Clone, Copy)]
pub struct PaintState<'a> {
    pub highlighted: &'a HashSet<FrameId>,
    pub collapsed: &'a HashSet<FrameId>,
    pub hovered: Option<FrameId>,
    pub focused: Option<FrameId>,
}

pub struct RenderEngine {
    settings: RenderSettings,
    colors: DimmingColorProvider,
    painted: FxHashMap<FrameId, DeviceRect>,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl RenderEngine {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            colors: DimmingColorProvider::new(settings.theme),
            settings,
            painted: FxHashMap::default(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.colors.set_theme(settings.theme);
        self.settings = settings;
    }

    fn gap(&self) -> f64 {
        if self.settings.frame_gaps {
            self.settings.gap_width
        } else {
            0.0
        }
    }

    /// Row height: font line height plus padding and gaps on both sides.
    pub fn row_height<N, C>(&self, canvas: &C, config: &RenderConfig<N>) -> f64
    where
        C: Canvas + ?Sized,
    {
        let font = (config.font)(None, RenderFlags::empty());
        canvas.line_height(&font) + 2.0 * self.settings.text_padding + 2.0 * self.gap()
    }

    /// Device rectangle the last paint pass gave `id`, if it was painted.
    pub fn painted_rect(&self, id: FrameId) -> Option<DeviceRect> {
        self.painted.get(&id).copied()
    }

    pub fn painted_count(&self) -> usize {
        self.painted.len()
    }

    pub fn clear_cache(&mut self) {
        self.painted.clear();
    }

    /// Paints every frame that intersects the canvas and rebuilds the hit-test cache.
    pub fn paint<N, C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        model: &FrameModel<N>,
        config: &RenderConfig<N>,
        viewport: &Viewport,
        proj: &Projection,
        state: &PaintState<'_>,
    ) -> PaintStats {
        let started = Instant::now();
        let mut stats = PaintStats::default();
        self.painted.clear();

        let bounds = proj.canvas.bounds();
        if model.is_empty() || proj.canvas.is_degenerate() {
            return stats;
        }

        let gap = self.gap();
        let radius = if self.settings.rounded {
            self.settings.corner_radius
        } else {
            0.0
        };
        // fills are clipped to a slightly wider band so rounded ends stay off screen
        let fill_band = DeviceRect::new(
            bounds.x - radius - gap - 1.0,
            bounds.y - proj.row_height,
            bounds.width + 2.0 * (radius + gap + 1.0),
            bounds.height + 2.0 * proj.row_height,
        );
        let highlighting = !state.highlighted.is_empty();

        let frames = model.frames();
        let mut i = 0;
        while i < frames.len() {
            let id = FrameId(i);
            let frame = &frames[i];
            let rect = viewport.model_to_device(frame.rect(), proj);

            // descendants never extend past their ancestor horizontally
            if !(rect.width > 0.0) || rect.right() <= bounds.x || rect.x >= bounds.right() {
                let skipped = model.subtree(id);
                stats.culled += skipped.len();
                i = skipped.end.max(i + 1);
                continue;
            }
            let next = if state.collapsed.contains(&id) {
                model.subtree(id).end.max(i + 1)
            } else {
                i + 1
            };

            let Some(visible) = rect.intersection(&bounds) else {
                stats.culled += 1;
                i = next;
                continue;
            };

            let mut flags = RenderFlags::empty();
            if highlighting && !frame.is_root() {
                flags |= RenderFlags::HIGHLIGHTING;
                if state.highlighted.contains(&id) {
                    flags |= RenderFlags::HIGHLIGHTED;
                }
            }
            if state.hovered == Some(id) {
                flags |= RenderFlags::HOVERED;
            }
            if let Some(focus) = state.focused {
                flags |= RenderFlags::FOCUSING;
                if model.is_ancestor_or_self(focus, id) || model.is_ancestor_or_self(id, focus) {
                    flags |= RenderFlags::FOCUSED;
                }
            }
            if rect.x < visible.x {
                flags |= RenderFlags::PARTIAL;
            }

            let colors = self.colors.colors(&config.color, frame, flags);
            let fill = rect
                .intersection(&fill_band)
                .unwrap_or(visible)
                .shrink_trailing(gap);
            canvas.fill_rect(fill, colors.background, radius);
            self.painted.insert(id, rect);
            stats.painted += 1;

            let text_width = visible.width - 2.0 * self.settings.text_padding - 2.0 * gap;
            if text_width >= self.settings.min_text_width {
                let font = (config.font)(Some(frame), flags);
                let title = model.title();
                let text = frame_text(&*canvas, &font, text_width, title, frame, &config.texts);
                if let Some(text) = text {
                    let at = DevicePoint::new(
                        visible.x + self.settings.text_padding + self.settings.border_width,
                        rect.y + gap + self.settings.text_padding,
                    );
                    canvas.draw_text(&text, at, &font, colors.foreground);
                    stats.texts += 1;
                }
            }

            i = next;
        }

        if self.settings.paint_hovered_border {
            if let Some(rect) = state.hovered.and_then(|h| self.painted.get(&h)) {
                canvas.stroke_rect(
                    rect.shrink_trailing(gap),
                    self.settings.theme.hovered_border(),
                    self.settings.border_width,
                );
            }
        }

        stats.elapsed = started.elapsed();
        tracing::trace!(
            painted = stats.painted,
            culled = stats.culled,
            texts = stats.texts,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "flamegraph painted"
        );
        stats
    }

    /// Paints the whole model, squeezed into `bounds`, without text, dimming or gaps.
    ///
    /// Does not touch the hit-test cache.
    pub fn paint_minimap<N, C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        model: &FrameModel<N>,
        config: &RenderConfig<N>,
        mode: Mode,
        bounds: DeviceRect,
    ) -> usize {
        if model.is_empty() || bounds.is_empty() {
            return 0;
        }
        let rows = (model.max_depth() + 1) as f64;
        let row_height = bounds.height / rows;
        let mut painted = 0;
        for frame in model.frames() {
            let width = frame.width() * bounds.width;
            if !(width > 0.0) {
                continue;
            }
            let row = match mode {
                Mode::Icicle => frame.depth,
                Mode::Flamegraph => model.max_depth() - frame.depth,
            };
            let rect = DeviceRect::new(
                bounds.x + frame.start_x * bounds.width,
                bounds.y + row as f64 * row_height,
                width,
                row_height,
            );
            let colors = self.colors.colors(&config.color, frame, RenderFlags::MINIMAP);
            canvas.fill_rect(rect, colors.background, 0.0);
            painted += 1;
        }
        painted
    }
}
