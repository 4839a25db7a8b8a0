use std::time::Instant;

use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use flamelens_core::{Canvas, CanvasSize, DevicePoint, DeviceRect, PointerEvent, Theme};

use crate::app::ViewerState;
use crate::render::canvas::{color32, EguiCanvas};

/// Wheel pixels to zoom exponent.
const WHEEL_ZOOM_RATE: f64 = 1.0 / 200.0;
const MINIMAP_MARGIN: f64 = 12.0;
const MINIMAP_MAX: (f64, f64) = (240.0, 90.0);

/// Bottom-right corner of a `canvas`-sized area; empty when there is no room.
pub fn minimap_bounds(canvas: CanvasSize) -> DeviceRect {
    let width = (canvas.width * 0.25).min(MINIMAP_MAX.0);
    let height = (canvas.height * 0.2).min(MINIMAP_MAX.1);
    if width < 40.0 || height < 20.0 {
        return DeviceRect::default();
    }
    DeviceRect::new(
        canvas.width - width - MINIMAP_MARGIN,
        canvas.height - height - MINIMAP_MARGIN,
        width,
        height,
    )
}

/// Visible horizontal range `[start, end]` of the model drawn inside `bounds`.
pub fn viewport_outline(visible: (f64, f64), bounds: DeviceRect) -> DeviceRect {
    let start = visible.0.clamp(0.0, 1.0);
    let end = visible.1.clamp(start, 1.0);
    DeviceRect::new(
        bounds.x + start * bounds.width,
        bounds.y,
        ((end - start) * bounds.width).max(2.0),
        bounds.height,
    )
}

pub fn draw_flamegraph(mut contexts: EguiContexts, mut st: ResMut<ViewerState>) {
    let ctx = contexts.ctx_mut();
    let st = &mut *st;
    let now = Instant::now();
    if st.view.tick(now) {
        ctx.request_repaint();
    }
    let theme = st.cfg.theme;

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(color32(theme.background())))
        .show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let size = CanvasSize::new(rect.width() as f64, rect.height() as f64);
            st.view.set_canvas_size(size);

            let to_device = |p: egui::Pos2| {
                let local = p - rect.min;
                DevicePoint::new(local.x as f64, local.y as f64)
            };
            let minimap = Some(minimap_bounds(size))
                .filter(|b| st.cfg.show_minimap && !b.is_empty());

            let pointer = response.hover_pos().map(to_device);
            let on_minimap = |p: DevicePoint| minimap.is_some_and(|m| m.contains(p));

            match pointer {
                Some(p) if !on_minimap(p) => {
                    let event = PointerEvent::at(p.x, p.y);
                    st.view.pointer_moved(&event);

                    let scroll = ui.input(|i| i.smooth_scroll_delta.y) as f64;
                    if scroll != 0.0 {
                        st.view.zoom_by(p, (scroll * WHEEL_ZOOM_RATE).exp());
                    }
                    if response.double_clicked() {
                        st.view.clicked(&event, now);
                    }
                }
                _ => {
                    if st.view.hovered().is_some() {
                        let event = pointer
                            .map(|p| PointerEvent::at(p.x, p.y))
                            .unwrap_or_default();
                        st.view.pointer_exited(&event);
                    }
                }
            }

            let pressed = response.interact_pointer_pos().map(to_device);
            match (pressed, minimap) {
                (Some(p), Some(bounds))
                    if on_minimap(p) && (response.clicked() || response.dragged()) =>
                {
                    st.view.minimap_navigate(bounds, p);
                }
                _ => {
                    if response.dragged_by(egui::PointerButton::Primary) {
                        let d = response.drag_delta();
                        st.view.drag(d.x as f64, d.y as f64);
                    }
                }
            }

            let painter = ui.painter_at(rect);
            let mut canvas = EguiCanvas::new(&painter, rect.min);
            st.view.paint(&mut canvas);

            if let Some(bounds) = minimap {
                paint_minimap(st, &mut canvas, bounds, theme);
            }
        });
}

fn paint_minimap(
    st: &mut ViewerState,
    canvas: &mut EguiCanvas<'_>,
    bounds: DeviceRect,
    theme: Theme,
) {
    canvas.fill_rect(bounds, theme.background(), 0.0);
    st.view.paint_minimap(canvas, bounds);

    let visible = st.view.viewport().visible_range(&st.view.projection());
    let outline = viewport_outline(visible, bounds);
    canvas.fill_rect(outline, theme.hovered().with_alpha(0x40), 0.0);
    canvas.stroke_rect(outline, theme.hovered_border(), 1.5);
    canvas.stroke_rect(bounds, theme.ink().with_alpha(0x80), 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimap_sits_in_the_bottom_right_corner() {
        let b = minimap_bounds(CanvasSize::new(1200.0, 800.0));
        let expected = DeviceRect::new(1200.0 - 240.0 - 12.0, 800.0 - 90.0 - 12.0, 240.0, 90.0);
        assert_eq!(b, expected);

        let small = minimap_bounds(CanvasSize::new(400.0, 200.0));
        assert_eq!(small.width, 100.0);
        assert_eq!(small.height, 40.0);

        assert!(minimap_bounds(CanvasSize::new(100.0, 50.0)).is_empty());
    }

    #[test]
    fn outline_tracks_the_visible_range() {
        let bounds = DeviceRect::new(10.0, 20.0, 200.0, 50.0);
        assert_eq!(viewport_outline((0.0, 1.0), bounds), bounds);
        assert_eq!(
            viewport_outline((0.25, 0.5), bounds),
            DeviceRect::new(60.0, 20.0, 50.0, 50.0)
        );
        // fully zoomed in still shows a sliver
        let thin = viewport_outline((0.5, 0.500001), bounds);
        assert_eq!(thin.width, 2.0);
        // clamped to the model
        assert_eq!(viewport_outline((-1.0, 3.0), bounds), bounds);
    }
}
