use bevy::prelude::{Res, Time};
use bevy_egui::{egui, EguiContexts};

use crate::app::ViewerState;
use crate::ui::{HUD_EDGE_PADDING, HUD_W};

pub fn hud_overlay(mut contexts: EguiContexts, st: Res<ViewerState>, time: Res<Time>) {
    if !st.cfg.show_hud {
        return;
    }
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();
    let right = screen.max.x - HUD_W - HUD_EDGE_PADDING;
    let x = right.max(screen.min.x + HUD_EDGE_PADDING);
    let y = screen.min.y + HUD_EDGE_PADDING;

    let stats = st.view.last_stats();
    let viewport = st.view.viewport();
    let dt = time.delta_seconds();

    egui::Area::new(egui::Id::new("hud"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(x, y))
        .show(ctx, |ui| {
            ui.group(|ui| {
                if dt > 0.0 {
                    ui.label(format!("FPS: {:.0}", 1.0 / dt));
                }
                ui.label(format!(
                    "Painted: {} frames / {} culled",
                    stats.painted, stats.culled
                ));
                ui.label(format!("Labels: {}", stats.texts));
                let ms = stats.elapsed.as_secs_f64() * 1000.0;
                ui.label(format!("Paint: {ms:.2} ms"));
                ui.label(format!("Zoom: {:.2}x", viewport.zoom));
                ui.label(format!(
                    "Translate: {:.0}, {:.0}",
                    viewport.translate_x, viewport.translate_y
                ));
                ui.label(format!("Mode: {}", viewport.mode.label()));
                ui.label(format!("State: {:?}", st.view.phase()));
                ui.label(format!(
                    "Model: {} frames, generation {}",
                    st.view.model().len(),
                    st.view.generation()
                ));
                ui.label(format!(
                    "Highlighted: {}, collapsed: {}",
                    st.view.highlighted().len(),
                    st.view.collapsed().len()
                ));
                if st.view.is_animating() {
                    ui.label("Animating");
                }
            });
        });
}
