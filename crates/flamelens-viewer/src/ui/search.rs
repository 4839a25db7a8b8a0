use std::time::Instant;

use bevy::prelude::{Res, ResMut};
use bevy_egui::{egui, EguiContexts};
use flamelens_core::FrameId;

use crate::app::resources::Worker;
use crate::app::ViewerState;

const MAX_LISTED: usize = 30;

// Ctrl+F search overlay
pub fn search_overlay(
    mut contexts: EguiContexts,
    mut st: ResMut<ViewerState>,
    worker: Res<Worker>,
) {
    if !st.ui.search_open {
        return;
    }
    let ctx = contexts.ctx_mut();
    let st = &mut *st;

    egui::Window::new("Search (Ctrl+F)")
        .collapsible(false)
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Query:");
                let resp = ui.text_edit_singleline(&mut st.ui.search_query);
                if resp.changed() {
                    st.start_search(&worker.0);
                }
                if ui.button("Clear").clicked() {
                    st.ui.search_query.clear();
                    st.start_search(&worker.0);
                }
                if ui.button("Close (Esc)").clicked() {
                    st.ui.search_open = false;
                }
            });

            let mut hits: Vec<FrameId> = st.view.highlighted().iter().copied().collect();
            hits.sort();
            ui.label(format!("{} matching frames", hits.len()));
            ui.separator();

            let mut picked: Option<FrameId> = None;
            let model = st.view.model().clone();
            egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                for id in hits.iter().take(MAX_LISTED) {
                    let Some(frame) = model.frame(*id) else {
                        continue;
                    };
                    let label = format!(
                        "{} (depth {}, {} samples)",
                        frame.node.name(),
                        frame.depth,
                        frame.node.samples()
                    );
                    if ui.selectable_label(st.view.zoomed_frame() == Some(*id), label).clicked() {
                        picked = Some(*id);
                    }
                }
                if hits.len() > MAX_LISTED {
                    ui.label(format!("... and {} more", hits.len() - MAX_LISTED));
                }
            });

            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                picked = hits.first().copied();
            }
            if let Some(id) = picked {
                st.view.zoom_to_frame(id, Instant::now());
            }
        });
}
