use std::path::PathBuf;
use std::time::Instant;

use bevy::prelude::{Res, ResMut};
use bevy_egui::{egui, EguiContexts};
use flamelens_core::{ClickAction, Mode, Palette, Theme};

use crate::app::resources::Worker;
use crate::app::state::Status;
use crate::app::ViewerState;
use crate::profile::{ColorBy, WeightKind};
use crate::ui::PANEL_W;
use crate::util::config;

pub fn ui_panel(mut contexts: EguiContexts, mut st: ResMut<ViewerState>, worker: Res<Worker>) {
    let st = &mut *st;
    let before = st.cfg.clone();

    egui::SidePanel::left("left")
        .exact_width(PANEL_W)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("FlameLens");
            let model = st.view.model();
            if model.is_empty() {
                ui.label("no profile loaded");
            } else {
                ui.label(model.title());
                ui.label(format!("frames: {}", model.len()));
                ui.label(format!("depth: {}", model.max_depth()));
            }
            ui.separator();

            ui.label("Folded stack file:");
            let resp = ui.text_edit_singleline(&mut st.ui.path_input);
            let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.horizontal(|ui| {
                let load = ui
                    .add_enabled(
                        !st.ui.path_input.trim().is_empty(),
                        egui::Button::new("Load"),
                    )
                    .clicked();
                if load || submitted {
                    let path = PathBuf::from(st.ui.path_input.trim());
                    st.request_load(&worker.0, path);
                }
                if st.is_loading() {
                    ui.spinner();
                }
            });
            if !st.status.message.is_empty() {
                let color = if st.status.error {
                    egui::Color32::from_rgb(0xD0, 0x40, 0x40)
                } else {
                    ui.visuals().weak_text_color()
                };
                ui.colored_label(color, &st.status.message);
            }

            ui.add_space(8.0);
            ui.separator();
            ui.heading("View");
            ui.horizontal(|ui| {
                for mode in [Mode::Flamegraph, Mode::Icicle] {
                    ui.selectable_value(&mut st.cfg.mode, mode, mode.label());
                }
            });
            ui.horizontal(|ui| {
                ui.label("Weight:");
                let mut weight = st.cfg.weight;
                for kind in [WeightKind::Samples, WeightKind::Bytes] {
                    ui.selectable_value(&mut weight, kind, kind.label());
                }
                if weight != st.cfg.weight {
                    st.request_relayout(&worker.0, weight);
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Colors");
            egui::ComboBox::from_label("palette")
                .selected_text(st.cfg.palette.label())
                .show_ui(ui, |ui| {
                    for palette in Palette::ALL {
                        ui.selectable_value(&mut st.cfg.palette, palette, palette.label());
                    }
                });
            ui.horizontal(|ui| {
                ui.label("Color by:");
                for by in [ColorBy::Name, ColorBy::SelfWeight] {
                    ui.selectable_value(&mut st.cfg.color_by, by, by.label());
                }
            });
            ui.horizontal(|ui| {
                ui.label("Theme:");
                ui.selectable_value(&mut st.cfg.theme, Theme::Light, "light");
                ui.selectable_value(&mut st.cfg.theme, Theme::Dark, "dark");
            });

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Interaction");
            ui.horizontal(|ui| {
                ui.label("Click:");
                for action in [ClickAction::ZoomToFrame, ClickAction::ToggleCollapse] {
                    ui.selectable_value(&mut st.cfg.click_action, action, action.label());
                }
            });
            ui.checkbox(&mut st.cfg.animate_zoom, "Animate zoom");
            ui.add_enabled(
                st.cfg.animate_zoom,
                egui::Slider::new(&mut st.cfg.animation_ms, 50..=2000)
                    .text("duration (ms)"),
            );

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Rendering");
            ui.checkbox(&mut st.cfg.frame_gaps, "Frame gaps");
            ui.checkbox(&mut st.cfg.rounded_frames, "Rounded frames");
            ui.checkbox(&mut st.cfg.hovered_border, "Hovered frame border");
            ui.add(
                egui::Slider::new(&mut st.cfg.min_text_width, 0.0..=80.0)
                    .text("min text width"),
            );
            ui.checkbox(&mut st.cfg.show_minimap, "Minimap");
            ui.checkbox(&mut st.cfg.show_hud, "HUD");

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                if ui.button("Reset zoom (Esc)").clicked() {
                    st.view.reset_zoom(Instant::now());
                }
                if ui
                    .add_enabled(
                        !st.view.collapsed().is_empty(),
                        egui::Button::new("Expand all"),
                    )
                    .clicked()
                {
                    st.view.expand_all();
                }
                if ui.button("Search (Ctrl+F)").clicked() {
                    st.ui.search_open = true;
                }
                if ui.button("Save settings").clicked() {
                    st.status = match config::save(&st.cfg) {
                        Ok(path) => Status::info(format!("settings saved to {}", path.display())),
                        Err(err) => {
                            tracing::warn!(error = %err, "could not save viewer config");
                            Status::error(format!("{err:#}"))
                        }
                    };
                }
            });
        });

    if st.cfg != before {
        st.apply_config();
    }
}
