use std::time::Instant;

use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use flamelens_core::{ClickAction, Theme};

use crate::app::ViewerState;

pub fn handle_shortcuts(mut contexts: EguiContexts, mut st: ResMut<ViewerState>) {
    let ctx = contexts.ctx_mut();
    let esc_pressed = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    let wants_keyboard = ctx.wants_keyboard_input();

    if esc_pressed {
        if st.ui.search_open {
            st.ui.search_open = false;
        } else if st.ui.help_open {
            st.ui.help_open = false;
        } else if !st.view.target_viewport().is_identity() {
            st.view.reset_zoom(Instant::now());
        }
    }

    if ctx.input(|i| i.key_pressed(egui::Key::F) && i.modifiers.command) {
        st.ui.search_open = true;
    }

    if wants_keyboard {
        return;
    }

    let mut changed = false;
    if ctx.input(|i| i.key_pressed(egui::Key::Questionmark)) {
        st.ui.help_open = !st.ui.help_open;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::M)) {
        st.cfg.mode = st.cfg.mode.toggled();
        changed = true;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::P)) {
        st.cfg.palette = st.cfg.palette.next();
        changed = true;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::T)) {
        st.cfg.theme = match st.cfg.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        changed = true;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::C)) {
        st.cfg.click_action = match st.cfg.click_action {
            ClickAction::ZoomToFrame => ClickAction::ToggleCollapse,
            ClickAction::ToggleCollapse => ClickAction::ZoomToFrame,
        };
        changed = true;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::E)) {
        st.view.expand_all();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::N)) {
        st.cfg.show_minimap = !st.cfg.show_minimap;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::H)) {
        st.cfg.show_hud = !st.cfg.show_hud;
    }
    if changed {
        st.apply_config();
    }
}
