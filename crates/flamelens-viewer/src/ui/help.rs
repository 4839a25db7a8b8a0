use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::app::ViewerState;

pub fn help_overlay(mut contexts: EguiContexts, mut st: ResMut<ViewerState>) {
    if !st.ui.help_open {
        return;
    }

    let mut open = true;
    egui::Window::new("Help / Shortcuts")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(contexts.ctx_mut(), |ui| {
            ui.label("Double click: run the click action on a frame");
            ui.label("Drag: pan, wheel: zoom around the pointer");
            ui.label("Click or drag the minimap: jump there");
            ui.separator();
            ui.label("Ctrl+F: search");
            ui.label("Esc: close overlays, then reset zoom");
            ui.label("M: flamegraph / icicle");
            ui.label("P: next palette");
            ui.label("T: light / dark theme");
            ui.label("C: toggle click action");
            ui.label("E: expand all collapsed frames");
            ui.label("N: minimap, H: HUD");
            ui.label("?: toggle help");
        });
    if !open {
        st.ui.help_open = false;
    }
}
