use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::app::resources::{Worker, WorkerRx};

pub mod resources;
pub mod state;

pub use state::ViewerState;

pub struct FlameLensViewerPlugin;

impl Plugin for FlameLensViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (
                pump_worker,
                crate::ui::handle_shortcuts,
                crate::ui::ui_panel,
                crate::ui::search_overlay,
                crate::ui::help_overlay,
                crate::render::draw_flamegraph,
                crate::ui::tooltip_overlay,
                crate::ui::hud_overlay,
            )
                .chain(),
        );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

fn pump_worker(
    mut contexts: EguiContexts,
    mut st: ResMut<ViewerState>,
    rx: Res<WorkerRx>,
    worker: Res<Worker>,
) {
    let mut changed = false;
    for event in rx.0.try_iter().take(64) {
        changed |= st.apply_event(event, &worker.0);
    }
    if changed {
        contexts.ctx_mut().request_repaint();
    }
}
