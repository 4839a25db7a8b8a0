mod app;
mod profile;
mod render;
mod ui;
mod util;
mod worker;

use anyhow::Result;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use tracing_subscriber::EnvFilter;

use app::resources::{HoverRx, Worker, WorkerRx};
use app::{FlameLensViewerPlugin, ViewerState};
use util::args::parse_args;
use util::config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,naga=warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;

    let mut cfg = config::load_or_default();
    if let Some(mode) = args.mode {
        cfg.mode = mode;
    }
    if let Some(weight) = args.weight {
        cfg.weight = weight;
    }
    tracing::info!(
        mode = cfg.mode.label(),
        weight = cfg.weight.label(),
        "viewer starting"
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let worker = worker::spawn_worker(tx)?;
    let (hover_tx, hover_rx) = crossbeam_channel::unbounded();

    let mut st = ViewerState::new(cfg, hover_tx);
    if let Some(path) = args.path {
        st.request_load(&worker, path);
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "FlameLens".into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::log::LogPlugin>(),
        )
        .add_plugins(EguiPlugin)
        .insert_resource(WorkerRx(rx))
        .insert_resource(Worker(worker))
        .insert_resource(HoverRx(hover_rx))
        .insert_resource(st)
        .add_plugins(FlameLensViewerPlugin)
        .run();

    Ok(())
}
