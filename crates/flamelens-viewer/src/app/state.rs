use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bevy::prelude::Resource;
use crossbeam_channel::Sender;
use flamelens_core::{FlamegraphView, FrameBox, LatestWins, Ticket};

use crate::profile::{render_config, Profile, StackFrame, WeightKind};
use crate::ui::tooltips::{HoverEvent, HoverFeed};
use crate::util::config::ViewerConfig;
use crate::worker::{WorkerEvent, WorkerHandle};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub message: String,
    pub error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}

#[derive(Default)]
pub struct UiState {
    pub search_open: bool,
    pub search_query: String,
    pub help_open: bool,
    pub path_input: String,
    /// Frame under the pointer as last reported by the hover listener.
    pub hover: Option<FrameBox<StackFrame>>,
}

#[derive(Resource)]
pub struct ViewerState {
    pub view: FlamegraphView<StackFrame>,
    pub cfg: ViewerConfig,
    pub profile: Option<Arc<Profile>>,
    pub source: Option<PathBuf>,
    pub pending: Option<Ticket>,
    pub status: Status,
    pub ui: UiState,
    loads: LatestWins,
}

impl ViewerState {
    pub fn new(cfg: ViewerConfig, hover: Sender<HoverEvent>) -> Self {
        let mut view = FlamegraphView::default();
        view.set_hover_listener(Box::new(HoverFeed::new(hover)));
        let mut st = Self {
            view,
            ui: UiState {
                path_input: cfg
                    .last_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                ..UiState::default()
            },
            cfg,
            profile: None,
            source: None,
            pending: None,
            status: Status::info("open a folded stack file to begin"),
            loads: LatestWins::default(),
        };
        st.apply_config();
        st
    }

    /// Pushes the config into the view. Cheap enough to call on every settings change.
    pub fn apply_config(&mut self) {
        self.view.set_mode(self.cfg.mode);
        self.view.set_click_action(self.cfg.click_action);
        self.view
            .set_animation(self.cfg.animate_zoom, self.cfg.animation_duration());
        self.view.set_render_settings(self.cfg.render_settings());
        self.refresh_render_config();
    }

    pub fn refresh_render_config(&mut self) {
        let config = render_config(
            self.view.model(),
            self.cfg.palette,
            self.cfg.color_by,
            self.cfg.weight,
        );
        self.view.set_render_config(config);
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request_load(&mut self, worker: &WorkerHandle, path: PathBuf) {
        match worker.load(path.clone(), self.cfg.weight) {
            Ok(ticket) => {
                tracing::info!(ticket = ticket.0, path = %path.display(), "loading profile");
                self.pending = Some(ticket);
                self.status = Status::info(format!("loading {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not queue profile load");
                self.status = Status::error(format!("{err:#}"));
            }
        }
    }

    /// Lays the current profile out again with another weight.
    pub fn request_relayout(&mut self, worker: &WorkerHandle, weight: WeightKind) {
        self.cfg.weight = weight;
        let Some(profile) = self.profile.clone() else {
            return;
        };
        match worker.relayout(profile, weight) {
            Ok(ticket) => {
                self.pending = Some(ticket);
                self.status = Status::info(format!("weighting by {}", weight.label()));
            }
            Err(err) => self.status = Status::error(format!("{err:#}")),
        }
    }

    pub fn start_search(&mut self, worker: &WorkerHandle) {
        let query = self.ui.search_query.clone();
        if let Some(request) = self.view.begin_search(&query) {
            if let Err(err) = worker.search(request) {
                self.status = Status::error(format!("{err:#}"));
            }
        }
    }

    /// Zooms to the leftmost, shallowest highlighted frame.
    pub fn zoom_to_first_match(&mut self, now: Instant) -> bool {
        let first = self.view.highlighted().iter().copied().min();
        match first {
            Some(id) => self.view.zoom_to_frame(id, now),
            None => false,
        }
    }

    /// Applies one completion from the worker. Returns true when something visible changed.
    pub fn apply_event(&mut self, event: WorkerEvent, worker: &WorkerHandle) -> bool {
        match event {
            WorkerEvent::Loaded { ticket, loaded } => {
                if !self.accept_load(ticket) {
                    return false;
                }
                self.cfg.weight = loaded.weight;
                if let Some(path) = loaded.path {
                    self.ui.path_input = path.display().to_string();
                    self.cfg.last_file = Some(path.clone());
                    self.source = Some(path);
                }
                let frames = loaded.model.len();
                let description = loaded.profile.description();
                self.status = Status::info(format!("{frames} frames, {description}"));
                self.profile = Some(loaded.profile);
                self.view.set_model(loaded.model);
                self.refresh_render_config();
                tracing::info!(
                    ticket = ticket.0,
                    frames,
                    weight = loaded.weight.label(),
                    "model applied"
                );

                if !self.ui.search_query.trim().is_empty() {
                    self.start_search(worker);
                }
                true
            }
            WorkerEvent::Searched(outcome) => self.view.apply_search(outcome),
            WorkerEvent::Failed { ticket, error } => {
                if !self.accept_load(ticket) {
                    return false;
                }
                tracing::warn!(ticket = ticket.0, %error, "profile load failed");
                self.status = Status::error(format!("load failed: {error}"));
                true
            }
        }
    }

    fn accept_load(&mut self, ticket: Ticket) -> bool {
        if !self.loads.accept(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping superseded load");
            return false;
        }
        if self.pending.is_some_and(|p| p <= ticket) {
            self.pending = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{build_model, parse_folded};
    use crate::worker::{spawn_worker, Loaded};
    use flamelens_core::{CanvasSize, FrameId, InteractionPhase};
    use std::time::Duration;

    fn state() -> (ViewerState, WorkerHandle, crossbeam_channel::Receiver<WorkerEvent>) {
        let (hover_tx, _hover_rx) = crossbeam_channel::unbounded();
        let mut st = ViewerState::new(
            ViewerConfig {
                animate_zoom: false,
                ..ViewerConfig::default()
            },
            hover_tx,
        );
        st.view.set_canvas_size(CanvasSize::new(800.0, 600.0));
        let (tx, rx) = crossbeam_channel::unbounded();
        (st, spawn_worker(tx).expect("worker spawned"), rx)
    }

    fn loaded(text: &str) -> Loaded {
        let profile = Arc::new(parse_folded("t", text).expect("parsed"));
        Loaded {
            model: Arc::new(build_model(&profile, WeightKind::Samples)),
            profile,
            weight: WeightKind::Samples,
            path: Some(PathBuf::from("/tmp/t.folded")),
        }
    }

    fn find(st: &ViewerState, name: &str) -> FrameId {
        let model = st.view.model();
        model
            .ids()
            .find(|id| model.frames()[id.index()].node.name() == name)
            .expect("frame present")
    }

    #[test]
    fn superseded_loads_are_dropped() {
        let (mut st, worker, _rx) = state();
        let older = worker.next_ticket();
        let newer = worker.next_ticket();

        assert!(st.apply_event(
            WorkerEvent::Loaded {
                ticket: newer,
                loaded: loaded("new 1\n"),
            },
            &worker
        ));
        assert!(!st.apply_event(
            WorkerEvent::Loaded {
                ticket: older,
                loaded: loaded("old 1\n"),
            },
            &worker
        ));
        assert_eq!(st.view.model().frames()[1].node.name(), "new");
        assert_eq!(st.cfg.last_file, Some(PathBuf::from("/tmp/t.folded")));
    }

    #[test]
    fn failed_load_keeps_the_last_good_model() {
        let (mut st, worker, _rx) = state();
        let first = worker.next_ticket();
        st.apply_event(
            WorkerEvent::Loaded {
                ticket: first,
                loaded: loaded("a;b 2\n"),
            },
            &worker,
        );
        let second = worker.next_ticket();
        st.pending = Some(second);

        assert!(st.apply_event(
            WorkerEvent::Failed {
                ticket: second,
                error: "boom".to_string(),
            },
            &worker
        ));
        assert!(st.status.error);
        assert!(!st.is_loading());
        assert_eq!(st.view.model().len(), 3);
    }

    #[test]
    fn reload_keeps_the_zoomed_frame() {
        let (mut st, worker, _rx) = state();
        st.apply_event(
            WorkerEvent::Loaded {
                ticket: worker.next_ticket(),
                loaded: loaded("main;parse 3\nmain;render 7\n"),
            },
            &worker,
        );
        let render = find(&st, "render");
        assert!(st.view.zoom_to_frame(render, Instant::now()));

        st.apply_event(
            WorkerEvent::Loaded {
                ticket: worker.next_ticket(),
                loaded: loaded("main;gc 5\nmain;parse 3\nmain;render 2\n"),
            },
            &worker,
        );
        assert_eq!(st.view.phase(), InteractionPhase::Zoomed);
        let zoomed = st.view.zoomed_frame().expect("still zoomed");
        let model = st.view.model();
        assert_eq!(model.frames()[zoomed.index()].node.name(), "render");
    }

    #[test]
    fn loading_reissues_the_active_search() {
        let (mut st, worker, rx) = state();
        st.ui.search_query = "render".to_string();
        st.apply_event(
            WorkerEvent::Loaded {
                ticket: worker.next_ticket(),
                loaded: loaded("main;parse 3\nmain;render 7\n"),
            },
            &worker,
        );

        let event = rx.recv_timeout(Duration::from_secs(10)).expect("search finished");
        assert!(st.apply_event(event, &worker));
        let render = find(&st, "render");
        assert!(st.view.highlighted().contains(&render));

        assert!(st.zoom_to_first_match(Instant::now()));
        assert_eq!(st.view.zoomed_frame(), Some(render));
    }

    #[test]
    fn config_changes_reach_the_view() {
        let (mut st, _worker, _rx) = state();
        st.cfg.mode = flamelens_core::Mode::Icicle;
        st.cfg.frame_gaps = false;
        st.apply_config();
        assert_eq!(st.view.mode(), flamelens_core::Mode::Icicle);
        assert!(!st.view.render_settings().frame_gaps);
        assert!(!st.view.animates());
    }
}
