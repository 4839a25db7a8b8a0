//! The flamegraph component. Lives on the UI thread; only searches leave it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::animation::{Easing, ZoomAnimation, DEFAULT_ZOOM_DURATION};
use crate::frame::{FrameBox, FrameId, FrameModel};
use crate::geometry::{CanvasSize, DevicePoint, DeviceRect};
use crate::interaction::{ClickAction, HoverListener, InteractionPhase, PointerButton, PointerEvent};
use crate::render::{
    Canvas, ColorFn, FontFn, PaintState, PaintStats, RenderConfig, RenderEngine, RenderSettings,
    TextFn,
};
use crate::search::{SearchOutcome, SearchRequest};
use crate::task::{LatestWins, Sequencer};
use crate::viewport::{Mode, Projection, Viewport};

const FALLBACK_ROW_HEIGHT: f64 = 18.0;

pub struct FlamegraphView<N> {
    model: Arc<FrameModel<N>>,
    generation: u64,
    config: RenderConfig<N>,
    engine: RenderEngine,
    canvas: CanvasSize,
    row_height: f64,

    viewport: Viewport,
    animation: Option<ZoomAnimation>,
    animate: bool,
    animation_duration: Duration,
    easing: Easing,

    click_action: ClickAction,
    zoomed: Option<FrameId>,
    hovered: Option<FrameId>,
    highlighted: HashSet<FrameId>,
    search_text: String,
    collapsed: HashSet<FrameId>,
    hover_listener: Option<Box<dyn HoverListener<N>>>,

    searches: Sequencer,
    search_gate: LatestWins,
    last_stats: PaintStats,
}

impl<N: 'static> Default for FlamegraphView<N> {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl<N: 'static> FlamegraphView<N> {
    pub fn new(config: RenderConfig<N>) -> Self {
        Self {
            model: Arc::new(FrameModel::empty()),
            generation: 0,
            config,
            engine: RenderEngine::default(),
            canvas: CanvasSize::default(),
            row_height: FALLBACK_ROW_HEIGHT,
            viewport: Viewport::default(),
            animation: None,
            animate: true,
            animation_duration: DEFAULT_ZOOM_DURATION,
            easing: Easing::SineInOut,
            click_action: ClickAction::default(),
            zoomed: None,
            hovered: None,
            highlighted: HashSet::new(),
            search_text: String::new(),
            collapsed: HashSet::new(),
            hover_listener: None,
            searches: Sequencer::new(),
            search_gate: LatestWins::default(),
            last_stats: PaintStats::default(),
        }
    }

    // ---- model ----

    /// Swaps in a new model. Zoom and hover carry over through the model's
    /// equality; highlights and collapsed frames are dropped.
    pub fn set_model(&mut self, model: impl Into<Arc<FrameModel<N>>>) {
        let model = model.into();
        let old = std::mem::replace(&mut self.model, model);
        self.generation += 1;
        self.finish_animation();
        self.engine.clear_cache();

        let previous_zoom = self.zoomed.take();
        let zoomed = previous_zoom.and_then(|id| self.model.find_equivalent(&old, id));
        self.hovered = self.hovered.and_then(|id| self.model.find_equivalent(&old, id));
        self.highlighted.clear();
        self.collapsed.clear();

        let proj = self.projection();
        let restored = zoomed.and_then(|id| {
            let frame = self.model.frame(id)?;
            Some((id, self.viewport.zoomed_to(frame.rect(), &proj)?))
        });
        match restored {
            Some((id, viewport)) => {
                self.zoomed = Some(id);
                self.viewport = viewport;
            }
            None if previous_zoom.is_some() => self.viewport = self.viewport.reset(),
            None => {}
        }

        tracing::debug!(
            generation = self.generation,
            frames = self.model.len(),
            zoom_kept = self.zoomed.is_some(),
            "flamegraph model replaced"
        );
    }

    pub fn model(&self) -> &Arc<FrameModel<N>> {
        &self.model
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ---- configuration ----

    pub fn set_render_configuration(
        &mut self,
        texts: Vec<TextFn<N>>,
        color: ColorFn<N>,
        font: FontFn<N>,
    ) {
        self.config = RenderConfig::new(texts, color, font);
    }

    pub fn set_render_config(&mut self, config: RenderConfig<N>) {
        self.config = config;
    }

    pub fn render_config(&self) -> &RenderConfig<N> {
        &self.config
    }

    pub fn set_render_settings(&mut self, settings: RenderSettings) {
        self.engine.set_settings(settings);
    }

    pub fn render_settings(&self) -> &RenderSettings {
        self.engine.settings()
    }

    pub fn mode(&self) -> Mode {
        self.resting().mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode() == mode {
            return;
        }
        self.finish_animation();
        let base = Viewport {
            mode,
            ..self.viewport
        };
        let proj = self.projection();
        self.viewport = self
            .zoomed
            .and_then(|id| base.zoomed_to(self.model.frame(id)?.rect(), &proj))
            .unwrap_or(base);
        tracing::debug!(mode = mode.label(), "flamegraph mode changed");
    }

    pub fn click_action(&self) -> ClickAction {
        self.click_action
    }

    pub fn set_click_action(&mut self, action: ClickAction) {
        self.click_action = action;
    }

    pub fn set_animation(&mut self, enabled: bool, duration: Duration) {
        self.animate = enabled;
        self.animation_duration = duration;
        if !enabled {
            self.finish_animation();
        }
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn animates(&self) -> bool {
        self.animate
    }

    pub fn set_hover_listener(&mut self, listener: Box<dyn HoverListener<N>>) {
        self.hover_listener = Some(listener);
    }

    pub fn clear_hover_listener(&mut self) {
        self.hover_listener = None;
    }

    /// Keeps the visible model range when the canvas is resized.
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if size == self.canvas {
            return;
        }
        self.finish_animation();
        if self.canvas.width > 0.0 && size.width > 0.0 {
            self.viewport.translate_x *= size.width / self.canvas.width;
        }
        self.canvas = size;
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    // ---- zoom ----

    fn resting(&self) -> Viewport {
        self.animation.map(|a| a.target()).unwrap_or(self.viewport)
    }

    fn finish_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            self.viewport = animation.target();
        }
    }

    fn move_to(&mut self, target: Viewport, now: Instant) {
        if self.animate && !self.animation_duration.is_zero() {
            self.animation = Some(ZoomAnimation::retarget(
                self.animation.as_ref(),
                self.viewport,
                target,
                now,
                self.animation_duration,
                self.easing,
            ));
        } else {
            self.animation = None;
            self.viewport = target;
        }
    }

    pub fn reset_zoom(&mut self, now: Instant) {
        self.zoomed = None;
        let target = self.resting().reset();
        self.move_to(target, now);
        tracing::debug!("zoom reset");
    }

    /// Zooms so `id` spans the canvas width. Returns false for unknown or zero-width frames.
    pub fn zoom_to_frame(&mut self, id: FrameId, now: Instant) -> bool {
        let Some(frame) = self.model.frame(id) else {
            return false;
        };
        let proj = self.projection();
        let Some(target) = self.resting().zoomed_to(frame.rect(), &proj) else {
            return false;
        };
        self.zoomed = Some(id);
        self.move_to(target, now);
        tracing::debug!(frame = id.index(), zoom = target.zoom, "zoom to frame");
        true
    }

    pub fn zoom_by(&mut self, anchor: DevicePoint, factor: f64) {
        self.finish_animation();
        let proj = self.projection();
        self.viewport = self.viewport.zoom_at(anchor, factor, &proj);
        if self.viewport.zoom <= 1.0 {
            self.zoomed = None;
        }
        self.release_moved_focus();
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.finish_animation();
        let proj = self.projection();
        self.viewport = self.viewport.pan_by(dx, dy, &proj);
        self.release_moved_focus();
    }

    // the zoomed frame stays focused only while it still spans the canvas
    fn release_moved_focus(&mut self) {
        let Some(id) = self.zoomed else {
            return;
        };
        let proj = self.projection();
        let vp = self.viewport;
        let framed = self
            .model
            .frame(id)
            .and_then(|frame| vp.zoomed_to(frame.rect(), &proj))
            .is_some_and(|target| {
                (target.zoom - vp.zoom).abs() <= 1e-9 * target.zoom
                    && (target.translate_x - vp.translate_x).abs() < 0.5
            });
        if !framed {
            self.zoomed = None;
        }
    }

    // re-frames the zoomed frame after the row height changed
    fn refocus(&mut self) {
        let Some(id) = self.zoomed else {
            return;
        };
        self.finish_animation();
        let proj = self.projection();
        let target = self
            .model
            .frame(id)
            .and_then(|frame| self.viewport.zoomed_to(frame.rect(), &proj));
        if let Some(target) = target {
            self.viewport = target;
        }
    }

    pub fn minimap_navigate(&mut self, bounds: DeviceRect, point: DevicePoint) {
        if bounds.is_empty() {
            return;
        }
        self.finish_animation();
        let x = ((point.x - bounds.x) / bounds.width).clamp(0.0, 1.0);
        let proj = self.projection();
        let scale = proj.canvas.width * self.viewport.zoom;
        let centered = Viewport {
            translate_x: proj.canvas.width / 2.0 - x * scale,
            ..self.viewport
        };
        self.viewport = centered.clamped(&proj);
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (viewport, done) = animation.sample(now);
        self.viewport = viewport;
        if done {
            self.animation = None;
        }
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    // ---- search and highlight ----

    pub fn highlight_frames(&mut self, frames: HashSet<FrameId>, search_text: impl Into<String>) {
        self.search_gate.accept(self.searches.next());
        self.highlighted = frames;
        self.search_text = search_text.into();
    }

    /// Prepares a search for `text` to run elsewhere. A blank text clears the
    /// highlight immediately and returns `None`.
    pub fn begin_search(&mut self, text: &str) -> Option<SearchRequest<N>> {
        if text.trim().is_empty() {
            self.highlight_frames(HashSet::new(), text);
            return None;
        }
        self.search_text = text.to_string();
        Some(SearchRequest {
            ticket: self.searches.next(),
            generation: self.generation,
            model: Arc::clone(&self.model),
            texts: Arc::clone(&self.config.texts),
            query: text.to_string(),
        })
    }

    /// Applies a finished search unless a newer one was applied already or the
    /// model changed since it was issued.
    pub fn apply_search(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                ticket = outcome.ticket.0,
                generation = outcome.generation,
                current = self.generation,
                "dropping search for a replaced model"
            );
            return false;
        }
        if !self.search_gate.accept(outcome.ticket) {
            tracing::debug!(ticket = outcome.ticket.0, "dropping stale search");
            return false;
        }
        tracing::debug!(query = %outcome.query, matches = outcome.matches.len(), "search applied");
        self.highlighted = outcome.matches;
        self.search_text = outcome.query;
        true
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn highlighted(&self) -> &HashSet<FrameId> {
        &self.highlighted
    }

    // ---- collapse ----

    pub fn toggle_collapse(&mut self, id: FrameId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn collapsed(&self) -> &HashSet<FrameId> {
        &self.collapsed
    }

    // ---- pointer ----

    pub fn frame_at(&self, point: DevicePoint) -> Option<FrameId> {
        let proj = self.projection();
        let hit = self.viewport.device_to_model(point, &proj);
        let id = self.model.frame_at(hit.x, hit.depth?)?;
        self.engine.painted_rect(id).map(|_| id)
    }

    /// Returns true when the hovered frame changed.
    pub fn pointer_moved(&mut self, event: &PointerEvent) -> bool {
        let hit = self.frame_at(event.position);
        let previous = std::mem::replace(&mut self.hovered, hit);

        if let Some(listener) = &self.hover_listener {
            match hit {
                Some(id) => {
                    let rect = self.engine.painted_rect(id);
                    if let (Some(frame), Some(rect)) = (self.model.frame(id), rect) {
                        listener.on_frame_hover(frame, rect, event);
                    }
                }
                None => {
                    if let Some(prev) = previous {
                        let rect = self.engine.painted_rect(prev);
                        listener.on_stop_hover(self.model.frame(prev), rect, event);
                    }
                }
            }
        }
        previous != hit
    }

    pub fn pointer_exited(&mut self, event: &PointerEvent) -> bool {
        let Some(previous) = self.hovered.take() else {
            return false;
        };
        if let Some(listener) = &self.hover_listener {
            let rect = self.engine.painted_rect(previous);
            listener.on_stop_hover(self.model.frame(previous), rect, event);
        }
        true
    }

    pub fn clicked(&mut self, event: &PointerEvent, now: Instant) -> Option<FrameId> {
        if event.button != PointerButton::Primary {
            return None;
        }
        let id = self.frame_at(event.position)?;
        match self.click_action {
            ClickAction::ZoomToFrame => {
                self.zoom_to_frame(id, now);
            }
            ClickAction::ToggleCollapse => self.toggle_collapse(id),
        }
        Some(id)
    }

    // ---- painting ----

    pub fn projection(&self) -> Projection {
        Projection::new(self.canvas, self.row_height, self.model.max_depth())
    }

    pub fn paint<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> PaintStats {
        let measured = self.engine.row_height(canvas, &self.config);
        if measured != self.row_height {
            self.row_height = measured;
            self.refocus();
        }
        let proj = self.projection();
        let state = PaintState {
            highlighted: &self.highlighted,
            collapsed: &self.collapsed,
            hovered: self.hovered,
            focused: self.zoomed,
        };
        self.last_stats = self.engine.paint(
            canvas,
            &self.model,
            &self.config,
            &self.viewport,
            &proj,
            &state,
        );
        self.last_stats
    }

    pub fn paint_minimap<C>(&mut self, canvas: &mut C, bounds: DeviceRect) -> usize
    where
        C: Canvas + ?Sized,
    {
        let mode = self.viewport.mode;
        self.engine
            .paint_minimap(canvas, &self.model, &self.config, mode, bounds)
    }

    // ---- queries ----

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn target_viewport(&self) -> Viewport {
        self.resting()
    }

    pub fn phase(&self) -> InteractionPhase {
        if self.zoomed.is_some() {
            InteractionPhase::Zoomed
        } else if self.hovered.is_some() {
            InteractionPhase::Hovering
        } else {
            InteractionPhase::Idle
        }
    }

    pub fn hovered(&self) -> Option<FrameId> {
        self.hovered
    }

    pub fn hovered_frame(&self) -> Option<&FrameBox<N>> {
        self.model.frame(self.hovered?)
    }

    pub fn zoomed_frame(&self) -> Option<FrameId> {
        self.zoomed
    }

    pub fn painted_rect(&self, id: FrameId) -> Option<DeviceRect> {
        self.engine.painted_rect(id)
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn last_stats(&self) -> PaintStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::render::canvas::recording::RecordingCanvas;
    use crate::render::{default_font, Font};
    use crate::search::search_frames;
    use crate::task::Ticket;
    use std::sync::Mutex;

    type Name = &'static str;

    // root > a > b > c > d, plus "x" beside "a"
    fn deep_model() -> FrameModel<Name> {
        FrameModel::new(
            "deep",
            "",
            vec![
                FrameBox::new("root", 0.0, 1.0, 0),
                FrameBox::new("a", 0.0, 0.5, 1),
                FrameBox::new("b", 0.1, 0.4, 2),
                FrameBox::new("c", 0.1, 0.3, 3),
                FrameBox::new("d", 0.1, 0.2, 4),
                FrameBox::new("x", 0.5, 1.0, 1),
            ],
        )
    }

    fn view() -> FlamegraphView<Name> {
        let texts: Vec<TextFn<Name>> = vec![Arc::new(|f: &FrameBox<Name>| f.node.to_string())];
        let mut v = FlamegraphView::new(RenderConfig::new(
            texts,
            Arc::new(|_: &FrameBox<Name>| Color::rgb(0x59C0A3)),
            default_font(Font::default()),
        ));
        v.set_mode(Mode::Icicle);
        v.set_canvas_size(CanvasSize::new(1000.0, 400.0));
        v.set_model(deep_model());
        v
    }

    fn painted(mut v: FlamegraphView<Name>) -> FlamegraphView<Name> {
        v.paint(&mut RecordingCanvas::default());
        v
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl HoverListener<Name> for Arc<Recorder> {
        fn on_frame_hover(&self, frame: &FrameBox<Name>, _rect: DeviceRect, _event: &PointerEvent) {
            let line = format!("hover {}", frame.node);
            self.events.lock().expect("lock").push(line);
        }

        fn on_stop_hover(
            &self,
            previous: Option<&FrameBox<Name>>,
            _rect: Option<DeviceRect>,
            _event: &PointerEvent,
        ) {
            let name = previous.map(|f| f.node).unwrap_or("-");
            self.events.lock().expect("lock").push(format!("stop {name}"));
        }
    }

    #[test]
    fn zoom_then_reset_returns_to_identity() {
        let mut v = view();
        v.set_animation(false, DEFAULT_ZOOM_DURATION);
        let now = Instant::now();

        assert!(v.zoom_to_frame(FrameId(2), now));
        let zoomed = v.viewport();
        assert!((zoomed.zoom - 1.0 / 0.3).abs() < 1e-9);
        assert_eq!(v.phase(), InteractionPhase::Zoomed);

        v.reset_zoom(now);
        let reset = v.viewport();
        assert_eq!(reset.zoom, 1.0);
        assert_eq!(reset.translate_x, 0.0);
        assert_eq!(reset.translate_y, 0.0);
        assert_eq!(v.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn animated_zoom_reaches_target_after_duration() {
        let mut v = view();
        let start = Instant::now();
        assert!(v.zoom_to_frame(FrameId(1), start));
        assert!(v.is_animating());
        assert_eq!(v.viewport().zoom, 1.0);

        assert!(v.tick(start + Duration::from_millis(200)));
        let mid = v.viewport().zoom;
        assert!(mid > 1.0 && mid < 2.0);

        // a new request restarts from the interpolated state
        v.reset_zoom(start + Duration::from_millis(200));
        v.tick(start + Duration::from_millis(200));
        assert!((v.viewport().zoom - mid).abs() < 1e-12);

        v.tick(start + Duration::from_millis(700));
        assert!(!v.is_animating());
        assert!(v.viewport().is_identity());
        assert!(!v.tick(start + Duration::from_millis(800)));
    }

    #[test]
    fn hit_testing_uses_painted_frames() {
        let v = view();
        // nothing painted yet
        assert_eq!(v.frame_at(DevicePoint::new(50.0, 5.0)), None);

        let v = painted(v);
        assert_eq!(v.frame_at(DevicePoint::new(50.0, 5.0)), Some(FrameId(0)));
        assert_eq!(
            v.frame_at(DevicePoint::new(150.0, 18.0 * 2.0 + 1.0)),
            Some(FrameId(2))
        );
        assert_eq!(v.frame_at(DevicePoint::new(50.0, 18.0 * 2.0 + 1.0)), None);
        assert_eq!(v.frame_at(DevicePoint::new(50.0, 390.0)), None);
    }

    #[test]
    fn hover_notifies_listener() {
        let mut v = painted(view());
        let recorder = Arc::new(Recorder::default());
        v.set_hover_listener(Box::new(Arc::clone(&recorder)));

        assert!(v.pointer_moved(&PointerEvent::at(700.0, 20.0)));
        assert!(!v.pointer_moved(&PointerEvent::at(710.0, 20.0)));
        assert_eq!(v.hovered(), Some(FrameId(5)));
        assert_eq!(v.phase(), InteractionPhase::Hovering);
        assert!(v.pointer_moved(&PointerEvent::at(700.0, 300.0)));
        assert!(!v.pointer_exited(&PointerEvent::at(0.0, 0.0)));

        let events = recorder.events.lock().expect("lock").clone();
        assert_eq!(events, vec!["hover x", "hover x", "stop x"]);
    }

    #[test]
    fn click_action_is_either_zoom_or_collapse() {
        let mut v = painted(view());
        v.set_animation(false, Duration::ZERO);
        let now = Instant::now();

        let hit = v.clicked(&PointerEvent::at(700.0, 20.0), now);
        assert_eq!(hit, Some(FrameId(5)));
        assert_eq!(v.zoomed_frame(), Some(FrameId(5)));
        assert!(v.collapsed().is_empty());

        v.reset_zoom(now);
        v.set_click_action(ClickAction::ToggleCollapse);
        let mut v = painted(v);
        v.clicked(&PointerEvent::at(100.0, 20.0), now);
        assert!(v.collapsed().contains(&FrameId(1)));
        assert_eq!(v.zoomed_frame(), None);

        let v = painted(v);
        assert_eq!(v.painted_rect(FrameId(2)), None);
    }

    #[test]
    fn secondary_clicks_are_ignored() {
        let mut v = painted(view());
        let event = PointerEvent {
            button: PointerButton::Secondary,
            ..PointerEvent::at(700.0, 20.0)
        };
        assert_eq!(v.clicked(&event, Instant::now()), None);
    }

    #[test]
    fn search_results_apply_in_order() {
        let mut v = view();
        let older = v.begin_search("b").expect("non-empty query");
        let newer = v.begin_search("c").expect("non-empty query");

        assert!(v.apply_search(newer.run()));
        assert!(!v.apply_search(older.run()));
        assert_eq!(v.highlighted().len(), 1);
        assert!(v.highlighted().contains(&FrameId(3)));
        assert_eq!(v.search_text(), "c");

        assert!(v.begin_search("").is_none());
        assert!(v.highlighted().is_empty());
    }

    #[test]
    fn searches_for_a_replaced_model_are_dropped() {
        let mut v = view();
        let request = v.begin_search("d").expect("non-empty query");
        v.set_model(deep_model());
        assert!(!v.apply_search(request.run()));
        assert!(v.highlighted().is_empty());
    }

    #[test]
    fn manual_highlight_supersedes_pending_search() {
        let mut v = view();
        let pending = v.begin_search("a").expect("non-empty query");
        let texts = Arc::clone(&v.render_config().texts);
        let hits = search_frames(v.model(), &texts, "x");
        v.highlight_frames(hits, "x");
        assert!(!v.apply_search(pending.run()));
        assert!(v.highlighted().contains(&FrameId(5)));

        let stale = SearchOutcome {
            ticket: Ticket(0),
            generation: v.generation(),
            query: "zzz".into(),
            matches: HashSet::new(),
        };
        assert!(!v.apply_search(stale));
    }

    #[test]
    fn model_refresh_keeps_equivalent_zoom() {
        let mut v = view();
        v.set_animation(false, Duration::ZERO);
        let now = Instant::now();
        v.zoom_to_frame(FrameId(5), now);

        // "x" moved to the front of the new model
        let refreshed = FrameModel::new(
            "deep",
            "",
            vec![
                FrameBox::new("root", 0.0, 1.0, 0),
                FrameBox::new("x", 0.0, 0.25, 1),
                FrameBox::new("a", 0.25, 1.0, 1),
            ],
        );
        v.set_model(refreshed);
        assert_eq!(v.zoomed_frame(), Some(FrameId(1)));
        assert!((v.viewport().zoom - 4.0).abs() < 1e-9);
        assert_eq!(v.generation(), 2);

        let without_x = FrameModel::new("deep", "", vec![FrameBox::new("root", 0.0, 1.0, 0)]);
        v.set_model(without_x);
        assert_eq!(v.zoomed_frame(), None);
        assert!(v.viewport().is_identity());
    }

    #[test]
    fn model_refresh_drops_collapsed_and_highlighted() {
        let mut v = view();
        v.toggle_collapse(FrameId(1));
        v.highlight_frames([FrameId(2)].into_iter().collect(), "b");
        v.set_model(deep_model());
        assert!(v.collapsed().is_empty());
        assert!(v.highlighted().is_empty());
        assert_eq!(v.search_text(), "b");
    }

    #[test]
    fn wheel_and_drag_stay_clamped() {
        let mut v = view();
        v.zoom_by(DevicePoint::new(500.0, 10.0), 2.0);
        assert_eq!(v.viewport().zoom, 2.0);
        v.drag(10_000.0, 0.0);
        assert_eq!(v.viewport().translate_x, 0.0);
        v.zoom_by(DevicePoint::new(500.0, 10.0), 0.1);
        assert!(v.viewport().is_identity());
    }

    #[test]
    fn manual_zoom_and_pan_release_the_focused_frame() {
        let mut v = painted(view());
        v.set_animation(false, Duration::ZERO);
        let now = Instant::now();

        v.zoom_to_frame(FrameId(1), now);
        v.drag(0.0, 5.0);
        assert_eq!(v.zoomed_frame(), Some(FrameId(1)));
        v.drag(-100.0, 0.0);
        assert_eq!(v.zoomed_frame(), None);
        assert_eq!(v.phase(), InteractionPhase::Idle);

        v.zoom_to_frame(FrameId(1), now);
        v.zoom_by(DevicePoint::new(100.0, 10.0), 1.5);
        assert_eq!(v.zoomed_frame(), None);
    }

    #[test]
    fn restored_zoom_follows_the_measured_row_height() {
        let mut v = view();
        v.set_animation(false, Duration::ZERO);
        v.zoom_to_frame(FrameId(4), Instant::now());
        v.set_model(deep_model());
        assert_eq!(v.zoomed_frame(), Some(FrameId(4)));
        assert_eq!(v.viewport().translate_y, 0.0);

        // 100 line height + 2 * 2 padding + 2 * 1 gap
        let mut tall = RecordingCanvas {
            line_height: 100.0,
            ..RecordingCanvas::default()
        };
        v.paint(&mut tall);
        assert_eq!(v.row_height(), 106.0);
        assert_eq!(v.zoomed_frame(), Some(FrameId(4)));
        assert_eq!(v.viewport().translate_y, 400.0 - 5.0 * 106.0);
        let d = v.painted_rect(FrameId(4)).expect("zoomed frame painted");
        assert!(d.y >= 0.0 && d.bottom() <= 400.0);
    }

    #[test]
    fn mode_switch_mirrors_rows() {
        let mut v = painted(view());
        let icicle = v.painted_rect(FrameId(0)).expect("root painted");
        v.set_mode(Mode::Flamegraph);
        let v = painted(v);
        let flame = v.painted_rect(FrameId(0)).expect("root painted");
        assert_eq!(icicle.y, 0.0);
        assert_eq!(flame.y, 4.0 * 18.0);
    }

    #[test]
    fn resize_keeps_visible_range() {
        let mut v = view();
        v.set_animation(false, Duration::ZERO);
        v.zoom_to_frame(FrameId(5), Instant::now());
        let before = v.viewport().visible_range(&v.projection());
        v.set_canvas_size(CanvasSize::new(500.0, 400.0));
        let after = v.viewport().visible_range(&v.projection());
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn minimap_click_centers_view() {
        let mut v = view();
        v.zoom_by(DevicePoint::new(0.0, 0.0), 4.0);
        let minimap = DeviceRect::new(0.0, 0.0, 100.0, 20.0);
        v.minimap_navigate(minimap, DevicePoint::new(50.0, 10.0));
        let (start, end) = v.viewport().visible_range(&v.projection());
        assert!((start - 0.375).abs() < 1e-9);
        assert!((end - 0.625).abs() < 1e-9);
    }
}
