use bevy::prelude::{Res, ResMut};
use bevy_egui::{egui, EguiContexts};
use crossbeam_channel::Sender;
use flamelens_core::{DeviceRect, FrameBox, FrameModel, HoverListener, PointerEvent};

use crate::app::resources::HoverRx;
use crate::app::ViewerState;
use crate::profile::{short_name, StackFrame};

#[derive(Debug, Clone)]
pub enum HoverEvent {
    Enter(FrameBox<StackFrame>),
    Leave,
}

/// Forwards hover changes from the view to the tooltip system.
pub struct HoverFeed {
    tx: Sender<HoverEvent>,
}

impl HoverFeed {
    pub fn new(tx: Sender<HoverEvent>) -> Self {
        Self { tx }
    }
}

impl HoverListener<StackFrame> for HoverFeed {
    fn on_frame_hover(
        &self,
        frame: &FrameBox<StackFrame>,
        _rect: DeviceRect,
        _event: &PointerEvent,
    ) {
        let _ = self.tx.send(HoverEvent::Enter(frame.clone()));
    }

    fn on_stop_hover(
        &self,
        _previous: Option<&FrameBox<StackFrame>>,
        _previous_rect: Option<DeviceRect>,
        _event: &PointerEvent,
    ) {
        let _ = self.tx.send(HoverEvent::Leave);
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Tooltip text for `frame`. The root shows the model description.
pub fn tooltip_lines(model: &FrameModel<StackFrame>, frame: &FrameBox<StackFrame>) -> Vec<String> {
    if frame.is_root() {
        return vec![model.title().to_string(), model.description().to_string()];
    }
    let root = model.frames().first().map(|r| &r.node);
    let total_samples = root.map_or(0, StackFrame::samples);
    let total_bytes = root.map_or(0, StackFrame::bytes);
    let node = &frame.node;

    let mut lines = vec![node.name().to_string()];
    if short_name(node.name()) != node.name() {
        lines.push(short_name(node.name()).to_string());
    }
    lines.push(format!(
        "samples: {} ({:.2}%), self {}",
        node.samples(),
        percent(node.samples(), total_samples),
        node.self_samples()
    ));
    if total_bytes > 0 {
        lines.push(format!(
            "bytes: {} ({:.2}%), self {}",
            node.bytes(),
            percent(node.bytes(), total_bytes),
            node.self_bytes()
        ));
    }
    lines.push(format!("depth: {}", frame.depth));
    lines
}

pub fn render_tooltip(
    ctx: &egui::Context,
    id: &str,
    pos: egui::Pos2,
    lines: impl IntoIterator<Item = String>,
) {
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            ui.group(|ui| {
                let mut lines = lines.into_iter();
                if let Some(title) = lines.next() {
                    ui.strong(title);
                }
                for line in lines {
                    ui.label(line);
                }
            });
        });
}

pub fn tooltip_overlay(mut contexts: EguiContexts, mut st: ResMut<ViewerState>, rx: Res<HoverRx>) {
    for event in rx.0.try_iter() {
        st.ui.hover = match event {
            HoverEvent::Enter(frame) => Some(frame),
            HoverEvent::Leave => None,
        };
    }
    // stale after a model swap or once the pointer left the canvas
    if st.view.hovered().is_none() {
        st.ui.hover = None;
    }
    let Some(frame) = st.ui.hover.as_ref() else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let Some(pointer) = ctx.pointer_hover_pos() else {
        return;
    };
    let lines = tooltip_lines(st.view.model(), frame);
    let at = pointer + egui::vec2(16.0, 16.0);
    render_tooltip(ctx, "frame-tooltip", at, lines);
}
