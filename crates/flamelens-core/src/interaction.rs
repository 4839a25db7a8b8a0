use serde::{Deserialize, Serialize};

use crate::frame::FrameBox;
use crate::geometry::{DevicePoint, DeviceRect};

/// What a primary click on a frame does. Only one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    #[default]
    ZoomToFrame,
    ToggleCollapse,
}

impl ClickAction {
    pub fn label(self) -> &'static str {
        match self {
            ClickAction::ZoomToFrame => "zoom to frame",
            ClickAction::ToggleCollapse => "collapse / expand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Pointer input in canvas device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: DevicePoint,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: DevicePoint::new(x, y),
            button: PointerButton::Primary,
        }
    }
}

/// Receives hover changes, typically to drive a tooltip.
///
/// Called on the UI thread from inside the view's pointer handling; keep it cheap.
pub trait HoverListener<N>: Send + Sync {
    /// The pointer is over `frame`, painted at `rect`. Called on every move.
    fn on_frame_hover(&self, frame: &FrameBox<N>, rect: DeviceRect, event: &PointerEvent);

    /// The pointer left `previous` (if any) and is over no frame.
    fn on_stop_hover(
        &self,
        previous: Option<&FrameBox<N>>,
        previous_rect: Option<DeviceRect>,
        event: &PointerEvent,
    ) {
        let _ = (previous, previous_rect, event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionPhase {
    Idle,
    Hovering,
    Zoomed,
}
