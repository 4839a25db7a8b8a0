pub mod help;
pub mod hud;
pub mod panel;
pub mod search;
pub mod shortcuts;
pub mod tooltips;

pub use help::help_overlay;
pub use hud::hud_overlay;
pub use panel::ui_panel;
pub use search::search_overlay;
pub use shortcuts::handle_shortcuts;
pub use tooltips::tooltip_overlay;

pub const PANEL_W: f32 = 260.0;
pub const HUD_EDGE_PADDING: f32 = 8.0;
pub const HUD_W: f32 = 220.0;
