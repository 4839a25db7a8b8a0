use anyhow::Context;
use directories::ProjectDirs;
use flamelens_core::{ClickAction, Mode, Palette, RenderSettings, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::profile::{ColorBy, WeightKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub mode: Mode,
    pub palette: Palette,
    pub color_by: ColorBy,
    pub theme: Theme,
    pub click_action: ClickAction,
    pub animate_zoom: bool,
    pub animation_ms: u64,
    pub frame_gaps: bool,
    pub rounded_frames: bool,
    pub hovered_border: bool,
    pub min_text_width: f64,
    pub show_minimap: bool,
    pub show_hud: bool,
    pub weight: WeightKind,
    pub last_file: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Flamegraph,
            palette: Palette::Pyroscope,
            color_by: ColorBy::Name,
            theme: Theme::Light,
            click_action: ClickAction::ZoomToFrame,
            animate_zoom: true,
            animation_ms: 400,
            frame_gaps: true,
            rounded_frames: false,
            hovered_border: true,
            min_text_width: 12.0,
            show_minimap: true,
            show_hud: false,
            weight: WeightKind::Samples,
            last_file: None,
        }
    }
}

impl ViewerConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Engine settings derived from this config; unlisted knobs keep their defaults.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            frame_gaps: self.frame_gaps,
            rounded: self.rounded_frames,
            paint_hovered_border: self.hovered_border,
            min_text_width: self.min_text_width.max(0.0),
            theme: self.theme,
            ..RenderSettings::default()
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "flamelens")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let Some(path) = config_file_path() else {
        return ViewerConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable viewer config");
        ViewerConfig::default()
    })
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<PathBuf> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)?;
    Ok(path)
}

fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg)
        .context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
