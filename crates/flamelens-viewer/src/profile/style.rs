use std::sync::Arc;

use flamelens_core::{
    default_font, ColorFn, Font, FontStyle, FrameBox, FrameModel, Palette, RenderConfig, TextFn,
    WeightRange,
};
use serde::{Deserialize, Serialize};

use super::{StackFrame, WeightKind};

/// How frames pick their base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBy {
    /// Palette entry chosen by a hash of the frame name.
    #[default]
    Name,
    /// Palette position follows the frame's self weight.
    SelfWeight,
}

impl ColorBy {
    pub fn label(self) -> &'static str {
        match self {
            ColorBy::Name => "name",
            ColorBy::SelfWeight => "self weight",
        }
    }
}

fn separator(name: &str) -> &'static str {
    if name.contains("::") {
        "::"
    } else {
        "."
    }
}

/// Last two path segments: `Class.method` or `module::function`.
pub fn short_name(name: &str) -> &str {
    let sep = separator(name);
    let mut cut = name.rmatch_indices(sep).map(|(i, _)| i);
    match (cut.next(), cut.next()) {
        (Some(_), Some(second)) => &name[second + sep.len()..],
        _ => name,
    }
}

/// Last path segment only.
pub fn simple_name(name: &str) -> &str {
    let sep = separator(name);
    name.rsplit_once(sep).map_or(name, |(_, last)| last)
}

fn texts() -> Vec<TextFn<StackFrame>> {
    vec![
        Arc::new(|f: &FrameBox<StackFrame>| f.node.name().to_string()),
        Arc::new(|f: &FrameBox<StackFrame>| {
            short_name(f.node.name()).to_string()
        }),
        Arc::new(|f: &FrameBox<StackFrame>| {
            simple_name(f.node.name()).to_string()
        }),
    ]
}

/// Text, color and font strategies for `model`.
pub fn render_config(
    model: &FrameModel<StackFrame>,
    palette: Palette,
    color_by: ColorBy,
    weight: WeightKind,
) -> RenderConfig<StackFrame> {
    let color: ColorFn<StackFrame> = match color_by {
        ColorBy::Name => Arc::new(move |f: &FrameBox<StackFrame>| {
            palette.color_for_name(f.node.name())
        }),
        ColorBy::SelfWeight => {
            let range = WeightRange::of(
                model
                    .frames()
                    .iter()
                    .filter(|f| !f.is_root())
                    .map(|f| weight.self_weight(&f.node)),
            );
            Arc::new(move |f: &FrameBox<StackFrame>| {
                palette.heat(range, weight.self_weight(&f.node))
            })
        }
    };
    let font = default_font(Font::new(13.0, FontStyle::Regular));
    RenderConfig::new(texts(), color, font)
}
