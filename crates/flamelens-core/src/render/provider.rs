use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::color::{Color, Theme};
use crate::frame::FrameBox;
use crate::render::canvas::{Font, FontStyle};
use crate::render::flags::RenderFlags;

/// One way of labelling a frame, e.g. the fully qualified name or just the method.
pub type TextFn<N> = Arc<dyn Fn(&FrameBox<N>) -> String + Send + Sync>;

/// Labels from most to least detailed.
pub type TextCandidates<N> = Arc<Vec<TextFn<N>>>;

/// Base fill color of a non-root frame.
pub type ColorFn<N> = Arc<dyn Fn(&FrameBox<N>) -> Color + Send + Sync>;

/// Font for a frame; called with `None` to size rows.
pub type FontFn<N> = Arc<dyn Fn(Option<&FrameBox<N>>, RenderFlags) -> Font + Send + Sync>;

/// Bold root, italic partial frames, regular otherwise.
pub fn default_font<N>(base: Font) -> FontFn<N> {
    Arc::new(move |frame: Option<&FrameBox<N>>, flags: RenderFlags| match frame {
        Some(f) if f.is_root() => base.with_style(FontStyle::Bold),
        Some(_) if flags.contains(RenderFlags::PARTIAL) => base.with_style(FontStyle::Italic),
        _ => base,
    })
}

/// The caller-supplied strategies.
pub struct RenderConfig<N> {
    pub texts: TextCandidates<N>,
    pub color: ColorFn<N>,
    pub font: FontFn<N>,
}

impl<N> Clone for RenderConfig<N> {
    fn clone(&self) -> Self {
        Self {
            texts: Arc::clone(&self.texts),
            color: Arc::clone(&self.color),
            font: Arc::clone(&self.font),
        }
    }
}

impl<N> RenderConfig<N> {
    pub fn new(texts: Vec<TextFn<N>>, color: ColorFn<N>, font: FontFn<N>) -> Self {
        Self {
            texts: Arc::new(texts),
            color,
            font,
        }
    }
}

impl<N: 'static> Default for RenderConfig<N> {
    fn default() -> Self {
        Self::new(
            Vec::new(),
            Arc::new(|_: &FrameBox<N>| Color::rgb(0xB0B0B0)),
            default_font(Font::default()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorModel {
    pub background: Color,
    pub foreground: Color,
}

/// Resolves frame colors: fixed root color, dimming for search and focus,
/// hover tint and a contrasting foreground.
#[derive(Debug, Default)]
pub struct DimmingColorProvider {
    theme: Theme,
    dimmed: FxHashMap<Color, Color>,
}

impl DimmingColorProvider {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            dimmed: FxHashMap::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.dimmed.clear();
        }
    }

    pub fn colors<N>(
        &mut self,
        base: &ColorFn<N>,
        frame: &FrameBox<N>,
        flags: RenderFlags,
    ) -> ColorModel {
        let theme = self.theme;
        let root = frame.is_root();
        let mut background = if root {
            theme.root_background()
        } else {
            base(frame)
        };

        if flags.contains(RenderFlags::MINIMAP) {
            return ColorModel {
                background,
                foreground: background,
            };
        }

        let mut foreground;
        if !root && flags.should_dim() {
            background = *self
                .dimmed
                .entry(background)
                .or_insert_with(|| background.dim(theme));
            foreground = theme.dimmed_text();
        } else {
            foreground = Color::foreground_for(background, theme);
        }

        if flags.contains(RenderFlags::HOVERED) {
            background = background.blend(theme.hovered());
            foreground = Color::foreground_for(background, theme);
        }

        ColorModel {
            background,
            foreground,
        }
    }

    pub fn cached_dims(&self) -> usize {
        self.dimmed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ColorFn<&'static str> {
        Arc::new(|_: &FrameBox<&'static str>| Color::rgb(0xF94144))
    }

    #[test]
    fn root_uses_fixed_color_and_is_never_dimmed() {
        let mut p = DimmingColorProvider::new(Theme::Light);
        let root = FrameBox::new("root", 0.0, 1.0, 0);
        let c = p.colors(&base(), &root, RenderFlags::HIGHLIGHTING);
        assert_eq!(c.background, Theme::Light.root_background());
    }

    #[test]
    fn non_matching_frames_are_dimmed_and_cached() {
        let mut p = DimmingColorProvider::new(Theme::Light);
        let f = FrameBox::new("a", 0.0, 0.5, 1);
        let dimmed = p.colors(&base(), &f, RenderFlags::HIGHLIGHTING);
        assert_eq!(dimmed.background, Color::rgb(0xF94144).dim(Theme::Light));
        assert_eq!(dimmed.foreground, Theme::Light.dimmed_text());
        p.colors(&base(), &f, RenderFlags::HIGHLIGHTING);
        assert_eq!(p.cached_dims(), 1);

        let hit = RenderFlags::HIGHLIGHTING | RenderFlags::HIGHLIGHTED;
        let matched = p.colors(&base(), &f, hit);
        assert_eq!(matched.background, Color::rgb(0xF94144));

        p.set_theme(Theme::Dark);
        assert_eq!(p.cached_dims(), 0);
    }

    #[test]
    fn hover_blends_with_hover_color() {
        let mut p = DimmingColorProvider::new(Theme::Light);
        let f = FrameBox::new("a", 0.0, 0.5, 1);
        let c = p.colors(&base(), &f, RenderFlags::HOVERED);
        assert_eq!(
            c.background,
            Color::rgb(0xF94144).blend(Theme::Light.hovered())
        );
    }

    #[test]
    fn default_font_styles_root_and_partial_frames() {
        let font = default_font::<&'static str>(Font::default());
        let root = FrameBox::new("root", 0.0, 1.0, 0);
        let child = FrameBox::new("a", 0.0, 1.0, 1);
        assert_eq!(
            font(Some(&root), RenderFlags::empty()).style,
            FontStyle::Bold
        );
        assert_eq!(
            font(Some(&child), RenderFlags::PARTIAL).style,
            FontStyle::Italic
        );
        assert_eq!(font(None, RenderFlags::empty()).style, FontStyle::Regular);
    }
}
