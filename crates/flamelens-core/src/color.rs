use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::layout::WeightRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFFFFFF);
    pub const BLACK: Color = Color::rgb(0x000000);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn rgb(hex: u32) -> Color {
        Color {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 0xFF,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, 0xFF)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    /// Alpha-weighted average of both colors; the result keeps the larger alpha.
    pub fn blend(self, other: Color) -> Color {
        let total = self.a as f64 + other.a as f64;
        if total == 0.0 {
            return Color::TRANSPARENT;
        }
        let w0 = self.a as f64 / total;
        let w1 = other.a as f64 / total;
        let mix = |a: u8, b: u8| (w0 * a as f64 + w1 * b as f64) as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a.max(other.a),
        }
    }

    /// Washed-out variant used for frames outside the search or focus.
    ///
    /// Saturated colors lose most of their saturation, near-grays keep it,
    /// and the lightness is pinned close to the theme's background.
    pub fn dim(self, theme: Theme) -> Color {
        let mut hsla = Hsla::from(self);
        match theme {
            Theme::Light => {
                if hsla.s >= 0.2 {
                    hsla.s = 0.4;
                }
                hsla.l = 0.93;
            }
            Theme::Dark => {
                if hsla.s >= 0.1 {
                    hsla.s = 0.2;
                }
                hsla.l = 0.2;
            }
        }
        hsla.into()
    }

    /// Perceived brightness in `0..=255` (sRGB relative luminance, gamma encoded).
    pub fn brightness(self) -> u8 {
        let y = 0.212655 * linearize(self.r)
            + 0.715158 * linearize(self.g)
            + 0.072187 * linearize(self.b);
        gamma(y)
    }

    pub fn is_bright(self) -> bool {
        self.brightness() >= gamma(0.45)
    }

    /// Readable text color on top of `background`.
    pub fn foreground_for(background: Color, theme: Theme) -> Color {
        if background.is_bright() {
            theme.ink()
        } else {
            Color::WHITE
        }
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn gamma(v: f64) -> u8 {
    let v = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy)]
struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    a: u8,
}

impl From<Color> for Hsla {
    fn from(c: Color) -> Self {
        let r = c.r as f64 / 255.0;
        let g = c.g as f64 / 255.0;
        let b = c.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d == 0.0 {
            return Hsla {
                h: 0.0,
                s: 0.0,
                l,
                a: c.a,
            };
        }
        let s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if r == max {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if g == max {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        Hsla {
            h: h * 60.0,
            s,
            l,
            a: c.a,
        }
    }
}

impl From<Hsla> for Color {
    fn from(c: Hsla) -> Self {
        let h = c.h.rem_euclid(360.0);
        let s = c.s.clamp(0.0, 1.0);
        let l = c.l.clamp(0.0, 1.0);
        let m2 = l + (if l < 0.5 { l } else { 1.0 - l }) * s;
        let m1 = 2.0 * l - m2;
        let channel = |h: f64| {
            let v = if h < 60.0 {
                m1 + (m2 - m1) * h / 60.0
            } else if h < 180.0 {
                m2
            } else if h < 240.0 {
                m1 + (m2 - m1) * (240.0 - h) / 60.0
            } else {
                m1
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }),
            g: channel(h),
            b: channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }),
            a: c.a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn background(self) -> Color {
        match self {
            Theme::Light => Color::WHITE,
            Theme::Dark => Color::rgb(0x1E1F22),
        }
    }

    /// Text color for bright backgrounds.
    pub fn ink(self) -> Color {
        match self {
            Theme::Light => Color::rgb(0x1C2B34),
            Theme::Dark => Color::rgb(0x1E1F22),
        }
    }

    /// Fixed background of the root frame.
    pub fn root_background(self) -> Color {
        match self {
            Theme::Light => Color::rgb(0xEAF6FC),
            Theme::Dark => Color::rgb(0x091222),
        }
    }

    pub fn hovered(self) -> Color {
        match self {
            Theme::Light => Color::rgb(0xE0C268),
            Theme::Dark => Color::rgb(0xE0C268).with_alpha(0xD0),
        }
    }

    pub fn dimmed_text(self) -> Color {
        match self {
            Theme::Light => Color::rgba(28, 43, 52, 173),
            Theme::Dark => Color::rgba(255, 255, 255, 130),
        }
    }

    /// Outline drawn around the hovered frame.
    pub fn hovered_border(self) -> Color {
        match self {
            Theme::Light => Color::rgb(0x1C2B34),
            Theme::Dark => Color::WHITE,
        }
    }
}

const PYROSCOPE: &[Color] = &[
    Color::rgb(0xDF8B53),
    Color::rgb(0xE0AD6C),
    Color::rgb(0x68B7CF),
    Color::rgb(0x59C0A3),
    Color::rgb(0x6897CA),
    Color::rgb(0x8982C9),
    Color::rgb(0xEBA8E6),
    Color::rgb(0xFFE175),
    Color::rgb(0xB7DBAB),
    Color::rgb(0xF4D598),
    Color::rgb(0x70DBED),
    Color::rgb(0xF9BA8F),
    Color::rgb(0xF29191),
    Color::rgb(0x82B5D8),
    Color::rgb(0xE5A8E2),
    Color::rgb(0xAEA2E0),
    Color::rgb(0x9AC48A),
    Color::rgb(0xF2C96D),
    Color::rgb(0x65C5DB),
    Color::rgb(0xF9934E),
    Color::rgb(0xEA6460),
    Color::rgb(0x5195CE),
    Color::rgb(0xD683CE),
    Color::rgb(0x806EB7),
];

const DATADOG: &[Color] = &[
    Color::rgb(0x3399CC),
    Color::rgb(0x927FB9),
    Color::rgb(0xFFCC00),
    Color::rgb(0x57B79A),
    Color::rgb(0xBE53BB),
    Color::rgb(0xDD8451),
    Color::rgb(0x3969B3),
    Color::rgb(0xBED017),
    Color::rgb(0x8934A4),
    Color::rgb(0x3BCBCB),
    Color::rgb(0x6E69CC),
    Color::rgb(0x50931F),
    Color::rgb(0xC86B74),
    Color::rgb(0xFCAF2B),
    Color::rgb(0x2EB0DE),
    Color::rgb(0xC68CCD),
    Color::rgb(0x457557),
    Color::rgb(0xCC3C71),
    Color::rgb(0x985083),
    Color::rgb(0xA7B342),
];

const LIGHT_RED_TO_BLUE: &[Color] = &[
    Color::rgb(0xF94144),
    Color::rgb(0xF3722C),
    Color::rgb(0xF8961E),
    Color::rgb(0xF9C74F),
    Color::rgb(0x90BE6D),
    Color::rgb(0x43AA8B),
    Color::rgb(0x577590),
];

const DARK_BLUE_GREEN_ORANGE_RED: &[Color] = &[
    // blue
    Color::rgb(0x178FFF),
    Color::rgb(0x45A5FF),
    Color::rgb(0x73BCFF),
    Color::rgb(0xA2D2FF),
    // green
    Color::rgb(0x15CB49),
    Color::rgb(0x44D566),
    Color::rgb(0x73E092),
    Color::rgb(0xA2EAB6),
    // orange
    Color::rgb(0xFF9E2E),
    Color::rgb(0xFFB157),
    Color::rgb(0xFFC581),
    Color::rgb(0xFFD9AB),
    // red
    Color::rgb(0xF74241),
    Color::rgb(0xF96767),
    Color::rgb(0xFA8D8D),
    Color::rgb(0xFCB3B3),
];

/// Named color sets for hash based coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    #[default]
    Pyroscope,
    Datadog,
    LightRedToBlue,
    DarkBlueGreenOrangeRed,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Pyroscope,
        Palette::Datadog,
        Palette::LightRedToBlue,
        Palette::DarkBlueGreenOrangeRed,
    ];

    pub fn colors(self) -> &'static [Color] {
        match self {
            Palette::Pyroscope => PYROSCOPE,
            Palette::Datadog => DATADOG,
            Palette::LightRedToBlue => LIGHT_RED_TO_BLUE,
            Palette::DarkBlueGreenOrangeRed => DARK_BLUE_GREEN_ORANGE_RED,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Palette::Pyroscope => "Pyroscope",
            Palette::Datadog => "Datadog",
            Palette::LightRedToBlue => "Red to blue",
            Palette::DarkBlueGreenOrangeRed => "Blue, green, orange, red",
        }
    }

    pub fn next(self) -> Palette {
        let i = Palette::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Palette::ALL[(i + 1) % Palette::ALL.len()]
    }

    pub fn color_for_hash(self, hash: u64) -> Color {
        let colors = self.colors();
        colors[(hash % colors.len() as u64) as usize]
    }

    pub fn color_for_name(self, name: &str) -> Color {
        self.color_for_hash(hash_name(name))
    }

    /// Maps `value` through `range` onto the palette, low values first.
    /// Without a usable range every value gets the first color.
    pub fn heat(self, range: Option<WeightRange>, value: f64) -> Color {
        let colors = self.colors();
        let Some(range) = range else {
            return colors[0];
        };
        let t = range.normalize(value);
        let i = (t * (colors.len() - 1) as f64).round() as usize;
        colors[i.min(colors.len() - 1)]
    }
}

/// Stable (process independent) hash of a frame name.
pub fn hash_name(name: &str) -> u64 {
    let mut h = rustc_hash::FxHasher::default();
    name.hash(&mut h);
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_alpha() {
        assert_eq!(Color::parse_hex("#f94144"), Some(Color::rgb(0xF94144)));
        assert_eq!(
            Color::parse_hex("F9414480"),
            Some(Color::rgba(0xF9, 0x41, 0x44, 0x80))
        );
        assert_eq!(Color::parse_hex("#44D566D"), None);
        assert_eq!(Color::parse_hex("zzzzzz"), None);
    }

    #[test]
    fn blend_averages_by_alpha() {
        assert_eq!(
            Color::WHITE.blend(Color::BLACK),
            Color::rgba(127, 127, 127, 255)
        );
        let faint = Color::BLACK.with_alpha(0);
        assert_eq!(Color::WHITE.blend(faint), Color::WHITE);
    }

    #[test]
    fn dimming_follows_theme() {
        let red = Color::rgb(0xF94144);
        assert!(red.dim(Theme::Light).is_bright());
        assert!(!red.dim(Theme::Dark).is_bright());
        assert_eq!(red.dim(Theme::Light).a, 0xFF);
    }

    #[test]
    fn grays_survive_hsl_round_trip() {
        let gray = Color::rgb(0x808080);
        let back: Color = Hsla::from(gray).into();
        assert_eq!(back, gray);
    }

    #[test]
    fn foreground_contrasts_with_background() {
        assert_eq!(
            Color::foreground_for(Color::BLACK, Theme::Light),
            Color::WHITE
        );
        assert_eq!(
            Color::foreground_for(Color::WHITE, Theme::Light),
            Theme::Light.ink()
        );
        assert_eq!(Color::WHITE.brightness(), 255);
        assert_eq!(Color::BLACK.brightness(), 0);
    }

    #[test]
    fn heat_handles_degenerate_ranges() {
        let p = Palette::LightRedToBlue;
        assert_eq!(p.heat(None, 42.0), p.colors()[0]);
        let range = WeightRange::new(0.0, 10.0);
        assert_eq!(
            p.heat(range, 10.0),
            *p.colors().last().expect("non-empty palette")
        );
        assert_eq!(p.heat(range, -3.0), p.colors()[0]);
    }

    #[test]
    fn name_colors_are_stable() {
        let p = Palette::Datadog;
        assert_eq!(
            p.color_for_name("java.lang.Thread.run"),
            p.color_for_name("java.lang.Thread.run")
        );
        assert_eq!(Palette::DarkBlueGreenOrangeRed.next(), Palette::Pyroscope);
    }
}
