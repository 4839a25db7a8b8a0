use crate::frame::FrameBox;
use crate::render::canvas::{Canvas, Font};
use crate::render::provider::TextFn;

pub const ELLIPSIS: &str = "…";

/// Longest prefix of `text` that, followed by [`ELLIPSIS`], fits in `max_width`.
///
/// Returns only the ellipsis when not even one character fits.
pub fn clip_right<C>(canvas: &C, font: &Font, text: &str, max_width: f64) -> String
where
    C: Canvas + ?Sized,
{
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let fits = |chars: usize| {
        let mut candidate = String::with_capacity(boundaries[chars] + ELLIPSIS.len());
        candidate.push_str(&text[..boundaries[chars]]);
        candidate.push_str(ELLIPSIS);
        canvas.text_width(&candidate, font) <= max_width
    };

    // widths are monotonic in the prefix length
    let (mut lo, mut hi) = (0usize, boundaries.len() - 1);
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let mut out = text[..boundaries[lo]].trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Chooses the label drawn inside `frame`.
///
/// The root shows `title` when it is not blank. Other frames take the first
/// candidate that fits. When nothing fits the last candidate is clipped, and
/// the clipped text is kept only if it still shows more than one character.
pub fn frame_text<N, C: Canvas + ?Sized>(
    canvas: &C,
    font: &Font,
    max_width: f64,
    title: &str,
    frame: &FrameBox<N>,
    candidates: &[TextFn<N>],
) -> Option<String> {
    if !(max_width > 0.0) {
        return None;
    }

    let mut last = String::new();
    if frame.is_root() && !title.trim().is_empty() {
        last = title.to_string();
        if canvas.text_width(&last, font) <= max_width {
            return Some(last);
        }
    } else {
        for candidate in candidates {
            let text = candidate(frame);
            if text.trim().is_empty() {
                continue;
            }
            if canvas.text_width(&text, font) <= max_width {
                return Some(text);
            }
            last = text;
        }
    }

    if last.trim().is_empty() {
        return None;
    }
    let clipped = clip_right(canvas, font, &last, max_width);
    let too_short = clipped.chars().count() <= ELLIPSIS.chars().count() + 1;
    if too_short || canvas.text_width(&clipped, font) > max_width {
        return None;
    }
    Some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::recording::RecordingCanvas;
    use std::sync::Arc;

    fn candidates() -> Vec<TextFn<&'static str>> {
        vec![
            Arc::new(|f: &FrameBox<&'static str>| {
                format!("com.example.{}", f.node)
            }),
            Arc::new(|f: &FrameBox<&'static str>| f.node.to_string()),
        ]
    }

    #[test]
    fn picks_first_candidate_that_fits() {
        let canvas = RecordingCanvas::default();
        let frame = FrameBox::new("render", 0.0, 0.5, 1);
        let font = Font::default();

        let wide = frame_text(&canvas, &font, 1000.0, "", &frame, &candidates());
        assert_eq!(wide.as_deref(), Some("com.example.render"));

        // "render" is 6 glyphs of 7px
        let narrow = frame_text(&canvas, &font, 42.0, "", &frame, &candidates());
        assert_eq!(narrow.as_deref(), Some("render"));
    }

    #[test]
    fn clips_last_candidate_when_nothing_fits() {
        let canvas = RecordingCanvas::default();
        let frame = FrameBox::new("render", 0.0, 0.5, 1);
        let font = Font::default();
        let text = frame_text(&canvas, &font, 28.0, "", &frame, &candidates());
        assert_eq!(text.as_deref(), Some("ren…"));
    }

    #[test]
    fn drops_text_that_would_be_a_lone_character() {
        let canvas = RecordingCanvas::default();
        let frame = FrameBox::new("render", 0.0, 0.5, 1);
        let font = Font::default();
        let cs = candidates();
        assert_eq!(frame_text(&canvas, &font, 14.0, "", &frame, &cs), None);
        assert_eq!(frame_text(&canvas, &font, 0.0, "", &frame, &cs), None);
    }

    #[test]
    fn root_shows_title() {
        let canvas = RecordingCanvas::default();
        let root = FrameBox::new("root", 0.0, 1.0, 0);
        let font = Font::default();
        let text = frame_text(&canvas, &font, 1000.0, "CPU samples", &root, &candidates());
        assert_eq!(text.as_deref(), Some("CPU samples"));

        let blank_title = frame_text(&canvas, &font, 1000.0, "  ", &root, &candidates());
        assert_eq!(blank_title.as_deref(), Some("com.example.root"));
    }

    #[test]
    fn blank_candidates_are_skipped() {
        let canvas = RecordingCanvas::default();
        let frame = FrameBox::new("render", 0.0, 0.5, 1);
        let texts: Vec<TextFn<&'static str>> = vec![
            Arc::new(|_: &FrameBox<&'static str>| "   ".to_string()),
            Arc::new(|f: &FrameBox<&'static str>| f.node.to_string()),
            Arc::new(|_: &FrameBox<&'static str>| String::new()),
        ];
        let font = Font::default();
        assert_eq!(
            frame_text(&canvas, &font, 1000.0, "", &frame, &texts).as_deref(),
            Some("render")
        );
        // the blank trailing candidate does not hide the clipped one
        assert_eq!(
            frame_text(&canvas, &font, 28.0, "", &frame, &texts).as_deref(),
            Some("ren…")
        );
    }

    #[test]
    fn clip_right_respects_char_boundaries() {
        let canvas = RecordingCanvas::default();
        let clipped = clip_right(&canvas, &Font::default(), "héllo wörld", 35.0);
        assert_eq!(clipped, "héll…");
        assert_eq!(clip_right(&canvas, &Font::default(), "abc", 1.0), ELLIPSIS);
    }
}
