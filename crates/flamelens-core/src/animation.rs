use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::viewport::Viewport;

pub const DEFAULT_ZOOM_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    SineInOut,
    CubicOut,
}

impl Easing {
    /// Maps a time fraction in `[0, 1]` to a progress fraction in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// One viewport transition, sampled on every UI tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    from: Viewport,
    to: Viewport,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl ZoomAnimation {
    pub fn new(
        from: Viewport,
        to: Viewport,
        started: Instant,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            easing,
        }
    }

    /// Continues from wherever `current` is at `now` towards `to`.
    ///
    /// Used when a zoom request interrupts a running animation, so the view
    /// does not jump back to the old animation's starting point.
    pub fn retarget(
        current: Option<&ZoomAnimation>,
        resting: Viewport,
        to: Viewport,
        now: Instant,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        let from = match current {
            Some(running) => running.sample(now).0,
            None => resting,
        };
        Self::new(from, to, now, duration, easing)
    }

    pub fn target(&self) -> Viewport {
        self.to
    }

    /// Interpolated viewport at `now` and whether the animation has finished.
    /// The final sample is exactly the target.
    pub fn sample(&self, now: Instant) -> (Viewport, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from.lerp(&self.to, self.easing.apply(t)), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Mode;

    fn target() -> Viewport {
        Viewport {
            zoom: 5.0,
            translate_x: -1000.0,
            translate_y: 0.0,
            mode: Mode::Icicle,
        }
    }

    #[test]
    fn easings_are_pinned_at_both_ends() {
        for e in [Easing::Linear, Easing::SineInOut, Easing::CubicOut] {
            assert!(e.apply(0.0).abs() < 1e-12);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-12);
        }
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn finishes_exactly_on_target() {
        let start = Instant::now();
        let anim = ZoomAnimation::new(
            Viewport::identity(Mode::Icicle),
            target(),
            start,
            DEFAULT_ZOOM_DURATION,
            Easing::SineInOut,
        );

        let (mid, done) = anim.sample(start + Duration::from_millis(200));
        assert!(!done);
        assert!(mid.zoom > 1.0 && mid.zoom < 5.0);

        let (end, done) = anim.sample(start + Duration::from_millis(400));
        assert!(done);
        assert_eq!(end, target());
    }

    #[test]
    fn retarget_starts_from_the_interpolated_state() {
        let start = Instant::now();
        let first = ZoomAnimation::new(
            Viewport::identity(Mode::Icicle),
            target(),
            start,
            DEFAULT_ZOOM_DURATION,
            Easing::Linear,
        );
        let now = start + Duration::from_millis(100);
        let back = Viewport::identity(Mode::Icicle);
        let second = ZoomAnimation::retarget(
            Some(&first),
            target(),
            back,
            now,
            DEFAULT_ZOOM_DURATION,
            Easing::Linear,
        );

        let (v, _) = second.sample(now);
        assert!((v.zoom - 2.0).abs() < 1e-9);
        assert_eq!(second.target(), back);
    }
}
