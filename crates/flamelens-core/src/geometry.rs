use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in device pixels. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DeviceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Half-open containment: the right and bottom edges belong to the next cell.
    pub fn contains(&self, p: DevicePoint) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn intersects(&self, other: &DeviceRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &DeviceRect) -> Option<DeviceRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        let out = DeviceRect::new(x, y, r - x, b - y);
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// Shrinks width and height by `amount`, keeping the top-left corner.
    pub fn shrink_trailing(&self, amount: f64) -> DeviceRect {
        DeviceRect::new(
            self.x,
            self.y,
            (self.width - amount).max(0.0),
            (self.height - amount).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> DeviceRect {
        DeviceRect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = DeviceRect::new(0.0, 0.0, 10.0, 10.0);
        let b = DeviceRect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(
            a.intersection(&b),
            Some(DeviceRect::new(5.0, 5.0, 5.0, 5.0))
        );
        assert!(a.intersects(&b));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = DeviceRect::new(0.0, 0.0, 10.0, 10.0);
        let b = DeviceRect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn contains_is_half_open() {
        let r = DeviceRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(DevicePoint::new(0.0, 0.0)));
        assert!(!r.contains(DevicePoint::new(10.0, 5.0)));
    }
}
