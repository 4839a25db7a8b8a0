use bitflags::bitflags;

bitflags! {
    /// Per-frame state handed to color and font providers.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        /// Painting the overview; no text, no dimming.
        const MINIMAP     = 0b0000_0001;
        /// A non-empty highlight set is active.
        const HIGHLIGHTING = 0b0000_0010;
        const HIGHLIGHTED = 0b0000_0100;
        const HOVERED     = 0b0000_1000;
        /// The view is zoomed to some frame.
        const FOCUSING    = 0b0001_0000;
        /// Inside the zoomed frame's subtree or on its path to the root.
        const FOCUSED     = 0b0010_0000;
        /// Left edge cut off by the visible area.
        const PARTIAL     = 0b0100_0000;
    }
}

impl RenderFlags {
    /// Whether a non-root frame should be drawn washed out.
    ///
    /// Being highlighted or focused rescues a frame when both modes are
    /// active at once.
    pub fn should_dim(self) -> bool {
        let highlighting = self.contains(Self::HIGHLIGHTING);
        let highlighted = self.contains(Self::HIGHLIGHTED);
        let focusing = self.contains(Self::FOCUSING);
        let focused = self.contains(Self::FOCUSED);

        let dimmed = (highlighting && !highlighted) || (focusing && !focused);
        dimmed && !(highlighting && focusing && (highlighted || focused))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_outside_search_results() {
        assert!(RenderFlags::HIGHLIGHTING.should_dim());
        let matched = RenderFlags::HIGHLIGHTING | RenderFlags::HIGHLIGHTED;
        assert!(!matched.should_dim());
        assert!(!RenderFlags::empty().should_dim());
    }

    #[test]
    fn focus_and_search_combine() {
        assert!(RenderFlags::FOCUSING.should_dim());
        let both = RenderFlags::HIGHLIGHTING | RenderFlags::FOCUSING;
        assert!(both.should_dim());
        assert!(!(both | RenderFlags::FOCUSED).should_dim());
        assert!(!(both | RenderFlags::HIGHLIGHTED).should_dim());
    }
}
