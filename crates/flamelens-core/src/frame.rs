use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Identity of a frame inside one [`FrameModel`]: its position in the flat list.
///
/// Two textually identical frames always have distinct ids. Ids are only
/// meaningful for the model that produced them; use
/// [`FrameModel::find_equivalent`] to carry one across a model swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl FrameId {
    pub const ROOT: FrameId = FrameId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The positional part of a frame, without its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRect {
    pub start_x: f64,
    pub end_x: f64,
    pub depth: usize,
}

impl ModelRect {
    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }
}

/// One call-tree node positioned in normalized space.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBox<N> {
    pub node: N,
    /// Left edge in `[0, 1]`.
    pub start_x: f64,
    /// Right edge in `[0, 1]`, never less than `start_x`.
    pub end_x: f64,
    pub depth: usize,
}

impl<N> FrameBox<N> {
    pub fn new(node: N, start_x: f64, end_x: f64, depth: usize) -> Self {
        Self {
            node,
            start_x,
            end_x,
            depth,
        }
    }

    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn contains_x(&self, x: f64) -> bool {
        self.start_x <= x && x < self.end_x
    }

    pub fn rect(&self) -> ModelRect {
        ModelRect {
            start_x: self.start_x,
            end_x: self.end_x,
            depth: self.depth,
        }
    }
}

/// Decides whether two frames (possibly from different models) are the same logical frame.
pub type FrameEquality<N> = Arc<dyn Fn(&FrameBox<N>, &FrameBox<N>) -> bool + Send + Sync>;

/// Immutable result of one layout pass.
///
/// Frames must be in pre-order: a parent precedes all of its descendants and
/// a subtree is contiguous. [`crate::flatten`] always produces that order.
pub struct FrameModel<N> {
    title: String,
    description: String,
    frames: Vec<FrameBox<N>>,
    equality: FrameEquality<N>,
    parents: Vec<Option<usize>>,
    subtree_end: Vec<usize>,
    rows: Vec<Vec<usize>>,
    max_depth: usize,
}

impl<N: PartialEq + 'static> FrameModel<N> {
    /// Builds a model whose equality compares the payloads.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        frames: Vec<FrameBox<N>>,
    ) -> Self {
        Self::with_equality(
            title,
            description,
            frames,
            Arc::new(|a: &FrameBox<N>, b: &FrameBox<N>| a.node == b.node),
        )
    }
}

impl<N: 'static> FrameModel<N> {
    pub fn empty() -> Self {
        Self::with_equality(
            "",
            "",
            Vec::new(),
            Arc::new(|_: &FrameBox<N>, _: &FrameBox<N>| false),
        )
    }
}

impl<N> FrameModel<N> {
    pub fn with_equality(
        title: impl Into<String>,
        description: impl Into<String>,
        frames: Vec<FrameBox<N>>,
        equality: FrameEquality<N>,
    ) -> Self {
        let n = frames.len();
        let mut parents = vec![None; n];
        let mut subtree_end = vec![n; n];
        let mut max_depth = 0;
        let mut stack: Vec<usize> = Vec::new();

        for (i, frame) in frames.iter().enumerate() {
            while let Some(&top) = stack.last() {
                if frames[top].depth >= frame.depth {
                    subtree_end[top] = i;
                    stack.pop();
                } else {
                    break;
                }
            }
            parents[i] = stack.last().copied();
            stack.push(i);
            max_depth = max_depth.max(frame.depth);
        }

        let mut rows: Vec<Vec<usize>> = if n == 0 {
            Vec::new()
        } else {
            vec![Vec::new(); max_depth + 1]
        };
        for (i, frame) in frames.iter().enumerate() {
            rows[frame.depth].push(i);
        }
        for row in rows.iter_mut() {
            row.sort_by(|a, b| frames[*a].start_x.total_cmp(&frames[*b].start_x));
        }

        Self {
            title: title.into(),
            description: description.into(),
            frames,
            equality,
            parents,
            subtree_end,
            rows,
            max_depth,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frames(&self) -> &[FrameBox<N>] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&FrameBox<N>> {
        self.frames.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        (0..self.frames.len()).map(FrameId)
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.parents.get(id.0).copied().flatten().map(FrameId)
    }

    /// Index range of `id` and all of its descendants.
    pub fn subtree(&self, id: FrameId) -> Range<usize> {
        match self.subtree_end.get(id.0) {
            Some(&end) => id.0..end,
            None => 0..0,
        }
    }

    pub fn is_ancestor_or_self(&self, ancestor: FrameId, id: FrameId) -> bool {
        self.subtree(ancestor).contains(&id.0)
    }

    pub fn ancestors(&self, id: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    /// Frame of `depth` whose `[start_x, end_x)` contains `x`. Zero-width frames are never hit.
    pub fn frame_at(&self, x: f64, depth: usize) -> Option<FrameId> {
        let row = self.rows.get(depth)?;
        let upper = row.partition_point(|&i| self.frames[i].start_x <= x);
        for &i in row[..upper].iter().rev() {
            let frame = &self.frames[i];
            if frame.contains_x(x) {
                return Some(FrameId(i));
            }
            if frame.width() > 0.0 {
                break;
            }
        }
        None
    }

    pub fn equivalent(&self, a: &FrameBox<N>, b: &FrameBox<N>) -> bool {
        (self.equality)(a, b)
    }

    /// Locates in `self` the frame that `self`'s equality deems the same as `id` of `other`.
    pub fn find_equivalent(&self, other: &FrameModel<N>, id: FrameId) -> Option<FrameId> {
        let wanted = other.frame(id)?;
        if let Some(same_slot) = self.frame(id) {
            if self.equivalent(wanted, same_slot) {
                return Some(id);
            }
        }
        self.frames
            .iter()
            .position(|candidate| self.equivalent(wanted, candidate))
            .map(FrameId)
    }
}

impl<N> fmt::Debug for FrameModel<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameModel")
            .field("title", &self.title)
            .field("frames", &self.frames.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
