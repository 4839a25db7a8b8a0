use crate::frame::FrameBox;
use crate::tree::FrameNode;

/// Flattens a tree into pre-order [`FrameBox`]es spanning `[x_start, x_end]`,
/// giving each child `weight_of(child) / total_weight_of(node)` of its parent.
pub fn flatten<N, C, W, T>(
    root: &N,
    children_of: C,
    weight_of: W,
    total_weight_of: T,
    x_start: f64,
    x_end: f64,
    depth: usize,
) -> Vec<FrameBox<N>>
where
    N: Clone,
    C: for<'a> Fn(&'a N) -> &'a [N],
    W: Fn(&N) -> f64,
    T: Fn(&N) -> f64,
{
    let mut out = Vec::new();
    let mut stack: Vec<(&N, f64, f64, usize)> = vec![(root, x_start, x_end.max(x_start), depth)];
    let mut placed: Vec<(&N, f64, f64)> = Vec::new();

    while let Some((node, start, end, depth)) = stack.pop() {
        out.push(FrameBox::new(node.clone(), start, end, depth));

        let children = children_of(node);
        if children.is_empty() {
            continue;
        }
        let total = total_weight_of(node);
        if !(total.is_finite() && total > 0.0) {
            continue;
        }

        let parent_width = end - start;
        let mut cursor = start;
        placed.clear();
        for child in children {
            let share = sanitize(weight_of(child)) / total;
            let child_end = (cursor + share * parent_width).min(end);
            placed.push((child, cursor, child_end));
            cursor = child_end;
        }
        for &(child, child_start, child_end) in placed.iter().rev() {
            stack.push((child, child_start, child_end, depth + 1));
        }
    }

    out
}

/// Flattens a [`FrameNode`] tree over `[0, 1]`, sizing frames by cumulative weight.
pub fn flatten_tree<N>(root: &N) -> Vec<FrameBox<N>>
where
    N: FrameNode + Clone,
{
    flatten_by(root, N::cumulative_weight)
}

pub fn flatten_by<N, W>(root: &N, weight_of: W) -> Vec<FrameBox<N>>
where
    N: FrameNode + Clone,
    W: Fn(&N) -> f64,
{
    flatten(
        root,
        N::children,
        &weight_of,
        |n: &N| sibling_weight_sum(n.children(), &weight_of),
        0.0,
        1.0,
        0,
    )
}

pub fn sibling_weight_sum<N, W>(children: &[N], weight_of: W) -> f64
where
    W: Fn(&N) -> f64,
{
    children.iter().map(|c| sanitize(weight_of(c))).sum()
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Inclusive `[min, max]` with `min < max`; `None` for empty or collapsed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRange {
    min: f64,
    max: f64,
}

impl WeightRange {
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min < max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        Self::new(min, max)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn normalize(&self, v: f64) -> f64 {
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}
