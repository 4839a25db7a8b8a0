/// A node of a caller-owned call tree.
///
/// The layout never builds trees itself; it only walks one through these
/// accessors. Implementors are usually cheap handles (an `Arc` around the
/// real node) since every emitted [`crate::FrameBox`] keeps a clone.
pub trait FrameNode: Sized {
    /// Children in display order (left to right).
    fn children(&self) -> &[Self];

    /// This node's own contribution (self time, self allocations, ...).
    fn weight(&self) -> f64;

    /// Weight of the whole subtree rooted here.
    fn cumulative_weight(&self) -> f64;

    fn is_root(&self) -> bool;
}
