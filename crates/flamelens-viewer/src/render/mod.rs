pub mod canvas;
pub mod flamegraph;

pub use flamegraph::draw_flamegraph;
