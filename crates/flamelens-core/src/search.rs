//! Text search over frames.
//!
//! Matching is case-insensitive and looks at every text candidate, not only
//! the one that happens to be drawn. Results are frame ids, so two frames with
//! identical labels are tracked separately.

use std::collections::HashSet;
use std::sync::Arc;

use crate::frame::{FrameId, FrameModel};
use crate::render::provider::{TextCandidates, TextFn};
use crate::task::Ticket;

/// Ids of the non-root frames whose labels contain `query`. Blank queries match nothing.
pub fn search_frames<N>(
    model: &FrameModel<N>,
    texts: &[TextFn<N>],
    query: &str,
) -> HashSet<FrameId> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return HashSet::new();
    }
    model
        .ids()
        .filter(|id| {
            let frame = &model.frames()[id.index()];
            !frame.is_root()
                && texts
                    .iter()
                    .any(|text| text(frame).to_lowercase().contains(&needle))
        })
        .collect()
}

/// A search ready to be run on another thread.
pub struct SearchRequest<N> {
    pub ticket: Ticket,
    /// Model generation the search was issued against.
    pub generation: u64,
    pub model: Arc<FrameModel<N>>,
    pub texts: TextCandidates<N>,
    pub query: String,
}

impl<N> SearchRequest<N> {
    pub fn run(&self) -> SearchOutcome {
        SearchOutcome {
            ticket: self.ticket,
            generation: self.generation,
            query: self.query.clone(),
            matches: search_frames(&self.model, &self.texts, &self.query),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub ticket: Ticket,
    pub generation: u64,
    pub query: String,
    pub matches: HashSet<FrameId>,
}
