//! Profiles the viewer can display: a call tree of [`StackFrame`]s read from
//! collapsed stack text, and the flamegraph model built from it.

mod folded;
mod style;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use flamelens_core::{flatten_by, FrameBox, FrameModel, FrameNode};
use serde::{Deserialize, Serialize};

pub use folded::parse_folded;
pub use style::{render_config, short_name, simple_name, ColorBy};

/// Which recorded quantity sizes the frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    #[default]
    Samples,
    Bytes,
}

impl WeightKind {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        match input {
            "samples" => Ok(Self::Samples),
            "bytes" => Ok(Self::Bytes),
            _ => anyhow::bail!("invalid weight: {input} (expected samples|bytes)"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Samples => "samples",
            Self::Bytes => "bytes",
        }
    }

    pub fn total(self, frame: &StackFrame) -> f64 {
        match self {
            Self::Samples => frame.samples() as f64,
            Self::Bytes => frame.bytes() as f64,
        }
    }

    pub fn self_weight(self, frame: &StackFrame) -> f64 {
        match self {
            Self::Samples => frame.self_samples() as f64,
            Self::Bytes => frame.self_bytes() as f64,
        }
    }
}

#[derive(Debug)]
pub struct FrameData {
    pub(crate) name: String,
    pub(crate) samples: u64,
    pub(crate) bytes: u64,
    pub(crate) self_samples: u64,
    pub(crate) self_bytes: u64,
    pub(crate) path_hash: u64,
    pub(crate) root: bool,
    pub(crate) children: Vec<StackFrame>,
}

impl Drop for FrameData {
    fn drop(&mut self) {
        // unlink uniquely owned descendants so dropping a deep tree stays flat
        let mut pending = std::mem::take(&mut self.children);
        while let Some(frame) = pending.pop() {
            if let Ok(mut data) = Arc::try_unwrap(frame.0) {
                pending.append(&mut data.children);
            }
        }
    }
}

/// Shared handle to one node of the call tree.
#[derive(Clone)]
pub struct StackFrame(pub(crate) Arc<FrameData>);

impl StackFrame {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn samples(&self) -> u64 {
        self.0.samples
    }

    pub fn bytes(&self) -> u64 {
        self.0.bytes
    }

    pub fn self_samples(&self) -> u64 {
        self.0.self_samples
    }

    pub fn self_bytes(&self) -> u64 {
        self.0.self_bytes
    }

    /// Hash of the names from the root down to this frame. Stable across reloads.
    pub fn path_hash(&self) -> u64 {
        self.0.path_hash
    }
}

impl fmt::Debug for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackFrame")
            .field("name", &self.0.name)
            .field("samples", &self.0.samples)
            .field("bytes", &self.0.bytes)
            .field("children", &self.0.children.len())
            .finish()
    }
}

impl FrameNode for StackFrame {
    fn children(&self) -> &[Self] {
        &self.0.children
    }

    fn weight(&self) -> f64 {
        self.0.self_samples as f64
    }

    fn cumulative_weight(&self) -> f64 {
        self.0.samples as f64
    }

    fn is_root(&self) -> bool {
        self.0.root
    }
}

/// A parsed profile plus what the parser had to drop.
#[derive(Debug, Clone)]
pub struct Profile {
    pub title: String,
    pub root: StackFrame,
    pub stacks: usize,
    pub skipped: usize,
}

impl Profile {
    pub fn description(&self) -> String {
        format!(
            "{} stacks, {} samples, {} bytes ({} lines skipped)",
            self.stacks,
            self.root.samples(),
            self.root.bytes(),
            self.skipped
        )
    }
}

pub fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let profile = parse_folded(&title, &text)
        .with_context(|| format!("failed to parse profile {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        stacks = profile.stacks,
        skipped = profile.skipped,
        "profile parsed"
    );
    Ok(profile)
}

/// Lays the profile out with `weight` driving the widths.
///
/// Frames of two models are the same frame when they sit at the same depth
/// under the same chain of names, so zoom survives a reload or a weight switch.
pub fn build_model(profile: &Profile, weight: WeightKind) -> FrameModel<StackFrame> {
    let frames = flatten_by(&profile.root, |n: &StackFrame| weight.total(n));
    FrameModel::with_equality(
        profile.title.clone(),
        profile.description(),
        frames,
        Arc::new(|a: &FrameBox<StackFrame>, b: &FrameBox<StackFrame>| {
            a.depth == b.depth && a.node.path_hash() == b.node.path_hash()
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelens_core::FrameId;

    const STACKS: &str = "\
main;parse;read 30 300
main;parse 10 100
main;render;paint 60 6000
";

    fn profile(text: &str) -> Profile {
        parse_folded("test", text).expect("profile parsed")
    }

    #[test]
    fn weight_kind_parses_cli_values() {
        let bytes = WeightKind::parse("bytes").expect("bytes");
        assert_eq!(bytes, WeightKind::Bytes);
        assert!(WeightKind::parse("cycles").is_err());
    }

    #[test]
    fn model_is_sized_by_the_selected_weight() {
        let p = profile(STACKS);
        let by_samples = build_model(&p, WeightKind::Samples);
        let by_bytes = build_model(&p, WeightKind::Bytes);

        let width_of = |m: &FrameModel<StackFrame>, name: &str| {
            m.frames()
                .iter()
                .find(|f| f.node.name() == name)
                .map(|f| f.width())
                .expect("frame present")
        };
        assert!((width_of(&by_samples, "render") - 0.6).abs() < 1e-9);
        let render_bytes = width_of(&by_bytes, "render");
        assert!((render_bytes - 6000.0 / 6400.0).abs() < 1e-9);
        assert_eq!(by_samples.frames()[0].node.name(), "root");
        assert_eq!(by_samples.title(), "test");
    }

    #[test]
    fn frames_are_matched_across_reloads_by_path() {
        let before = build_model(&profile(STACKS), WeightKind::Samples);
        let after = build_model(
            &profile("main;render;paint 5\nmain;gc 5\nmain;parse;read 1\n"),
            WeightKind::Samples,
        );

        let paint = before
            .ids()
            .find(|id| before.frames()[id.index()].node.name() == "paint")
            .expect("paint in old model");
        let found = after.find_equivalent(&before, paint).expect("paint in new model");
        assert_eq!(after.frames()[found.index()].node.name(), "paint");

        let gc_parent = after
            .ids()
            .find(|id| after.frames()[id.index()].node.name() == "gc")
            .expect("gc");
        assert_eq!(before.find_equivalent(&after, gc_parent), None);
        let root = after.find_equivalent(&before, FrameId::ROOT);
        assert_eq!(root, Some(FrameId::ROOT));
    }

    #[test]
    fn description_mentions_skipped_lines() {
        let p = profile("a;b 1\nnot a stack\n");
        assert_eq!(p.skipped, 1);
        assert!(p.description().contains("1 lines skipped"));
    }

    #[test]
    fn load_profile_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.folded");
        let err = load_profile(&missing).expect_err("missing file");
        assert!(format!("{err:#}").contains("missing.folded"));

        let path = dir.path().join("app.folded");
        std::fs::write(&path, STACKS).expect("write profile");
        let p = load_profile(&path).expect("profile loaded");
        assert_eq!(p.title, "app.folded");
        assert_eq!(p.root.samples(), 100);
    }
}
