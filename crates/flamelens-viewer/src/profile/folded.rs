//! Collapsed ("folded") stack text: `frame;frame;frame <samples> [<bytes>]`.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{bail, Result};
use rustc_hash::{FxHashMap, FxHasher};

use super::{FrameData, Profile, StackFrame};

const ROOT_NAME: &str = "root";

#[derive(Default)]
struct Builder {
    name: String,
    samples: u64,
    bytes: u64,
    self_samples: u64,
    self_bytes: u64,
    children: Vec<Builder>,
    index: FxHashMap<String, usize>,
}

impl Builder {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn child(&mut self, name: &str) -> &mut Builder {
        let next = self.children.len();
        let i = *self.index.entry(name.to_string()).or_insert(next);
        if i == next {
            self.children.push(Builder::named(name));
        }
        &mut self.children[i]
    }

    fn add(&mut self, samples: u64, bytes: u64) {
        self.samples = self.samples.saturating_add(samples);
        self.bytes = self.bytes.saturating_add(bytes);
    }

    /// Turns the builder tree into shared frames, depth first without recursion.
    fn freeze(self) -> StackFrame {
        let mut current = Frozen::open(self, 0, true);
        let mut parents: Vec<Frozen> = Vec::new();
        loop {
            if let Some(child) = current.todo.next() {
                let hash = current.data.path_hash;
                parents.push(std::mem::replace(
                    &mut current,
                    Frozen::open(child, hash, false),
                ));
                continue;
            }
            let frame = current.close();
            match parents.pop() {
                Some(mut parent) => {
                    parent.data.children.push(frame);
                    current = parent;
                }
                None => return frame,
            }
        }
    }
}

/// A frame whose children are still being frozen.
struct Frozen {
    data: FrameData,
    todo: std::vec::IntoIter<Builder>,
}

impl Frozen {
    fn open(mut b: Builder, parent_hash: u64, root: bool) -> Self {
        let mut h = FxHasher::default();
        parent_hash.hash(&mut h);
        b.name.hash(&mut h);

        b.children.sort_by(|x, y| x.name.cmp(&y.name));
        let todo = std::mem::take(&mut b.children);
        Self {
            data: FrameData {
                name: b.name,
                samples: b.samples,
                bytes: b.bytes,
                self_samples: b.self_samples,
                self_bytes: b.self_bytes,
                path_hash: h.finish(),
                root,
                children: Vec::with_capacity(todo.len()),
            },
            todo: todo.into_iter(),
        }
    }

    fn close(self) -> StackFrame {
        StackFrame(Arc::new(self.data))
    }
}

struct Line<'a> {
    frames: Vec<&'a str>,
    samples: u64,
    bytes: u64,
}

fn parse_line(line: &str) -> Option<Line<'_>> {
    let (rest, last) = line.rsplit_once(char::is_whitespace)?;
    let last: u64 = last.parse().ok()?;
    let rest = rest.trim_end();

    let (stack, samples, bytes) = match rest.rsplit_once(char::is_whitespace) {
        Some((stack, n)) if n.parse::<u64>().is_ok() => (stack, n.parse().ok()?, last),
        _ => (rest, last, 0),
    };

    let frames: Vec<&str> = stack.trim().split(';').map(str::trim).collect();
    if frames.iter().any(|f| f.is_empty()) {
        return None;
    }
    Some(Line {
        frames,
        samples,
        bytes,
    })
}

/// Builds the call tree for `text`. Children are ordered by name.
///
/// Blank lines and `#` comments are ignored; other lines that are not a stack
/// followed by one or two counts are skipped and counted.
pub fn parse_folded(title: &str, text: &str) -> Result<Profile> {
    let mut root = Builder::named(ROOT_NAME);
    let mut stacks = 0;
    let mut skipped = 0;
    let mut first_bad = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(parsed) = parse_line(line) else {
            skipped += 1;
            first_bad.get_or_insert(lineno + 1);
            tracing::trace!(
                line = lineno + 1,
                text = raw,
                "skipping malformed stack line"
            );
            continue;
        };

        stacks += 1;
        root.add(parsed.samples, parsed.bytes);
        let mut node = &mut root;
        for name in parsed.frames {
            node = node.child(name);
            node.add(parsed.samples, parsed.bytes);
        }
        node.self_samples = node.self_samples.saturating_add(parsed.samples);
        node.self_bytes = node.self_bytes.saturating_add(parsed.bytes);
    }

    if let (0, Some(line)) = (stacks, first_bad) {
        bail!(
            "no stack lines found ({skipped} malformed, first at line {line})"
        );
    }

    Ok(Profile {
        title: title.to_string(),
        root: root.freeze(),
        stacks,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelens_core::FrameNode;

    fn names(frame: &StackFrame) -> Vec<&str> {
        frame.children().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn merges_common_prefixes() {
        let p = parse_folded("t", "a;b;c 3\na;b 2\na;d 5\n").expect("parsed");
        assert_eq!(p.stacks, 3);
        assert_eq!(p.root.samples(), 10);
        assert!(p.root.is_root());

        let a = &p.root.children()[0];
        assert_eq!(a.name(), "a");
        assert_eq!(a.samples(), 10);
        assert_eq!(a.self_samples(), 0);
        assert_eq!(names(a), vec!["b", "d"]);

        let b = &a.children()[0];
        assert_eq!(b.samples(), 5);
        assert_eq!(b.self_samples(), 2);
        assert!(!b.is_root());
    }

    #[test]
    fn reads_optional_byte_counts() {
        let p = parse_folded("t", "x;y 2 4096\nx 1\n").expect("parsed");
        let x = &p.root.children()[0];
        assert_eq!(x.samples(), 3);
        assert_eq!(x.bytes(), 4096);
        assert_eq!(x.self_bytes(), 0);
        assert_eq!(x.children()[0].self_bytes(), 4096);
    }

    #[test]
    fn frame_names_may_contain_spaces() {
        let p = parse_folded("t", "java.lang.Thread.run (Thread.java);work 7\n")
            .expect("parsed");
        let top = &p.root.children()[0];
        assert_eq!(top.name(), "java.lang.Thread.run (Thread.java)");
        assert_eq!(top.children()[0].samples(), 7);
    }

    #[test]
    fn malformed_lines_are_skipped_and_counted() {
        let text = "# comment\n\na;b 1\nno count\na;;b 3\n;a 2\na;b -4\n";
        let p = parse_folded("t", text).expect("parsed");
        assert_eq!(p.stacks, 1);
        assert_eq!(p.skipped, 4);
        assert_eq!(p.root.samples(), 1);
    }

    #[test]
    fn only_garbage_is_an_error() {
        let err = parse_folded("t", "# header\nhello\nworld\n")
            .expect_err("no stacks");
        assert_eq!(
            err.to_string(),
            "no stack lines found (2 malformed, first at line 2)"
        );
    }

    #[test]
    fn empty_input_is_an_empty_profile() {
        let p = parse_folded("t", "").expect("parsed");
        assert_eq!(p.stacks, 0);
        assert!(p.root.children().is_empty());
        assert_eq!(p.root.samples(), 0);
    }

    #[test]
    fn very_deep_stacks_do_not_exhaust_the_thread_stack() {
        const DEPTH: usize = 200_000;
        let line = format!("{} 1 8\n", vec!["f"; DEPTH].join(";"));
        let p = parse_folded("t", &line).expect("parsed");

        let mut depth = 0;
        let mut node = p.root.clone();
        while let Some(child) = node.children().first().cloned() {
            assert_eq!(child.samples(), 1);
            node = child;
            depth += 1;
        }
        assert_eq!(depth, DEPTH);
        assert_eq!(node.self_bytes(), 8);
    }

    #[test]
    fn path_hash_depends_on_ancestry() {
        let p = parse_folded("t", "a;x 1\nb;x 1\n").expect("parsed");
        let under_a = &p.root.children()[0].children()[0];
        let under_b = &p.root.children()[1].children()[0];
        assert_eq!(under_a.name(), under_b.name());
        assert_ne!(under_a.path_hash(), under_b.path_hash());

        let again = parse_folded("t", "b;x 9\na;x 4\n").expect("parsed");
        let again_x = &again.root.children()[0].children()[0];
        assert_eq!(again_x.path_hash(), under_a.path_hash());
    }
}
