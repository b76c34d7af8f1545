//! L3: arena-based suffix tree — naive, McCreight, and from-(SA,LCP)
//! constructions, exact descent search, a leaf iterator, and an
//! approximate (edit-distance-bounded) matcher.
//!
//! `text` passed to every constructor here must already carry a real
//! sentinel byte (`0`) as its last element, strictly smaller than every
//! other byte in `text` — unlike `sa`/`lcp`, which treat the sentinel as
//! conceptual, the tree borrows `text` for its edge labels and needs an
//! actual smallest byte to give the sentinel-only suffix a real,
//! uniquely-ordered edge.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::cigar::{CigarBuffer, Op};
use crate::error::{IndexError, Result};

pub type NodeId = u32;

/// The tree root. Its own edge is empty (`depth == 0`) and its suffix
/// link points to itself (§3: "the root's suffix link is itself").
pub const ROOT: NodeId = 0;

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    edge_from: u32,
    edge_to: u32,
    /// String depth: length of this node's path label from the root.
    depth: u32,
    suffix_link: Option<NodeId>,
    leaf_label: Option<u32>,
}

/// Arena-based suffix tree over `text`. Relations between nodes (parent,
/// child, sibling, suffix link) are node ids into `nodes`, never
/// references — the arena is dropped in one shot, and the suffix-link
/// back-edge (which would otherwise be a cycle at the root) is just an
/// id like any other.
#[derive(Clone, Debug)]
pub struct SuffixTree<'t> {
    text: &'t [u8],
    nodes: Vec<Node>,
}

/// A single approximate-match hit: the subtree reached, its alignment,
/// and the accounting needed to enumerate concrete positions from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApproxMatch {
    pub node: NodeId,
    pub cigar: String,
    pub edits: usize,
    pub match_length: usize,
}

fn validate_sentinel(text: &[u8]) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    for (i, &b) in text[..text.len() - 1].iter().enumerate() {
        if b == 0 {
            return Err(IndexError::InvalidSentinel { at: i });
        }
    }
    Ok(())
}

impl<'t> SuffixTree<'t> {
    fn empty(text: &'t [u8]) -> Self {
        let root = Node {
            parent: None,
            first_child: None,
            next_sibling: None,
            edge_from: 0,
            edge_to: 0,
            depth: 0,
            suffix_link: Some(ROOT),
            leaf_label: None,
        };
        SuffixTree {
            text,
            nodes: vec![root],
        }
    }

    fn new_node(&mut self, parent: Option<NodeId>, from: u32, to: u32, leaf_label: Option<u32>) -> NodeId {
        let depth = match parent {
            Some(p) => self.nodes[p as usize].depth + (to - from),
            None => to - from,
        };
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            parent,
            first_child: None,
            next_sibling: None,
            edge_from: from,
            edge_to: to,
            depth,
            suffix_link: None,
            leaf_label,
        });
        id
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> (usize, usize) {
        let n = &self.nodes[node as usize];
        (n.edge_from as usize, n.edge_to as usize)
    }

    #[inline]
    fn edge_len(&self, node: NodeId) -> u32 {
        let n = &self.nodes[node as usize];
        n.edge_to - n.edge_from
    }

    #[inline]
    fn edge_first_char(&self, node: NodeId) -> u8 {
        self.text[self.nodes[node as usize].edge_from as usize]
    }

    fn find_child(&self, node: NodeId, c: u8) -> Option<NodeId> {
        let mut cur = self.nodes[node as usize].first_child;
        while let Some(id) = cur {
            let fc = self.edge_first_char(id);
            if fc == c {
                return Some(id);
            }
            if fc > c {
                return None;
            }
            cur = self.nodes[id as usize].next_sibling;
        }
        None
    }

    /// Insert `child` into `parent`'s sibling list, keeping children
    /// ordered ascending by first edge character (§3 structural
    /// invariant).
    fn attach_child_sorted(&mut self, parent: NodeId, child: NodeId) {
        let c = self.edge_first_char(child);
        let mut prev: Option<NodeId> = None;
        let mut cur = self.nodes[parent as usize].first_child;
        while let Some(id) = cur {
            if self.edge_first_char(id) > c {
                break;
            }
            prev = Some(id);
            cur = self.nodes[id as usize].next_sibling;
        }
        self.nodes[child as usize].next_sibling = cur;
        self.nodes[child as usize].parent = Some(parent);
        match prev {
            Some(p) => self.nodes[p as usize].next_sibling = Some(child),
            None => self.nodes[parent as usize].first_child = Some(child),
        }
    }

    /// Split `child`'s edge `k` characters in, inserting a fresh internal
    /// node between `child` and its current parent. Returns the new
    /// node's id.
    fn split_edge(&mut self, child: NodeId, k: u32) -> NodeId {
        let parent = self.nodes[child as usize].parent.expect("split target has a parent");
        let old_from = self.nodes[child as usize].edge_from;
        let split_at = old_from + k;

        let mid = self.new_node(Some(parent), old_from, split_at, None);

        let mut prev: Option<NodeId> = None;
        let mut cur = self.nodes[parent as usize].first_child;
        while let Some(id) = cur {
            if id == child {
                break;
            }
            prev = Some(id);
            cur = self.nodes[id as usize].next_sibling;
        }
        let old_next = self.nodes[child as usize].next_sibling;
        self.nodes[mid as usize].next_sibling = old_next;
        match prev {
            Some(p) => self.nodes[p as usize].next_sibling = Some(mid),
            None => self.nodes[parent as usize].first_child = Some(mid),
        }

        self.nodes[child as usize].parent = Some(mid);
        self.nodes[child as usize].edge_from = split_at;
        self.nodes[child as usize].next_sibling = None;
        self.nodes[mid as usize].first_child = Some(child);

        mid
    }

    /// Descend inserting the suffix starting at `leaf_start`, comparing
    /// characters one at a time from `from` (an existing node) at text
    /// offset `start`. Splits an edge if needed, creates the new leaf,
    /// and returns the node the leaf was attached to (its new "head").
    fn slow_scan_and_insert(&mut self, from: NodeId, mut start: usize, leaf_start: usize) -> NodeId {
        let mut cur = from;
        loop {
            if start == self.text.len() {
                return cur;
            }
            let c = self.text[start];
            match self.find_child(cur, c) {
                None => {
                    let leaf = self.new_node(Some(cur), start as u32, self.text.len() as u32, Some(leaf_start as u32));
                    self.attach_child_sorted(cur, leaf);
                    return cur;
                }
                Some(child) => {
                    let (efrom, eto) = self.edge_range(child);
                    let elen = eto - efrom;
                    let mut j = 0usize;
                    while j < elen && start + j < self.text.len() && self.text[efrom + j] == self.text[start + j] {
                        j += 1;
                    }
                    if j == elen {
                        cur = child;
                        start += elen;
                        continue;
                    }
                    let mid = self.split_edge(child, j as u32);
                    let leaf = self.new_node(Some(mid), (start + j) as u32, self.text.len() as u32, Some(leaf_start as u32));
                    self.attach_child_sorted(mid, leaf);
                    return mid;
                }
            }
        }
    }

    /// Fast-scan: descend `len` characters from `from`, trusting (not
    /// comparing) that the path exists — used after a suffix-link jump,
    /// where the destination is already known to match. Splits an edge
    /// if `len` chars land mid-edge.
    fn skip_count(&mut self, from: NodeId, mut start: usize, mut len: u32) -> NodeId {
        let mut node = from;
        while len > 0 {
            let c = self.text[start];
            let child = self
                .find_child(node, c)
                .expect("fast-scan path must already exist in the tree");
            let elen = self.edge_len(child);
            if elen <= len {
                node = child;
                start += elen as usize;
                len -= elen;
            } else {
                return self.split_edge(child, len);
            }
        }
        node
    }

    /// Naive O(n^2) construction: descend character-by-character for
    /// every suffix, splitting edges on mismatch.
    pub fn build_naive(text: &'t [u8]) -> Result<Self> {
        validate_sentinel(text)?;
        let mut tree = SuffixTree::empty(text);
        for i in 0..text.len() {
            tree.slow_scan_and_insert(ROOT, i, i);
        }
        Ok(tree)
    }

    /// McCreight's linear-time construction with suffix-link-guided
    /// fast-scan. Falls back to a root rescan whenever the relevant
    /// suffix link isn't known yet, which keeps the implementation
    /// simple while staying correct (see DESIGN.md).
    pub fn build_mccreight(text: &'t [u8]) -> Result<Self> {
        validate_sentinel(text)?;
        let mut tree = SuffixTree::empty(text);
        let n = text.len();
        if n == 0 {
            return Ok(tree);
        }

        let leaf0 = tree.new_node(Some(ROOT), 0, n as u32, Some(0));
        tree.attach_child_sorted(ROOT, leaf0);
        let mut head = ROOT;

        for i in 1..n {
            let head_depth = tree.nodes[head as usize].depth;
            // `ROOT` is a valid scan origin whenever `u`'s suffix link isn't
            // known yet, but it's only a valid *suffix link* for `head` when
            // `head_depth == 1` (root's children have depth 1; deeper heads
            // need the real fast-scan landing point from the `Some(v)` arm).
            let (start_node, scan_from, link_target) = if head == ROOT {
                (ROOT, i, None)
            } else {
                let u = tree.nodes[head as usize].parent.expect("non-root node has a parent");
                match tree.nodes[u as usize].suffix_link {
                    Some(v) => {
                        let u_depth = tree.nodes[u as usize].depth;
                        // `head != ROOT` so `gamma == edge_len(head) >= 1`: a
                        // suffix-link jump always has at least one character
                        // to fast-scan past `v`.
                        let gamma = head_depth - u_depth;
                        let gamma_start = (i - 1) + u_depth as usize;
                        let landed = tree.skip_count(v, gamma_start, gamma);
                        let landed_depth = tree.nodes[landed as usize].depth as usize;
                        (landed, i + landed_depth, Some(landed))
                    }
                    None if head_depth == 1 => (ROOT, i, Some(ROOT)),
                    None => (ROOT, i, None),
                }
            };

            if let Some(link) = link_target {
                if tree.nodes[head as usize].suffix_link.is_none() {
                    tree.nodes[head as usize].suffix_link = Some(link);
                }
            }

            head = tree.slow_scan_and_insert(start_node, scan_from, i);
        }

        Ok(tree)
    }

    /// Build directly from a suffix array and LCP array (same indexing
    /// space as `text`, i.e. `sa.len() == lcp.len() - 1 == text.len()`),
    /// by walking `sa` left to right and maintaining a stack of the
    /// rightmost root-to-leaf path. Produces the same tree shape as
    /// McCreight (suffix links are not populated).
    pub fn build_from_sa_lcp(text: &'t [u8], sa: &[u32], lcp: &[i64]) -> Result<Self> {
        validate_sentinel(text)?;
        let mut tree = SuffixTree::empty(text);
        let n = sa.len();
        if n == 0 {
            return Ok(tree);
        }

        let leaf0 = tree.new_node(Some(ROOT), sa[0], text.len() as u32, Some(sa[0]));
        tree.attach_child_sorted(ROOT, leaf0);
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0), (leaf0, tree.nodes[leaf0 as usize].depth as usize)];

        for i in 1..n {
            let h = lcp[i].max(0) as usize;
            let mut last_popped = None;
            while stack.last().expect("stack never empties").1 > h {
                last_popped = stack.pop();
            }
            let (top_node, top_depth) = *stack.last().expect("root stays");

            let parent_for_leaf = if top_depth == h {
                top_node
            } else {
                let prev = last_popped.expect("depth below h implies something was popped").0;
                let split_offset = h - top_depth;
                let mid = tree.split_edge(prev, split_offset as u32);
                stack.push((mid, h));
                mid
            };

            let leaf = tree.new_node(Some(parent_for_leaf), sa[i] + h as u32, text.len() as u32, Some(sa[i]));
            tree.attach_child_sorted(parent_for_leaf, leaf);
            let leaf_depth = tree.nodes[leaf as usize].depth as usize;
            stack.push((leaf, leaf_depth));
        }

        Ok(tree)
    }

    pub fn text(&self) -> &'t [u8] {
        self.text
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node as usize].parent
    }

    pub fn suffix_link(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node as usize].suffix_link
    }

    pub fn leaf_label(&self, node: NodeId) -> Option<u32> {
        self.nodes[node as usize].leaf_label
    }

    pub fn string_depth(&self, node: NodeId) -> usize {
        self.nodes[node as usize].depth as usize
    }

    pub fn edge(&self, node: NodeId) -> (usize, usize) {
        self.edge_range(node)
    }

    /// Exact descent search. Returns the subtree root reached by
    /// matching all of `pattern`; every leaf under it is an occurrence.
    pub fn search(&self, pattern: &[u8]) -> Option<NodeId> {
        if pattern.is_empty() {
            return Some(ROOT);
        }
        let mut cur = ROOT;
        let mut pos = 0usize;
        loop {
            let child = self.find_child(cur, pattern[pos])?;
            let (from, to) = self.edge_range(child);
            let elen = to - from;
            let mut j = 0usize;
            while j < elen && pos < pattern.len() && self.text[from + j] == pattern[pos] {
                j += 1;
                pos += 1;
            }
            if pos == pattern.len() {
                return Some(child);
            }
            if j < elen {
                return None;
            }
            cur = child;
        }
    }

    /// Depth-first, child-first/sibling-next leaf iterator: leaves come
    /// out left-to-right, i.e. in ascending lexicographic order of the
    /// suffixes they label.
    pub fn leaves(&self, node: NodeId) -> LeafIter<'_, 't> {
        LeafIter {
            tree: self,
            stack: vec![node],
        }
    }

    /// Recursive descent (as an explicit stack of frames, per the
    /// design notes) bounded by `k` edits. At each step three branches
    /// are explored: match/mismatch, deletion from the text, insertion
    /// into the text; a branch is pruned once its edit budget would go
    /// negative. On success (pattern exhausted, budget >= 0) every leaf
    /// under the reached node is a hit.
    pub fn approximate_search(&self, pattern: &[u8], k: usize) -> Vec<ApproxMatch> {
        struct Frame {
            node: NodeId,
            edge_pos: u32,
            pat_pos: usize,
            edits_left: i32,
            consumed: usize,
            parent_cursor: usize,
            op: Option<Op>,
        }

        let mut hits = Vec::new();
        let mut buf = CigarBuffer::with_capacity(pattern.len() + 4 * k + 1);
        let mut stack = vec![Frame {
            node: ROOT,
            edge_pos: 0,
            pat_pos: 0,
            edits_left: k as i32,
            consumed: 0,
            parent_cursor: 0,
            op: None,
        }];

        while let Some(frame) = stack.pop() {
            buf.truncate(frame.parent_cursor);
            if let Some(op) = frame.op {
                buf.push(op);
            }
            let cursor = buf.cursor();

            if frame.pat_pos == pattern.len() {
                hits.push(ApproxMatch {
                    node: frame.node,
                    cigar: buf.simplify(cursor),
                    edits: (k as i32 - frame.edits_left) as usize,
                    match_length: frame.consumed,
                });
                continue;
            }

            let elen = self.edge_len(frame.node);
            if frame.edge_pos < elen {
                let text_char = self.text[self.nodes[frame.node as usize].edge_from as usize + frame.edge_pos as usize];
                let pat_char = pattern[frame.pat_pos];

                let cost = if text_char == pat_char { 0 } else { 1 };
                if frame.edits_left - cost >= 0 {
                    stack.push(Frame {
                        node: frame.node,
                        edge_pos: frame.edge_pos + 1,
                        pat_pos: frame.pat_pos + 1,
                        edits_left: frame.edits_left - cost,
                        consumed: frame.consumed + 1,
                        parent_cursor: cursor,
                        op: Some(Op::Match),
                    });
                }
                if frame.edits_left - 1 >= 0 {
                    stack.push(Frame {
                        node: frame.node,
                        edge_pos: frame.edge_pos + 1,
                        pat_pos: frame.pat_pos,
                        edits_left: frame.edits_left - 1,
                        consumed: frame.consumed + 1,
                        parent_cursor: cursor,
                        op: Some(Op::Deletion),
                    });
                    stack.push(Frame {
                        node: frame.node,
                        edge_pos: frame.edge_pos,
                        pat_pos: frame.pat_pos + 1,
                        edits_left: frame.edits_left - 1,
                        consumed: frame.consumed,
                        parent_cursor: cursor,
                        op: Some(Op::Insertion),
                    });
                }
            } else {
                let mut child = self.nodes[frame.node as usize].first_child;
                while let Some(c) = child {
                    let first = self.edge_first_char(c);
                    let pat_char = pattern[frame.pat_pos];
                    let cost = if first == pat_char { 0 } else { 1 };
                    if frame.edits_left - cost >= 0 {
                        stack.push(Frame {
                            node: c,
                            edge_pos: 1,
                            pat_pos: frame.pat_pos + 1,
                            edits_left: frame.edits_left - cost,
                            consumed: frame.consumed + 1,
                            parent_cursor: cursor,
                            op: Some(Op::Match),
                        });
                    }
                    if frame.edits_left - 1 >= 0 {
                        stack.push(Frame {
                            node: c,
                            edge_pos: 1,
                            pat_pos: frame.pat_pos,
                            edits_left: frame.edits_left - 1,
                            consumed: frame.consumed + 1,
                            parent_cursor: cursor,
                            op: Some(Op::Deletion),
                        });
                    }
                    child = self.nodes[c as usize].next_sibling;
                }
                if frame.edits_left - 1 >= 0 {
                    stack.push(Frame {
                        node: frame.node,
                        edge_pos: frame.edge_pos,
                        pat_pos: frame.pat_pos + 1,
                        edits_left: frame.edits_left - 1,
                        consumed: frame.consumed,
                        parent_cursor: cursor,
                        op: Some(Op::Insertion),
                    });
                }
            }
        }

        hits
    }
}

/// Depth-first leaf iterator produced by [`SuffixTree::leaves`].
pub struct LeafIter<'a, 't> {
    tree: &'a SuffixTree<'t>,
    stack: Vec<NodeId>,
}

impl<'a, 't> Iterator for LeafIter<'a, 't> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while let Some(node) = self.stack.pop() {
            if let Some(label) = self.tree.nodes[node as usize].leaf_label {
                return Some(label);
            }
            let mut children = Vec::new();
            let mut cur = self.tree.nodes[node as usize].first_child;
            while let Some(c) = cur {
                children.push(c);
                cur = self.tree.nodes[c as usize].next_sibling;
            }
            for c in children.into_iter().rev() {
                self.stack.push(c);
            }
        }
        None
    }
}
