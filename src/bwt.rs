//! L4: BWT backward-search index.
//!
//! Backed by a plain `C`-table + full `O`-table (prefix occurrence
//! counts per letter per position) — not a wavelet tree or any other
//! succinct rank/select structure; that tradeoff is out of scope (see
//! `spec.md`'s Non-goals).

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::alphabet::{remap, remap_pattern, RemapTable};
use crate::cigar::{CigarBuffer, Op};
use crate::error::{IndexError, Result};
use crate::sa::build_skew;

/// A single approximate-search hit: the SA interval it resolved to, its
/// alignment, and the bookkeeping needed to enumerate positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApproxMatch {
    pub l: u32,
    pub r: u32,
    pub cigar: alloc::string::String,
    pub edits: usize,
    pub match_length: usize,
}

/// BWT index: suffix array of the remapped text, its C/O tables, and
/// the remap table needed to translate query patterns and to enumerate
/// the alphabet during approximate search.
pub struct BwtIndex {
    remap: RemapTable,
    /// Suffix array over the remapped text, length `n+1`.
    sa: Vec<u32>,
    /// `C[a]`: count of characters strictly less than code `a`. Length
    /// `sigma+1`.
    c: Vec<u32>,
    /// `O[a][i]`: count of code `a` in `bwt[0..=i]`. `sigma` rows, each
    /// `n+1` entries.
    o: Vec<Vec<u32>>,
    sigma: usize,
}

fn validate_no_embedded_sentinel(text: &[u8]) -> Result<()> {
    for (i, &b) in text.iter().enumerate() {
        if b == 0 {
            return Err(IndexError::InvalidSentinel { at: i });
        }
    }
    Ok(())
}

impl BwtIndex {
    /// Build the index over `text` (no sentinel byte allowed anywhere —
    /// one is appended conceptually, the same convention `sa`/`lcp` use).
    pub fn build(text: &[u8]) -> Result<Self> {
        validate_no_embedded_sentinel(text)?;
        let (remapped, remap) = remap(text);
        let sa = build_skew(&remapped);
        let n1 = sa.len(); // n+1

        let sigma = remap.alphabet_size();
        let bwt: Vec<u8> = sa
            .iter()
            .map(|&s| if s == 0 { 0 } else { remapped[s as usize - 1] })
            .collect();

        let mut cnt = vec![0u32; sigma];
        for &code in &bwt {
            cnt[code as usize] += 1;
        }
        let mut c = vec![0u32; sigma + 1];
        for a in 1..=sigma {
            c[a] = c[a - 1] + cnt[a - 1];
        }

        let mut o = vec![vec![0u32; n1]; sigma];
        for a in 0..sigma {
            let mut running = 0u32;
            for i in 0..n1 {
                if bwt[i] as usize == a {
                    running += 1;
                }
                o[a][i] = running;
            }
        }

        Ok(BwtIndex { remap, sa, c, o, sigma })
    }

    pub fn remap_table(&self) -> &RemapTable {
        &self.remap
    }

    pub fn sa(&self) -> &[u32] {
        &self.sa
    }

    pub fn sigma(&self) -> usize {
        self.sigma
    }

    fn occ(&self, a: u8, i: u32) -> u32 {
        self.o[a as usize][i as usize]
    }

    /// One backward-search step: narrow `[l, r]` by prepending code `a`.
    /// `l == 0` is handled per the design notes: `O[a][l-1]` is treated
    /// as if the window started empty, so `l` becomes `C[a]` rather than
    /// `C[a] + 1`.
    fn extend(&self, l: u32, r: u32, a: u8) -> (u32, u32) {
        let ca = self.c[a as usize];
        let new_l = if l == 0 { ca } else { ca + self.occ(a, l - 1) + 1 };
        let new_r = ca + self.occ(a, r);
        (new_l, new_r)
    }

    /// Exact backward search. Returns the SA interval `[l, r]`
    /// (inclusive) of every suffix prefixed by `pattern`, or `None` if
    /// there is no such suffix. An empty pattern matches every suffix,
    /// including the sentinel row — the same convention `SuffixArray`
    /// uses. A pattern containing a byte absent from the indexed
    /// alphabet also yields `None` (§7: not an error, zero matches).
    pub fn search_exact(&self, pattern: &[u8]) -> Option<(u32, u32)> {
        if pattern.is_empty() {
            return Some((0, self.sa.len() as u32 - 1));
        }
        let remapped = remap_pattern(pattern, &self.remap)?;

        let mut l = 1u32;
        let mut r = self.sa.len() as u32 - 1;
        for &a in remapped.iter().rev() {
            if l > r {
                return None;
            }
            let (nl, nr) = self.extend(l, r, a);
            l = nl;
            r = nr;
        }
        if l > r {
            None
        } else {
            Some((l, r))
        }
    }

    /// Positions in `[l, r]`, ascending.
    pub fn positions(&self, l: u32, r: u32) -> Vec<u32> {
        let mut v: Vec<u32> = self.sa[l as usize..=r as usize].to_vec();
        v.sort_unstable();
        v
    }

    /// Approximate backward search bounded by `k` edits, via an explicit
    /// stack of frames (§4.5, §9) rather than recursion. Each frame pop
    /// produces up to `2*sigma + 1` children: a match/mismatch and a
    /// deletion frame per alphabet letter, plus one insertion frame.
    /// Completion is detected on pop (`i < 0`), not by pushing a no-op
    /// branch at `i == -1`, so a frame is counted as a hit exactly once.
    pub fn search_approximate(&self, pattern: &[u8], k: usize) -> Vec<ApproxMatch> {
        struct Frame {
            l: u32,
            r: u32,
            i: isize,
            edits_left: i32,
            consumed: usize,
            parent_cursor: usize,
            op: Option<Op>,
        }

        let remapped = match remap_pattern(pattern, &self.remap) {
            Some(r) => r,
            None => return Vec::new(),
        };

        let mut hits = Vec::new();
        let mut buf = CigarBuffer::with_capacity(pattern.len() + 4 * k + 1);
        let mut stack = vec![Frame {
            l: 1,
            r: self.sa.len() as u32 - 1,
            i: remapped.len() as isize - 1,
            edits_left: k as i32,
            consumed: 0,
            parent_cursor: 0,
            op: None,
        }];

        while let Some(frame) = stack.pop() {
            if frame.l > frame.r {
                continue;
            }
            buf.truncate(frame.parent_cursor);
            if let Some(op) = frame.op {
                buf.push(op);
            }
            let cursor = buf.cursor();

            if frame.i < 0 {
                hits.push(ApproxMatch {
                    l: frame.l,
                    r: frame.r,
                    // Frames are appended in right-to-left pattern order
                    // (backward search), so the buffer holds the alignment
                    // back to front relative to `T[pos..pos+match_length]`;
                    // reverse before encoding.
                    cigar: buf.simplify_reversed(cursor),
                    edits: (k as i32 - frame.edits_left) as usize,
                    match_length: frame.consumed,
                });
                continue;
            }

            let pat_code = remapped[frame.i as usize];
            for a in 1..self.sigma {
                let a = a as u8;
                let cost = if a == pat_code { 0 } else { 1 };
                if frame.edits_left - cost >= 0 {
                    let (nl, nr) = self.extend(frame.l, frame.r, a);
                    stack.push(Frame {
                        l: nl,
                        r: nr,
                        i: frame.i - 1,
                        edits_left: frame.edits_left - cost,
                        consumed: frame.consumed + 1,
                        parent_cursor: cursor,
                        op: Some(Op::Match),
                    });
                }
                if frame.edits_left - 1 >= 0 {
                    let (nl, nr) = self.extend(frame.l, frame.r, a);
                    stack.push(Frame {
                        l: nl,
                        r: nr,
                        i: frame.i,
                        edits_left: frame.edits_left - 1,
                        consumed: frame.consumed + 1,
                        parent_cursor: cursor,
                        op: Some(Op::Deletion),
                    });
                }
            }
            if frame.edits_left - 1 >= 0 {
                stack.push(Frame {
                    l: frame.l,
                    r: frame.r,
                    i: frame.i - 1,
                    edits_left: frame.edits_left - 1,
                    consumed: frame.consumed,
                    parent_cursor: cursor,
                    op: Some(Op::Insertion),
                });
            }
        }

        hits
    }
}
