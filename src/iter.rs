//! L6: the uniform match-iterator façade (§4.7).
//!
//! Every matcher — naive, border/KMP, BMH, and the index-driven
//! SA/suffix-tree/BWT searches, exact or approximate — is wrapped into
//! the same `init / next / dispose` shape: a [`MatchIter`] value
//! produced by one of the `from_*` constructors, consumed as a plain
//! Rust `Iterator<Item = Match>`. Iterators are one-shot: once `next`
//! returns `None` the iterator is exhausted and not restartable. They
//! borrow their index and pattern rather than copying them; dropping an
//! iterator is `dispose` (auxiliary tables/stacks are just owned `Vec`s,
//! freed normally).

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::bwt::BwtIndex;
use crate::matchers::{Bmh, BorderScan, Kmp, Naive};
use crate::sa::SuffixArray;
use crate::suffix_tree::SuffixTree;

/// One occurrence. `cigar`/`edits` are populated only by approximate
/// matchers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub pos: usize,
    pub cigar: Option<String>,
    pub edits: Option<usize>,
}

impl Match {
    fn exact(pos: usize) -> Self {
        Match { pos, cigar: None, edits: None }
    }
}

/// The façade. Ascending-`pos` order is guaranteed for the four simple
/// exact matchers; order is implementation-defined (but stable) for the
/// index-driven variants, per §4.7.
pub enum MatchIter<'t, 'p> {
    Naive(Naive<'t, 'p>),
    Border(BorderScan<'t, 'p>),
    Kmp(Kmp<'t, 'p>),
    Bmh(Bmh<'t, 'p>),
    Positions(alloc::vec::IntoIter<usize>),
    Approx(alloc::vec::IntoIter<Match>),
}

impl<'t, 'p> MatchIter<'t, 'p> {
    pub fn naive(text: &'t [u8], pattern: &'p [u8]) -> Self {
        MatchIter::Naive(Naive::init(text, pattern))
    }

    pub fn border(text: &'t [u8], pattern: &'p [u8]) -> Self {
        MatchIter::Border(BorderScan::init(text, pattern))
    }

    pub fn kmp(text: &'t [u8], pattern: &'p [u8]) -> Self {
        MatchIter::Kmp(Kmp::init(text, pattern))
    }

    pub fn bmh(text: &'t [u8], pattern: &'p [u8]) -> Self {
        MatchIter::Bmh(Bmh::init(text, pattern))
    }

    /// SA binary-search matcher (§4.6's "SA-search"). An empty pattern
    /// yields no matches (§7's `empty_pattern`), matching the simple
    /// exact matchers rather than `SuffixArray::search_range`'s own
    /// "matches everything" convention.
    pub fn sa_search(sa: &SuffixArray<'_>, pattern: &'p [u8]) -> Self {
        if pattern.is_empty() {
            return MatchIter::Positions(Vec::new().into_iter());
        }
        let range = sa.search_range(pattern);
        let positions: Vec<usize> = sa.as_slice()[range].iter().map(|&p| p as usize).collect();
        MatchIter::Positions(positions.into_iter())
    }

    /// Suffix-tree exact descent matcher (§4.6's "ST-search"). Empty
    /// pattern yields no matches (§7).
    pub fn st_search(tree: &SuffixTree<'_>, pattern: &'p [u8]) -> Self {
        if pattern.is_empty() {
            return MatchIter::Positions(Vec::new().into_iter());
        }
        let positions: Vec<usize> = match tree.search(pattern) {
            Some(node) => tree.leaves(node).map(|l| l as usize).collect(),
            None => Vec::new(),
        };
        MatchIter::Positions(positions.into_iter())
    }

    /// BWT backward-search exact matcher. Empty pattern yields no
    /// matches (§7); `BwtIndex::search_exact` itself treats an empty
    /// pattern as matching every suffix, so the guard lives here.
    pub fn bwt_exact(idx: &BwtIndex, pattern: &[u8]) -> Self {
        if pattern.is_empty() {
            return MatchIter::Positions(Vec::new().into_iter());
        }
        let positions: Vec<usize> = match idx.search_exact(pattern) {
            Some((l, r)) => idx.positions(l, r).into_iter().map(|p| p as usize).collect(),
            None => Vec::new(),
        };
        MatchIter::Positions(positions.into_iter())
    }

    /// Suffix-tree approximate matcher. Empty pattern yields no matches
    /// (§7).
    pub fn st_approx(tree: &SuffixTree<'_>, pattern: &[u8], k: usize) -> Self {
        let mut matches = Vec::new();
        if !pattern.is_empty() {
            for hit in tree.approximate_search(pattern, k) {
                for leaf in tree.leaves(hit.node) {
                    matches.push(Match {
                        pos: leaf as usize,
                        cigar: Some(hit.cigar.clone()),
                        edits: Some(hit.edits),
                    });
                }
            }
        }
        MatchIter::Approx(matches.into_iter())
    }

    /// BWT approximate matcher. Empty pattern yields no matches (§7).
    pub fn bwt_approx(idx: &BwtIndex, pattern: &[u8], k: usize) -> Self {
        let mut matches = Vec::new();
        if !pattern.is_empty() {
            for hit in idx.search_approximate(pattern, k) {
                for pos in idx.positions(hit.l, hit.r) {
                    matches.push(Match {
                        pos: pos as usize,
                        cigar: Some(hit.cigar.clone()),
                        edits: Some(hit.edits),
                    });
                }
            }
        }
        MatchIter::Approx(matches.into_iter())
    }
}

impl<'t, 'p> Iterator for MatchIter<'t, 'p> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        match self {
            MatchIter::Naive(it) => it.next().map(Match::exact),
            MatchIter::Border(it) => it.next().map(Match::exact),
            MatchIter::Kmp(it) => it.next().map(Match::exact),
            MatchIter::Bmh(it) => it.next().map(Match::exact),
            MatchIter::Positions(it) => it.next().map(Match::exact),
            MatchIter::Approx(it) => it.next(),
        }
    }
}
