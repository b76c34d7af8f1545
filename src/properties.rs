//! Cross-layer property tests for §8's testable properties.
//!
//! Per-module unit tests cover the seed scenarios and boundary cases close
//! to the code they exercise; this module carries the properties that span
//! more than one layer (construction equivalence, matcher equivalence,
//! CIGAR soundness/completeness) with `proptest`, the way
//! `hucsmn-suffix_array`'s `construct/sacak0/tests.rs` drives its own
//! construction correctness property.

#![cfg(test)]

extern crate alloc;

use alloc::vec::Vec;
use proptest::prelude::*;

use crate::bwt::BwtIndex;
use crate::cigar::Op;
use crate::iter::MatchIter;
use crate::lcp::LcpArray;
use crate::matchers::{Bmh, BorderScan, Kmp, Naive};
use crate::sa::{build_skew, inverse, SuffixArray};
use crate::suffix_tree::SuffixTree;

fn small_text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c')], 0..40)
}

fn small_pattern() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c')], 1..5)
}

fn terminated(raw: &[u8]) -> Vec<u8> {
    let mut v = raw.to_vec();
    v.push(0);
    v
}

fn naive_positions(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return Vec::new();
    }
    (0..=text.len() - pattern.len())
        .filter(|&i| &text[i..i + pattern.len()] == pattern)
        .collect()
}

proptest! {
    /// Property 1 + 2: SA is a permutation of `0..=n` and strictly sorted.
    #[test]
    fn sa_is_a_sorted_permutation(text in small_text()) {
        let sa = build_skew(&text);
        let mut sorted = sa.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..=text.len() as u32).collect::<Vec<_>>());
        for w in sa.windows(2) {
            prop_assert!(text[w[0] as usize..] < text[w[1] as usize..]);
        }
    }

    /// Property 3: ISA is the inverse of SA in both directions.
    #[test]
    fn isa_is_inverse_of_sa(text in small_text()) {
        let sa = build_skew(&text);
        let isa = inverse(&sa);
        for (i, &s) in sa.iter().enumerate() {
            prop_assert_eq!(isa[s as usize], i as u32);
        }
        for (j, &i) in isa.iter().enumerate() {
            prop_assert_eq!(sa[i as usize], j as u32);
        }
    }

    /// Property 4: Kasai's LCP matches the naive pairwise-common-prefix
    /// definition at every rank.
    #[test]
    fn lcp_matches_naive_definition(text in small_text()) {
        let sa = build_skew(&text);
        let isa = inverse(&sa);
        let lcp = LcpArray::build(&text, &sa, &isa);
        for i in 1..sa.len() {
            let a = &text[sa[i - 1] as usize..];
            let b = &text[sa[i] as usize..];
            let expected = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
            prop_assert_eq!(lcp.get(i), expected as i64);
        }
        prop_assert_eq!(lcp.get(0), -1);
        prop_assert_eq!(lcp.get(lcp.len() - 1), -1);
    }

    /// Property 5: naive, McCreight, and from-(SA,LCP) constructions agree
    /// on leaf order (and hence on the set of suffixes each leaf labels).
    #[test]
    fn suffix_tree_constructions_agree(text in small_text()) {
        let text = terminated(&text);
        let naive = SuffixTree::build_naive(&text).unwrap();
        let mcc = SuffixTree::build_mccreight(&text).unwrap();

        let raw = &text[..text.len() - 1];
        let sa = build_skew(raw);
        let isa = inverse(&sa);
        let lcp = LcpArray::build(raw, &sa, &isa);
        let from_sa = SuffixTree::build_from_sa_lcp(&text, &sa, lcp.as_slice()).unwrap();

        let a: Vec<u32> = naive.leaves(naive.root()).collect();
        let b: Vec<u32> = mcc.leaves(mcc.root()).collect();
        let c: Vec<u32> = from_sa.leaves(from_sa.root()).collect();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
        prop_assert_eq!(&a, &sa);
    }

    /// Property 6: every exact matcher agrees with the naive oracle, for
    /// every seed pattern/text pair proptest generates.
    #[test]
    fn exact_matchers_agree_with_naive(text in small_text(), pattern in small_pattern()) {
        let expected = naive_positions(&text, &pattern);

        let mut border: Vec<_> = BorderScan::init(&text, &pattern).collect();
        let mut kmp: Vec<_> = Kmp::init(&text, &pattern).collect();
        let mut bmh: Vec<_> = Bmh::init(&text, &pattern).collect();
        let naive: Vec<_> = Naive::init(&text, &pattern).collect();
        border.sort_unstable();
        kmp.sort_unstable();
        bmh.sort_unstable();
        prop_assert_eq!(&naive, &expected);
        prop_assert_eq!(&border, &expected);
        prop_assert_eq!(&kmp, &expected);
        prop_assert_eq!(&bmh, &expected);

        let sa = SuffixArray::build_skew(&text);
        let mut sa_hits: Vec<_> = MatchIter::sa_search(&sa, &pattern).map(|m| m.pos).collect();
        sa_hits.sort_unstable();
        prop_assert_eq!(&sa_hits, &expected);

        let terminated_text = terminated(&text);
        let tree = SuffixTree::build_mccreight(&terminated_text).unwrap();
        let mut st_hits: Vec<_> = MatchIter::st_search(&tree, &pattern).map(|m| m.pos).collect();
        st_hits.sort_unstable();
        prop_assert_eq!(&st_hits, &expected);

        if let Ok(idx) = BwtIndex::build(&text) {
            let mut bwt_hits: Vec<_> = MatchIter::bwt_exact(&idx, &pattern).map(|m| m.pos).collect();
            bwt_hits.sort_unstable();
            prop_assert_eq!(&bwt_hits, &expected);
        }
    }

    /// Property 9: every matcher's iterator terminates after finitely many
    /// calls (bounded well below the text length).
    #[test]
    fn iterators_terminate(text in small_text(), pattern in small_pattern()) {
        let bound = text.len() + 2;
        for mut it in [
            MatchIter::naive(&text, &pattern),
            MatchIter::border(&text, &pattern),
            MatchIter::kmp(&text, &pattern),
            MatchIter::bmh(&text, &pattern),
        ] {
            let mut calls = 0usize;
            while it.next().is_some() {
                calls += 1;
                prop_assert!(calls <= bound);
            }
        }
    }

    /// Boundary case from §8: approximate search at `k = 0` must equal
    /// exact search.
    #[test]
    fn approximate_k0_equals_exact(text in small_text(), pattern in small_pattern()) {
        if let Ok(idx) = BwtIndex::build(&text) {
            let expected = match idx.search_exact(&pattern) {
                Some((l, r)) => idx.positions(l, r),
                None => Vec::new(),
            };
            let mut got: Vec<u32> = idx
                .search_approximate(&pattern, 0)
                .into_iter()
                .flat_map(|m| idx.positions(m.l, m.r))
                .collect();
            got.sort_unstable();
            got.dedup();
            prop_assert_eq!(expected, got);
        }
    }

    /// Property 7: replaying each approximate hit's CIGAR against
    /// `T[pos..pos+match_length]` (for the occurrence start `pos` named by
    /// the SA interval's left end) reproduces an alignment to `pattern`
    /// whose substitution+insertion+deletion count is exactly the
    /// reported `edits`, which must be `<= k`.
    #[test]
    fn cigar_soundness(text in small_text(), pattern in small_pattern()) {
        let k = 1usize;
        if let Ok(idx) = BwtIndex::build(&text) {
            for hit in idx.search_approximate(&pattern, k) {
                let ops = parse_cigar(&hit.cigar);
                let pos = idx.sa()[hit.l as usize] as usize;
                let (computed_edits, text_consumed, pattern_consumed) =
                    replay(&ops, &text, pos, &pattern);
                prop_assert_eq!(computed_edits, hit.edits);
                prop_assert!(hit.edits <= k);
                prop_assert_eq!(text_consumed, hit.match_length);
                prop_assert_eq!(pattern_consumed, pattern.len());
            }
        }
    }
}

fn parse_cigar(cigar: &str) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut run = 0usize;
    for c in cigar.chars() {
        if let Some(d) = c.to_digit(10) {
            run = run * 10 + d as usize;
        } else {
            let op = match c {
                'M' => Op::Match,
                'I' => Op::Insertion,
                'D' => Op::Deletion,
                _ => panic!("unexpected CIGAR operation {c}"),
            };
            for _ in 0..run {
                ops.push(op);
            }
            run = 0;
        }
    }
    ops
}

/// Replays `ops` starting at text offset `pos`, returning
/// `(edits, text_bytes_consumed, pattern_bytes_consumed)`. Mirrors the
/// byte-consumption rules `cigar::Op` documents: `Match` advances both,
/// `Deletion` advances only the text, `Insertion` advances only the
/// pattern.
fn replay(ops: &[Op], text: &[u8], pos: usize, pattern: &[u8]) -> (usize, usize, usize) {
    let mut edits = 0usize;
    let mut t = 0usize;
    let mut p = 0usize;
    for &op in ops {
        match op {
            Op::Match => {
                if text[pos + t] != pattern[p] {
                    edits += 1;
                }
                t += 1;
                p += 1;
            }
            Op::Deletion => {
                edits += 1;
                t += 1;
            }
            Op::Insertion => {
                edits += 1;
                p += 1;
            }
        }
    }
    (edits, t, p)
}
