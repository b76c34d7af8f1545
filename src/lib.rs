//! # stringdex
//!
//! **Exact and approximate string-matching index structures over byte strings.**
//!
//! > "Searching implies counting. Count(Pattern) -> O(Pattern_Length) independent of Corpus_Length."
//!
//! A tower of index constructions, each built from the one below it (leaves
//! first): an alphabet remapper, a suffix array (comparison-sort or linear-time
//! skew/DC3), an LCP array (Kasai), a suffix tree (naive, McCreight, or built
//! directly from a suffix array + LCP array), and a BWT backward-search index
//! with a plain occurrence table. On top sit the matchers — naive, border/KMP,
//! Boyer-Moore-Horspool, and the index-driven searches — unified behind one
//! iterator façade.
//!
//! ## Layers
//!
//! | Layer | Module | Responsibility |
//! |---|---|---|
//! | L0 | [`alphabet`] | Dense `0..sigma` remap of the bytes a text actually uses |
//! | L1 | [`sa`] | Suffix array: comparison sort (oracle) + skew/DC3 (linear time) |
//! | L2 | [`lcp`] | Inverse suffix array + Kasai LCP construction |
//! | L3 | [`suffix_tree`] | Arena suffix tree: naive, McCreight, from-(SA,LCP) |
//! | L4 | [`bwt`] | C/O-table backward-search index, exact and edit-distance-bounded |
//! | L5 | [`matchers`] | Naive, border-array/KMP, Boyer-Moore-Horspool |
//! | L6 | [`iter`] | Uniform `init`/`next`/dispose match iterator over every matcher |
//!
//! ## Example
//!
//! ```
//! use stringdex::bwt::BwtIndex;
//! use stringdex::iter::MatchIter;
//!
//! let text = b"abracadabra";
//! let index = BwtIndex::build(text).unwrap();
//!
//! // Exact count/locate: O(pattern_length), independent of text_length.
//! let (l, r) = index.search_exact(b"abra").unwrap();
//! assert_eq!(r - l + 1, 2);
//!
//! let mut positions: Vec<_> = MatchIter::bwt_exact(&index, b"abra").map(|m| m.pos).collect();
//! positions.sort_unstable();
//! assert_eq!(positions, vec![0, 7]);
//!
//! // Edit-distance-bounded search carries a CIGAR per hit.
//! let hits: Vec<_> = MatchIter::bwt_approx(&index, b"abrx", 1).collect();
//! assert!(hits.iter().any(|m| m.pos == 0 || m.pos == 7));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod alphabet;
pub mod bwt;
pub mod cigar;
pub mod error;
pub mod iter;
pub mod lcp;
pub mod matchers;
pub mod sa;
pub mod suffix_tree;

#[cfg(test)]
mod properties;

pub use bwt::BwtIndex;
pub use error::IndexError;
pub use iter::{Match, MatchIter};
pub use lcp::LcpArray;
pub use sa::SuffixArray;
pub use suffix_tree::SuffixTree;

/// Version.
pub const VERSION: &str = "0.1.0";
