//! Self-balancing ordered maps for Rust.
//!
//! This crate provides one ordered-map contract, [`OrderedMap`], and four
//! interchangeable implementations of it, each keeping its entries sorted
//! by key under a different balancing strategy:
//!
//! - [`AvlMap`] - binary search tree kept height-balanced with per-node
//!   heights and rotations; the most rigidly balanced of the four.
//! - [`RedBlackMap`] - binary search tree balanced through a two-coloring
//!   invariant with recolor/rotate fix-ups; fewer rotations than AVL on
//!   write-heavy workloads.
//! - [`SplayMap`] - self-adjusting tree with no stored balance metadata;
//!   every access splays the touched key to the root, giving amortized
//!   logarithmic cost and cheap repeated access to hot keys.
//! - [`SkipListMap`] - layered linked list with randomized node levels;
//!   expected-logarithmic search with plain forward-pointer splicing
//!   instead of rotations.
//!
//! All four support the same operations: point lookups, insert/remove with
//! prior-value return, extremal queries, the `ceiling`/`floor`/`lower`/
//! `higher` boundary queries, half-open `sub_map` range snapshots, and
//! ascending iteration.
//!
//! # Example
//!
//! ```
//! use ordmap::AvlMap;
//!
//! let mut primes = AvlMap::new();
//! for p in [11, 2, 7, 3, 5] {
//!     primes.insert(p, p * p);
//! }
//!
//! assert_eq!(primes.get(&7), Some(&49));
//! assert_eq!(primes.first_key_value(), Some((&2, &4)));
//! assert_eq!(primes.ceiling(&4), Some((&5, &25)));
//! let keys: Vec<i32> = primes.keys().copied().collect();
//! assert_eq!(keys, [2, 3, 5, 7, 11]);
//! ```
//!
//! # Implementation
//!
//! Every map stores its nodes in an index arena and links them with
//! niche-optimized handles instead of owning pointers, so the cyclic
//! parent/child link graphs of the tree variants need no unsafe code and no
//! reference counting; the arena is the single owner of every node. The
//! crate is `no_std` (it only requires `alloc`), single-threaded by
//! construction, and free of recursion on tree shape: adversarial input
//! can make a splay tree arbitrarily deep, so traversals use explicit
//! stacks or parent walks.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod iter;
mod map;
mod raw;

pub mod avl_map;
pub mod red_black_map;
pub mod skip_list_map;
pub mod splay_map;

pub use avl_map::AvlMap;
pub use iter::{Iter, Keys, Values};
pub use map::OrderedMap;
pub use red_black_map::RedBlackMap;
pub use skip_list_map::SkipListMap;
pub use splay_map::SplayMap;
