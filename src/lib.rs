//! An order-statistic AVL tree map for Rust.
//!
//! This crate provides [`AvlTreeMap`], an ordered map built on an AVL tree whose
//! nodes also record the size of their subtree and a link to their parent. On top
//! of the usual map operations it answers, in O(log n):
//!
//! - [`rank`](AvlTreeMap::rank) - how many keys are smaller than a given key
//! - [`get_by_rank`](AvlTreeMap::get_by_rank) - the entry at a given sorted position
//! - [`floor`](AvlTreeMap::floor), [`ceiling`](AvlTreeMap::ceiling),
//!   [`lower`](AvlTreeMap::lower), [`higher`](AvlTreeMap::higher) - bounded lookups
//! - [`NodeRef::predecessor`] and [`NodeRef::successor`] - in-order neighbours of
//!   a node found earlier, reached through parent links rather than a new search
//!
//! # Example
//!
//! ```
//! use avl_ost::{AvlTreeMap, Rank};
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // The median entry.
//! let median = scores.get_by_rank(1).unwrap();
//! assert_eq!(*median.key(), "Bob");
//! assert_eq!(median.successor().map(|n| *n.key()), Some("Carol"));
//!
//! assert_eq!(scores.rank(&"Bobby"), 2);
//! assert_eq!(scores[Rank(0)], 100);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Arena storage** - Nodes live in one slot vector and link to each other by index,
//!   so parent links never own anything
//! - **Tracing** - Structural changes emit `tracing` events at `TRACE` level
//!
//! # Implementation
//!
//! Every node stores its key, value, height, subtree size, children and parent.
//! Insertion and removal walk back up from the changed position, recomputing
//! height and size and rotating where the heights of two siblings differ by two.

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

mod order_statistic;
mod raw;

pub mod avl_tree_map;

pub use avl_tree_map::{AvlTreeMap, NodeId, NodeRef};
pub use order_statistic::Rank;
