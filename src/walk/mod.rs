//! Link-chasing traversals over frozen node structures
//!
//! - [`tree`]: in-order walk of a header-anchored binary search tree, using
//!   only `left`/`right`/`parent` links
//! - [`chain`]: bucket-then-chain walk of a separately chained hash table
//!
//! Both walks are driven by the element count stored in the container, never by
//! the shape of the links alone, so a damaged snapshot cannot make them run
//! forever. Node access goes through the [`TreeLinks`] and [`BucketChain`]
//! traits: printers implement them over target memory, tests over plain
//! in-memory structures.

pub mod chain;
pub mod tree;

pub use chain::{BucketChain, ChainWalk};
pub use tree::{successor, InOrderWalk, TreeLinks};
