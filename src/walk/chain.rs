//! Traversal of separately chained hash tables
//!
//! Elements are produced bucket by bucket, following each bucket's `next`
//! chain to its end before moving to the next non-empty bucket.

use crate::errors::{PrintError, Result};
use std::fmt;
use tracing::trace;

/// Access to a hash table's bucket array and chain links
pub trait BucketChain {
    type Node: Copy + PartialEq + fmt::Debug;
    type Payload;

    fn bucket_count(&self) -> usize;

    /// Head of the chain in bucket `index`, if any
    fn bucket(&self, index: usize) -> Result<Option<Self::Node>>;

    fn next(&self, node: Self::Node) -> Result<Option<Self::Node>>;

    fn value(&self, node: Self::Node) -> Result<Self::Payload>;
}

impl<T: BucketChain + ?Sized> BucketChain for &T {
    type Node = T::Node;
    type Payload = T::Payload;

    fn bucket_count(&self) -> usize {
        (**self).bucket_count()
    }

    fn bucket(&self, index: usize) -> Result<Option<Self::Node>> {
        (**self).bucket(index)
    }

    fn next(&self, node: Self::Node) -> Result<Option<Self::Node>> {
        (**self).next(node)
    }

    fn value(&self, node: Self::Node) -> Result<Self::Payload> {
        (**self).value(node)
    }
}

/// Iterator over all payloads of a hash table
///
/// Stops after `element_count` payloads. Running out of buckets first yields a
/// [`PrintError::BucketsExhausted`] and ends the iteration.
pub struct ChainWalk<C: BucketChain> {
    chain: C,
    expected: usize,
    yielded: usize,
    bucket_index: usize,
    node: Option<C::Node>,
    done: bool,
}

impl<C: BucketChain> ChainWalk<C> {
    pub fn new(chain: C, element_count: usize) -> Self {
        ChainWalk {
            chain,
            expected: element_count,
            yielded: 0,
            bucket_index: 0,
            node: None,
            done: false,
        }
    }

    fn fail(&mut self, err: PrintError) -> Option<Result<C::Payload>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<C: BucketChain> Iterator for ChainWalk<C> {
    type Item = Result<C::Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.yielded == self.expected {
            return None;
        }

        let current = loop {
            if let Some(node) = self.node {
                break node;
            }
            if self.bucket_index >= self.chain.bucket_count() {
                let err = PrintError::BucketsExhausted {
                    expected: self.expected,
                    yielded: self.yielded,
                    buckets: self.chain.bucket_count(),
                };
                return self.fail(err);
            }
            match self.chain.bucket(self.bucket_index) {
                Ok(head) => {
                    if head.is_some() {
                        trace!("Hash chain starts in bucket {}", self.bucket_index);
                    }
                    self.node = head;
                }
                Err(err) => return self.fail(err),
            }
            self.bucket_index += 1;
        };

        let payload = match self.chain.value(current) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err),
        };
        match self.chain.next(current) {
            Ok(next) => self.node = next,
            Err(err) => return self.fail(err),
        }
        self.yielded += 1;
        Some(Ok(payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some((self.expected - self.yielded).saturating_add(1)))
        }
    }
}
