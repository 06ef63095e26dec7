//! In-order traversal of a red-black tree through its header node
//!
//! libstdc++ anchors every tree on a header node: `header.left` is the minimum,
//! `header.right` is the maximum, `header.parent` is the root and
//! `root.parent` is the header. The successor computation below relies on that
//! shape instead of a per-node "is header" flag.

use crate::errors::{PrintError, Result};
use std::fmt;
use tracing::trace;

/// Structural access to the nodes of a binary search tree
pub trait TreeLinks {
    type Node: Copy + PartialEq + fmt::Debug;
    type Payload;

    fn left(&self, node: Self::Node) -> Result<Option<Self::Node>>;
    fn right(&self, node: Self::Node) -> Result<Option<Self::Node>>;
    fn parent(&self, node: Self::Node) -> Result<Option<Self::Node>>;

    /// Element stored in a (non-header) node
    fn value(&self, node: Self::Node) -> Result<Self::Payload>;
}

impl<T: TreeLinks + ?Sized> TreeLinks for &T {
    type Node = T::Node;
    type Payload = T::Payload;

    fn left(&self, node: Self::Node) -> Result<Option<Self::Node>> {
        (**self).left(node)
    }

    fn right(&self, node: Self::Node) -> Result<Option<Self::Node>> {
        (**self).right(node)
    }

    fn parent(&self, node: Self::Node) -> Result<Option<Self::Node>> {
        (**self).parent(node)
    }

    fn value(&self, node: Self::Node) -> Result<Self::Payload> {
        (**self).value(node)
    }
}

/// Next node in ascending order; the header if `node` is the maximum
pub fn successor<L: TreeLinks + ?Sized>(links: &L, node: L::Node) -> Result<L::Node> {
    successor_within(links, node, usize::MAX)
}

/// Successor computation that gives up after `max_steps` link hops per loop
fn successor_within<L: TreeLinks + ?Sized>(
    links: &L,
    node: L::Node,
    max_steps: usize,
) -> Result<L::Node> {
    if let Some(mut next) = links.right(node)? {
        let mut steps = 0;
        while let Some(left) = links.left(next)? {
            next = left;
            steps += 1;
            if steps > max_steps {
                return Err(cycle(node));
            }
        }
        return Ok(next);
    }

    let mut node = node;
    let mut parent = parent_of(links, node)?;
    let mut steps = 0;
    while links.right(parent)? == Some(node) {
        node = parent;
        parent = parent_of(links, parent)?;
        steps += 1;
        if steps > max_steps {
            return Err(cycle(node));
        }
    }

    // An ascent from the maximum through a root without a right subtree ends
    // with `node` on the header and `parent` on the root. The header's right
    // link is that same root, so the walk stays on the header.
    if links.right(node)? != Some(parent) {
        node = parent;
    }
    Ok(node)
}

fn parent_of<L: TreeLinks + ?Sized>(links: &L, node: L::Node) -> Result<L::Node> {
    links
        .parent(node)?
        .ok_or_else(|| PrintError::MalformedTree {
            message: format!("node {:?} has no parent", node),
        })
}

fn cycle<N: fmt::Debug>(node: N) -> PrintError {
    PrintError::MalformedTree {
        message: format!("link cycle reached from node {:?}", node),
    }
}

/// Iterator over the payloads of a tree in ascending order
///
/// Yields exactly `count` payloads. Landing on the header early, or any failed
/// read, produces one error and then ends the iteration.
pub struct InOrderWalk<L: TreeLinks> {
    links: L,
    header: L::Node,
    node: L::Node,
    count: usize,
    yielded: usize,
    pending: Option<PrintError>,
    done: bool,
}

impl<L: TreeLinks> InOrderWalk<L> {
    pub fn new(links: L, header: L::Node, leftmost: L::Node, count: usize) -> Self {
        InOrderWalk {
            links,
            header,
            node: leftmost,
            count,
            yielded: 0,
            pending: None,
            done: false,
        }
    }

    /// Number of payloads the walk will produce on a well-formed tree
    pub fn expected_len(&self) -> usize {
        self.count
    }

    fn fail(&mut self, err: PrintError) -> Option<Result<L::Payload>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<L: TreeLinks> Iterator for InOrderWalk<L> {
    type Item = Result<L::Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return self.fail(err);
        }
        if self.done || self.yielded == self.count {
            return None;
        }

        let current = self.node;
        if current == self.header {
            let err = PrintError::PrematureEnd {
                expected: self.count,
                yielded: self.yielded,
            };
            return self.fail(err);
        }

        let payload = match self.links.value(current) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err),
        };
        self.yielded += 1;

        if self.yielded < self.count {
            // A path in a tree of `count` nodes plus the header is never longer than this
            match successor_within(&self.links, current, self.count.saturating_add(1)) {
                Ok(next) => {
                    trace!("Tree successor of {:?} is {:?}", current, next);
                    self.node = next;
                }
                Err(err) => self.pending = Some(err),
            }
        }

        Some(Ok(payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            let remaining = self.count - self.yielded;
            (0, Some(remaining.saturating_add(1)))
        }
    }
}
