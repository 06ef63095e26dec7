//! Printers for libstdc++ containers, smart pointers and iterators
//!
//! A printer wraps one value and answers three questions about it:
//!
//! - [`Printer::summary`]: the one-line description (`std::vector of length 2,
//!   capacity 4`), a decoded string, or another value to print in its place
//! - [`Printer::children`]: the elements, produced lazily so that a renderer
//!   which stops after `max_elements` never reads the rest
//! - [`Printer::display_hint`]: how the children should be laid out
//!
//! Printers hold no borrowed state; all memory access goes through the
//! [`Target`] passed to each call, so a printer can be asked again and gives
//! the same answer as long as the snapshot is unchanged.
//!
//! Modules:
//! - [`adapter`]: `std::stack`, `std::queue`, `std::priority_queue`
//! - [`bitset`], [`deque`], [`list`], [`slist`], [`string`], [`vector`]
//! - [`tree`]: `std::map`/`std::set` family over the red-black tree walk
//! - [`hashtable`]: `std::unordered_*` family over the bucket-chain walk
//! - [`smart_ptr`]: `shared_ptr`, `weak_ptr`, `unique_ptr`

pub mod adapter;
pub mod bitset;
pub mod deque;
pub mod hashtable;
pub mod list;
pub mod slist;
pub mod smart_ptr;
pub mod string;
pub mod tree;
pub mod vector;

pub use adapter::StackOrQueuePrinter;
pub use bitset::BitsetPrinter;
pub use deque::{DequeIteratorPrinter, DequePrinter};
pub use hashtable::{UnorderedMapPrinter, UnorderedSetPrinter};
pub use list::{ListIteratorPrinter, ListPrinter};
pub use slist::{SlistIteratorPrinter, SlistPrinter};
pub use smart_ptr::{SharedPtrPrinter, UniquePtrPrinter};
pub use string::{StringEncoding, StringPrinter};
pub use tree::{MapPrinter, RbTreeIteratorPrinter, SetPrinter};
pub use vector::{VectorIteratorPrinter, VectorPrinter};

use crate::errors::{PrintError, Result};
use crate::memory::value::Value;
use crate::snapshot::Target;
use crate::types::Type;
use std::fmt;

/// Layout hint for a printer's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHint {
    /// Children are plain elements: `{1, 2, 3}`
    Array,
    /// Children alternate key, value: `{[1] = 2}`
    Map,
    /// The summary is a string
    String,
}

/// What a printer says about the value as a whole
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Text(String),
    /// Decoded string contents, `truncated` when the length cap was hit
    String { text: String, truncated: bool },
    /// Print this value instead (iterators, `unique_ptr`)
    Value(Value),
    /// An adapter around another container's summary
    Wrapping { name: String, inner: Box<Summary> },
}

impl Summary {
    pub fn text(text: impl Into<String>) -> Self {
        Summary::Text(text.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildValue {
    Value(Value),
    /// A literal that does not live in target memory (bitset bits)
    Int(i64),
}

/// One labelled element
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub label: String,
    pub value: ChildValue,
}

impl Child {
    pub fn value(label: impl Into<String>, value: Value) -> Self {
        Child {
            label: label.into(),
            value: ChildValue::Value(value),
        }
    }

    pub fn int(label: impl Into<String>, n: i64) -> Self {
        Child {
            label: label.into(),
            value: ChildValue::Int(n),
        }
    }
}

/// Lazy sequence of children; each element may fault independently
pub type Children<'a> = Box<dyn Iterator<Item = Result<Child>> + 'a>;

pub trait Printer: fmt::Debug {
    fn summary(&self, target: &dyn Target) -> Result<Summary>;

    /// `None` for printers that only have a summary
    fn children<'a>(&'a self, _target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        Ok(None)
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        None
    }
}

/// `[i]`
pub(crate) fn index_label(index: usize) -> String {
    format!("[{}]", index)
}

/// GDB spelling of an address
pub fn format_address(address: u64) -> String {
    format!("0x{:x}", address)
}

/// Look up a node struct that the container's layout must have defined
pub(crate) fn node_type(target: &dyn Target, name: &str) -> Result<Type> {
    target
        .types()
        .lookup(name)
        .ok_or_else(|| PrintError::UnknownType(name.to_string()))
}

/// Split a `std::pair` payload into key and value children
pub(crate) fn pair_children(
    target: &dyn Target,
    index: usize,
    pair: Result<Value>,
) -> Vec<Result<Child>> {
    let halves = pair.and_then(|pair| {
        Ok((
            pair.field(target, "first")?,
            pair.field(target, "second")?,
        ))
    });
    match halves {
        Ok((key, value)) => vec![
            Ok(Child::value(index_label(2 * index), key)),
            Ok(Child::value(index_label(2 * index + 1), value)),
        ],
        Err(err) => vec![Err(err)],
    }
}
