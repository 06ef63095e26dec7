//! Error types for snapshot reads, type lookups and container traversal
//!
//! This module defines [`PrintError`], which covers every fault a printer can
//! hit while decoding a value. Faults are never swallowed: a traversal that
//! cannot be completed surfaces an error instead of a shortened result.
//!
//! Two situations are deliberately *not* errors:
//! - a value whose type has no registered printer (lookup returns `Ok(None)`)
//! - an unknown character set name (decoding falls back to a default)

use crate::memory::value::Address;

/// Errors that can occur while reading or formatting a value
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// Read outside every mapped region
    #[error("Invalid address 0x{address:x}: not in any mapped region")]
    InvalidAddress { address: Address },

    /// Read that starts inside a region but runs past its end
    #[error("Read of {len} bytes at 0x{address:x} runs past the end of its region")]
    ReadOverrun { address: Address, len: usize },

    /// Read from a region that was released before the snapshot was taken
    #[error("Stale reference: address 0x{address:x} points into released memory")]
    StaleReference { address: Address },

    /// Read of bytes that were never written
    #[error("Uninitialized read at address 0x{address:x}")]
    UninitializedRead { address: Address },

    /// Mapping a region on top of one that already exists
    #[error("Region at 0x{address:x} overlaps an existing region")]
    RegionOverlap { address: Address },

    /// Array index past the last element
    #[error("Index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Dereference of a null pointer
    #[error("Null pointer dereference of '{type_name}'")]
    NullDereference { type_name: String },

    /// Struct or typedef missing from the type table
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// Type without a size (void, or a struct defined as opaque)
    #[error("Type '{0}' has no size")]
    IncompleteType(String),

    /// Field access on a struct that does not have that field
    #[error("Type '{type_name}' does not have field '{field}'")]
    MissingField { type_name: String, field: String },

    /// Operation applied to a value of the wrong kind
    #[error("Type error: expected {expected}, got '{got}'")]
    TypeMismatch { expected: String, got: String },

    /// Template argument index out of range
    #[error("Type '{type_name}' has no template argument {index}")]
    MissingTemplateArgument { type_name: String, index: usize },

    /// Link structure of an ordered tree is inconsistent
    #[error("Malformed tree: {message}")]
    MalformedTree { message: String },

    /// Container bookkeeping that contradicts itself, e.g. `finish` before `start`
    #[error("Inconsistent {type_name}: {message}")]
    InconsistentContainer { type_name: String, message: String },

    /// The links ran out before the declared element count was reached
    #[error("Traversal ended after {yielded} of {expected} elements")]
    PrematureEnd { expected: usize, yielded: usize },

    /// Every bucket was visited before the declared element count was reached
    #[error("All {buckets} buckets visited after {yielded} of {expected} elements")]
    BucketsExhausted {
        expected: usize,
        yielded: usize,
        buckets: usize,
    },

    /// Invalid type-name pattern passed to the registry builder
    #[error("Invalid printer pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PrintError {
    /// Address involved in a memory fault, if any
    pub fn address(&self) -> Option<Address> {
        match self {
            PrintError::InvalidAddress { address }
            | PrintError::ReadOverrun { address, .. }
            | PrintError::StaleReference { address }
            | PrintError::UninitializedRead { address } => Some(*address),
            _ => None,
        }
    }

    /// Whether the error came from reading target memory
    pub fn is_memory_fault(&self) -> bool {
        self.address().is_some() || matches!(self, PrintError::NullDereference { .. })
    }
}

pub type Result<T> = std::result::Result<T, PrintError>;
