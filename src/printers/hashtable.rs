//! Unordered containers: `std::unordered_*` and `std::tr1::unordered_*`
//!
//! Elements are produced by [`ChainWalk`] over [`HashBuckets`]: bucket by
//! bucket, following each `_Hash_node` chain to its end.

use super::{index_label, pair_children, Child, Children, DisplayHint, Printer, Summary};
use crate::errors::{PrintError, Result};
use crate::memory::value::{Address, Pointer, Value};
use crate::snapshot::Target;
use crate::types::Type;
use crate::walk::{BucketChain, ChainWalk};

/// Bucket array and hash nodes in target memory
pub struct HashBuckets<'a> {
    target: &'a dyn Target,
    buckets: Pointer,
    bucket_count: usize,
    node: Type,
}

impl<'a> HashBuckets<'a> {
    /// Read the bucket array of a hashtable value
    pub fn new(target: &'a dyn Target, table: &Value) -> Result<Self> {
        let buckets = table.field(target, "_M_buckets")?.read_pointer(target)?;
        let bucket_count = table.field(target, "_M_bucket_count")?.read_uint(target)? as usize;
        let node = buckets.pointee.pointee().ok_or_else(|| PrintError::TypeMismatch {
            expected: "pointer to hash node pointers".to_string(),
            got: buckets.pointee.name(),
        })?;
        Ok(HashBuckets {
            target,
            buckets,
            bucket_count,
            node,
        })
    }
}

impl BucketChain for HashBuckets<'_> {
    type Node = Address;
    type Payload = Value;

    fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    fn bucket(&self, index: usize) -> Result<Option<Address>> {
        let head = self
            .buckets
            .index(self.target, index as i64)?
            .read_pointer(self.target)?;
        Ok((!head.is_null()).then_some(head.address))
    }

    fn next(&self, node: Address) -> Result<Option<Address>> {
        let next = Value::new(node, self.node.clone())
            .field(self.target, "_M_next")?
            .read_pointer(self.target)?;
        Ok((!next.is_null()).then_some(next.address))
    }

    fn value(&self, node: Address) -> Result<Value> {
        Value::new(node, self.node.clone()).field(self.target, "_M_v")
    }
}

fn element_count(target: &dyn Target, table: &Value) -> Result<u64> {
    table.field(target, "_M_element_count")?.read_uint(target)
}

fn chain_walk<'a>(target: &'a dyn Target, table: &Value) -> Result<ChainWalk<HashBuckets<'a>>> {
    let count = element_count(target, table)? as usize;
    Ok(ChainWalk::new(HashBuckets::new(target, table)?, count))
}

/// `unordered_map`/`unordered_multimap`, std and tr1 spellings
#[derive(Debug, Clone)]
pub struct UnorderedMapPrinter {
    name: String,
    value: Value,
}

impl UnorderedMapPrinter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        UnorderedMapPrinter {
            name: name.into(),
            value,
        }
    }
}

impl Printer for UnorderedMapPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Text(format!(
            "{} with {} elements",
            self.name,
            element_count(target, &self.value)?
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let children = chain_walk(target, &self.value)?
            .enumerate()
            .flat_map(move |(i, pair)| pair_children(target, i, pair));
        Ok(Some(Box::new(children)))
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        Some(DisplayHint::Map)
    }
}

/// `unordered_set`/`unordered_multiset`, std and tr1 spellings
#[derive(Debug, Clone)]
pub struct UnorderedSetPrinter {
    name: String,
    value: Value,
}

impl UnorderedSetPrinter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        UnorderedSetPrinter {
            name: name.into(),
            value,
        }
    }
}

impl Printer for UnorderedSetPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Text(format!(
            "{} with {} elements",
            self.name,
            element_count(target, &self.value)?
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let children = chain_walk(target, &self.value)?
            .enumerate()
            .map(|(i, element)| element.map(|element| Child::value(index_label(i), element)));
        Ok(Some(Box::new(children)))
    }
}
