//! Ordered associative containers: `std::map`, `std::set` and their multi variants
//!
//! All of them are a `std::_Rb_tree` underneath. Elements are produced by
//! [`InOrderWalk`] over [`RbTreeNodes`], which reads the node links straight
//! out of target memory.

use super::{index_label, node_type, pair_children, Child, Children, DisplayHint, Printer, Summary};
use crate::errors::Result;
use crate::layouts::{pair_name, rb_tree_node_name};
use crate::memory::value::{Address, Value};
use crate::snapshot::Target;
use crate::types::Type;
use crate::walk::{InOrderWalk, TreeLinks};

/// Red-black tree nodes in target memory, identified by address
///
/// The header node only has the base-class links, so links are read through
/// the full node type, whose leading members line up with the base.
pub struct RbTreeNodes<'a> {
    target: &'a dyn Target,
    node: Type,
}

impl<'a> RbTreeNodes<'a> {
    pub fn new(target: &'a dyn Target, node: Type) -> Self {
        RbTreeNodes { target, node }
    }

    fn link(&self, node: Address, name: &str) -> Result<Option<Address>> {
        let link = Value::new(node, self.node.clone())
            .field(self.target, name)?
            .read_pointer(self.target)?;
        Ok((!link.is_null()).then_some(link.address))
    }
}

impl TreeLinks for RbTreeNodes<'_> {
    type Node = Address;
    type Payload = Value;

    fn left(&self, node: Address) -> Result<Option<Address>> {
        self.link(node, "_M_left")
    }

    fn right(&self, node: Address) -> Result<Option<Address>> {
        self.link(node, "_M_right")
    }

    fn parent(&self, node: Address) -> Result<Option<Address>> {
        self.link(node, "_M_parent")
    }

    fn value(&self, node: Address) -> Result<Value> {
        Value::new(node, self.node.clone()).field(self.target, "_M_value_field")
    }
}

/// Element count and in-order walk over the tree inside `_M_t`
fn tree_walk<'a>(
    target: &'a dyn Target,
    container: &Value,
    value_type: &Type,
) -> Result<InOrderWalk<RbTreeNodes<'a>>> {
    let node = node_type(target, &rb_tree_node_name(value_type))?;
    let imp = container.field_path(target, "_M_t._M_impl")?;
    let count = imp.field(target, "_M_node_count")?.read_uint(target)? as usize;
    let header = imp.field(target, "_M_header")?;
    let leftmost = header.field(target, "_M_left")?.read_pointer(target)?;
    Ok(InOrderWalk::new(
        RbTreeNodes::new(target, node),
        header.address(),
        leftmost.address,
        count,
    ))
}

fn node_count(target: &dyn Target, container: &Value) -> Result<u64> {
    container
        .field_path(target, "_M_t._M_impl._M_node_count")?
        .read_uint(target)
}

/// `std::map<K, V>` and `std::multimap<K, V>`
#[derive(Debug, Clone)]
pub struct MapPrinter {
    name: String,
    value: Value,
}

impl MapPrinter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        MapPrinter {
            name: name.into(),
            value,
        }
    }
}

impl Printer for MapPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Text(format!(
            "{} with {} elements",
            self.name,
            node_count(target, &self.value)?
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let key = self.value.template_argument(target, 0)?.with_const();
        let mapped = self.value.template_argument(target, 1)?;
        let value_type = Type::named_struct(pair_name(&key, &mapped));
        let walk = tree_walk(target, &self.value, &value_type)?;
        let children = walk
            .enumerate()
            .flat_map(move |(i, pair)| pair_children(target, i, pair));
        Ok(Some(Box::new(children)))
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        Some(DisplayHint::Map)
    }
}

/// `std::set<K>` and `std::multiset<K>`
#[derive(Debug, Clone)]
pub struct SetPrinter {
    name: String,
    value: Value,
}

impl SetPrinter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        SetPrinter {
            name: name.into(),
            value,
        }
    }
}

impl Printer for SetPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Text(format!(
            "{} with {} elements",
            self.name,
            node_count(target, &self.value)?
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let key = self.value.template_argument(target, 0)?;
        let walk = tree_walk(target, &self.value, &key)?;
        let children = walk
            .enumerate()
            .map(|(i, element)| element.map(|element| Child::value(index_label(i), element)));
        Ok(Some(Box::new(children)))
    }
}

/// `std::_Rb_tree_iterator<V>` and `std::_Rb_tree_const_iterator<V>`
#[derive(Debug, Clone)]
pub struct RbTreeIteratorPrinter {
    value: Value,
}

impl RbTreeIteratorPrinter {
    pub fn new(value: Value) -> Self {
        RbTreeIteratorPrinter { value }
    }
}

impl Printer for RbTreeIteratorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let value_type = self.value.template_argument(target, 0)?;
        let node = node_type(target, &rb_tree_node_name(&value_type))?;
        let element = self
            .value
            .field(target, "_M_node")?
            .read_pointer(target)?
            .cast(node)
            .dereference()?
            .field(target, "_M_value_field")?;
        Ok(Summary::Value(element))
    }
}
