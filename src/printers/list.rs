use super::{index_label, node_type, Child, Children, Printer, Summary};
use crate::errors::Result;
use crate::layouts::list_node_name;
use crate::memory::value::{Address, Value};
use crate::snapshot::Target;
use crate::types::Type;
use tracing::trace;

/// `std::list<T>`
///
/// The list object embeds the sentinel node; elements are visited by following
/// `_M_next` until it comes back to the sentinel.
#[derive(Debug, Clone)]
pub struct ListPrinter {
    value: Value,
}

impl ListPrinter {
    pub fn new(value: Value) -> Self {
        ListPrinter { value }
    }

    fn sentinel(&self, target: &dyn Target) -> Result<Value> {
        self.value.field_path(target, "_M_impl._M_node")
    }
}

impl Printer for ListPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let sentinel = self.sentinel(target)?;
        let first = sentinel.field(target, "_M_next")?.read_pointer(target)?;
        if first.address == sentinel.address() {
            Ok(Summary::text("empty std::list"))
        } else {
            Ok(Summary::text("std::list"))
        }
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let elem = self.value.template_argument(target, 0)?;
        let node = node_type(target, &list_node_name(&elem))?;
        let sentinel = self.sentinel(target)?;
        let first = sentinel.field(target, "_M_next")?.read_pointer(target)?;
        Ok(Some(Box::new(ListNodes {
            target,
            node,
            sentinel: sentinel.address(),
            current: first.address,
            index: 0,
            done: false,
        })))
    }
}

struct ListNodes<'a> {
    target: &'a dyn Target,
    node: Type,
    sentinel: Address,
    current: Address,
    index: usize,
    done: bool,
}

impl ListNodes<'_> {
    fn step(&mut self) -> Result<Child> {
        let node = Value::new(self.current, self.node.clone());
        let data = node.field(self.target, "_M_data")?;
        let next = node.field(self.target, "_M_next")?.read_pointer(self.target)?;
        trace!("List node 0x{:x} -> 0x{:x}", self.current, next.address);
        self.current = next.address;
        let child = Child::value(index_label(self.index), data);
        self.index += 1;
        Ok(child)
    }
}

impl Iterator for ListNodes<'_> {
    type Item = Result<Child>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current == self.sentinel {
            return None;
        }
        let child = self.step();
        self.done = child.is_err();
        Some(child)
    }
}

/// `std::_List_iterator<T>` and `std::_List_const_iterator<T>`
#[derive(Debug, Clone)]
pub struct ListIteratorPrinter {
    value: Value,
}

impl ListIteratorPrinter {
    pub fn new(value: Value) -> Self {
        ListIteratorPrinter { value }
    }
}

impl Printer for ListIteratorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let elem = self.value.template_argument(target, 0)?;
        let node = node_type(target, &list_node_name(&elem))?;
        let data = self
            .value
            .field(target, "_M_node")?
            .read_pointer(target)?
            .cast(node)
            .dereference()?
            .field(target, "_M_data")?;
        Ok(Summary::Value(data))
    }
}
