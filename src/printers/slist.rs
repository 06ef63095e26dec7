use super::{index_label, node_type, Child, Children, Printer, Summary};
use crate::errors::Result;
use crate::layouts::slist_node_name;
use crate::memory::value::{Address, Value};
use crate::snapshot::Target;
use crate::types::Type;

/// `__gnu_cxx::slist<T>`: singly linked, terminated by a null `_M_next`
#[derive(Debug, Clone)]
pub struct SlistPrinter {
    value: Value,
}

impl SlistPrinter {
    pub fn new(value: Value) -> Self {
        SlistPrinter { value }
    }

    fn first(&self, target: &dyn Target) -> Result<Address> {
        Ok(self
            .value
            .field_path(target, "_M_head._M_next")?
            .read_pointer(target)?
            .address)
    }
}

impl Printer for SlistPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        if self.first(target)? == 0 {
            Ok(Summary::text("empty __gnu_cxx::slist"))
        } else {
            Ok(Summary::text("__gnu_cxx::slist"))
        }
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let elem = self.value.template_argument(target, 0)?;
        let node = node_type(target, &slist_node_name(&elem))?;
        Ok(Some(Box::new(SlistNodes {
            target,
            node,
            current: self.first(target)?,
            index: 0,
            done: false,
        })))
    }
}

struct SlistNodes<'a> {
    target: &'a dyn Target,
    node: Type,
    current: Address,
    index: usize,
    done: bool,
}

impl SlistNodes<'_> {
    fn step(&mut self) -> Result<Child> {
        let node = Value::new(self.current, self.node.clone());
        let data = node.field(self.target, "_M_data")?;
        self.current = node
            .field(self.target, "_M_next")?
            .read_pointer(self.target)?
            .address;
        let child = Child::value(index_label(self.index), data);
        self.index += 1;
        Ok(child)
    }
}

impl Iterator for SlistNodes<'_> {
    type Item = Result<Child>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current == 0 {
            return None;
        }
        let child = self.step();
        self.done = child.is_err();
        Some(child)
    }
}

/// `__gnu_cxx::_Slist_iterator<T>`
#[derive(Debug, Clone)]
pub struct SlistIteratorPrinter {
    value: Value,
}

impl SlistIteratorPrinter {
    pub fn new(value: Value) -> Self {
        SlistIteratorPrinter { value }
    }
}

impl Printer for SlistIteratorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let elem = self.value.template_argument(target, 0)?;
        let node = node_type(target, &slist_node_name(&elem))?;
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
