use super::{index_label, Child, Children, DisplayHint, Printer, Summary};
use crate::constants::DEQUE_BUFFER_BYTES;
use crate::errors::{PrintError, Result};
use crate::memory::value::{Pointer, Value};
use crate::snapshot::Target;

/// Elements per deque node buffer for elements of `elem_size` bytes
pub fn deque_buffer_size(elem_size: usize) -> usize {
    if elem_size < DEQUE_BUFFER_BYTES {
        DEQUE_BUFFER_BYTES / elem_size.max(1)
    } else {
        1
    }
}

/// `std::deque<T>`
///
/// Elements live in fixed-size buffers reached through the node map. The
/// start and finish iterators each know their buffer (`_M_first`, `_M_last`)
/// and their slot in the map (`_M_node`).
#[derive(Debug, Clone)]
pub struct DequePrinter {
    value: Value,
    buffer_size: usize,
}

struct DequeIter {
    cur: Pointer,
    first: Pointer,
    last: Pointer,
    node: Pointer,
}

impl DequePrinter {
    pub fn new(target: &dyn Target, value: Value) -> Result<Self> {
        let elem = value.template_argument(target, 0)?;
        let buffer_size = deque_buffer_size(target.types().sizeof(&elem)?);
        Ok(DequePrinter { value, buffer_size })
    }

    fn iterator(&self, target: &dyn Target, name: &str) -> Result<DequeIter> {
        let it = self.value.field_path(target, &format!("_M_impl.{}", name))?;
        Ok(DequeIter {
            cur: it.field(target, "_M_cur")?.read_pointer(target)?,
            first: it.field(target, "_M_first")?.read_pointer(target)?,
            last: it.field(target, "_M_last")?.read_pointer(target)?,
            node: it.field(target, "_M_node")?.read_pointer(target)?,
        })
    }

    fn len(&self, target: &dyn Target) -> Result<usize> {
        let start = self.iterator(target, "_M_start")?;
        let finish = self.iterator(target, "_M_finish")?;

        let nodes = finish.node.diff(target, &start.node)?;
        let in_first = start.last.diff(target, &start.cur)?;
        let in_last = finish.cur.diff(target, &finish.first)?;
        let size = nodes
            .checked_sub(1)
            .and_then(|full_nodes| full_nodes.checked_mul(self.buffer_size as i64))
            .and_then(|size| size.checked_add(in_first))
            .and_then(|size| size.checked_add(in_last))
            .ok_or_else(|| self.inconsistent(format!("{} map nodes between start and finish", nodes)))?;
        usize::try_from(size).map_err(|_| self.inconsistent(format!("computed size {}", size)))
    }

    fn inconsistent(&self, message: String) -> PrintError {
        PrintError::InconsistentContainer {
            type_name: self.value.ty().name(),
            message,
        }
    }
}

impl Printer for DequePrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Text(format!(
            "std::deque with {} elements",
            self.len(target)?
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let start = self.iterator(target, "_M_start")?;
        let finish = self.iterator(target, "_M_finish")?;
        Ok(Some(Box::new(DequeElements {
            target,
            buffer_size: self.buffer_size,
            node: start.node,
            end: start.last,
            p: start.cur,
            last: finish.cur,
            at_buffer_end: false,
            index: 0,
            done: false,
        })))
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        Some(DisplayHint::Array)
    }
}

struct DequeElements<'a> {
    target: &'a dyn Target,
    buffer_size: usize,
    node: Pointer,
    end: Pointer,
    p: Pointer,
    last: Pointer,
    /// `p` ran off its buffer; the next map slot is read on the next call
    at_buffer_end: bool,
    index: usize,
    done: bool,
}

impl DequeElements<'_> {
    fn next_buffer(&mut self) -> Result<()> {
        self.node = self.node.add(self.target, 1)?;
        self.p = self.node.dereference()?.read_pointer(self.target)?;
        self.end = self.p.add(self.target, self.buffer_size as i64)?;
        self.at_buffer_end = false;
        Ok(())
    }

    fn step(&mut self) -> Result<Option<Child>> {
        if self.at_buffer_end && self.p.address != self.last.address {
            self.next_buffer()?;
        }
        if self.p.address == self.last.address {
            return Ok(None);
        }
        let element = self.p.dereference()?;
        self.p = self.p.add(self.target, 1)?;
        self.at_buffer_end = self.p.address == self.end.address;
        let child = Child::value(index_label(self.index), element);
        self.index += 1;
        Ok(Some(child))
    }
}

impl Iterator for DequeElements<'_> {
    type Item = Result<Child>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(child)) => Some(Ok(child)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// `std::_Deque_iterator<T, T&, T*>`
#[derive(Debug, Clone)]
pub struct DequeIteratorPrinter {
    value: Value,
}

impl DequeIteratorPrinter {
    pub fn new(value: Value) -> Self {
        DequeIteratorPrinter { value }
    }
}

impl Printer for DequeIteratorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let cur = self.value.field(target, "_M_cur")?.read_pointer(target)?;
        Ok(Summary::Value(cur.dereference()?))
    }
}
