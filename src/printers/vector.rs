use super::{index_label, Child, Children, DisplayHint, Printer, Summary};
use crate::errors::{PrintError, Result};
use crate::memory::value::{Pointer, Value};
use crate::snapshot::Target;

/// `std::vector<T>`
#[derive(Debug, Clone)]
pub struct VectorPrinter {
    value: Value,
}

impl VectorPrinter {
    pub fn new(value: Value) -> Self {
        VectorPrinter { value }
    }

    fn bounds(&self, target: &dyn Target) -> Result<(Pointer, usize, usize)> {
        let start = self
            .value
            .field_path(target, "_M_impl._M_start")?
            .read_pointer(target)?;
        let finish = self
            .value
            .field_path(target, "_M_impl._M_finish")?
            .read_pointer(target)?;
        let end = self
            .value
            .field_path(target, "_M_impl._M_end_of_storage")?
            .read_pointer(target)?;

        let length = finish.diff(target, &start)?;
        let capacity = end.diff(target, &start)?;
        if length < 0 || capacity < length {
            return Err(PrintError::InconsistentContainer {
                type_name: self.value.ty().name(),
                message: format!("length {} with capacity {}", length, capacity),
            });
        }
        Ok((start, length as usize, capacity as usize))
    }
}

impl Printer for VectorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let (_, length, capacity) = self.bounds(target)?;
        Ok(Summary::Text(format!(
            "std::vector of length {}, capacity {}",
            length, capacity
        )))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let (start, length, _) = self.bounds(target)?;
        let elements = (0..length).map(move |i| {
            let element = start.index(target, i as i64)?;
            Ok(Child::value(index_label(i), element))
        });
        Ok(Some(Box::new(elements)))
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        Some(DisplayHint::Array)
    }
}

/// `__gnu_cxx::__normal_iterator<T*, std::vector<T>>`
#[derive(Debug, Clone)]
pub struct VectorIteratorPrinter {
    value: Value,
}

impl VectorIteratorPrinter {
    pub fn new(value: Value) -> Self {
        VectorIteratorPrinter { value }
    }
}

impl Printer for VectorIteratorPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let current = self.value.field(target, "_M_current")?.read_pointer(target)?;
        Ok(Summary::Value(current.dereference()?))
    }
}
