use super::{format_address, Printer, Summary};
use crate::errors::Result;
use crate::memory::value::Value;
use crate::snapshot::Target;

/// `shared_ptr`/`weak_ptr`, std and tr1 spellings
///
/// Prints the use count from the control block, or `(empty)` when there is
/// none, followed by the stored pointer.
#[derive(Debug, Clone)]
pub struct SharedPtrPrinter {
    name: String,
    value: Value,
}

impl SharedPtrPrinter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        SharedPtrPrinter {
            name: name.into(),
            value,
        }
    }
}

impl Printer for SharedPtrPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let control = self
            .value
            .field_path(target, "_M_refcount._M_pi")?
            .read_pointer(target)?;
        let pointer = self.value.field(target, "_M_ptr")?.read_pointer(target)?;

        let state = if control.is_null() {
            "(empty)".to_string()
        } else {
            let count = control
                .dereference()?
                .field(target, "_M_use_count")?
                .read_int(target)?;
            format!("(count {})", count)
        };
        Ok(Summary::Text(format!(
            "{} {} {}",
            self.name,
            state,
            format_address(pointer.address)
        )))
    }
}

/// `std::unique_ptr<T>`: shows the tuple holding the pointer and deleter
#[derive(Debug, Clone)]
pub struct UniquePtrPrinter {
    value: Value,
}

impl UniquePtrPrinter {
    pub fn new(value: Value) -> Self {
        UniquePtrPrinter { value }
    }
}

impl Printer for UniquePtrPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        Ok(Summary::Value(self.value.field(target, "_M_t")?))
    }
}
